//! Session bootstrap integration tests against the in-memory backends.

use std::sync::Arc;
use std::time::Duration;

use orderly_app::{AppContext, AppError, SessionBootstrap};
use orderly_client::store::{IdentityStore, LookupOutcome};
use orderly_client::{
    AuthClient, AuthEvent, AuthEventKind, MemoryAuth, MemoryStore, Session, SignupMetadata,
};
use shared::models::{StoreType, UserRole};

/// Route bootstrap logs through the test harness capture.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn signed_in_session(auth: &MemoryAuth, email: &str) -> Session {
    auth.sign_up(
        email,
        "secret",
        SignupMetadata {
            full_name: Some("Ana Cruz".to_string()),
            store_name: Some("Brew Bar".to_string()),
            store_type: Some(StoreType::CoffeeShop),
        },
    )
    .await
    .expect("sign up");
    auth.sign_in(email, "secret").await.expect("sign in")
}

fn signed_in_event(session: Session, seq: u64) -> AuthEvent {
    AuthEvent {
        kind: AuthEventKind::SignedIn,
        session: Some(session),
        seq,
    }
}

fn signed_out_event(seq: u64) -> AuthEvent {
    AuthEvent {
        kind: AuthEventKind::SignedOut,
        session: None,
        seq,
    }
}

#[tokio::test]
async fn first_login_provisions_profile_tenant_and_owner_link() {
    let store = Arc::new(MemoryStore::new());
    let auth = MemoryAuth::new();
    let context = AppContext::new();
    let bootstrap = SessionBootstrap::new(store.clone(), context.clone());

    let session = signed_in_session(&auth, "ana@example.com").await;
    let user_id = session.user.id;

    bootstrap
        .handle_event(signed_in_event(session, 1))
        .await
        .expect("bootstrap");

    let state = context.snapshot().await;
    assert!(state.is_resolved());

    let tenant = state.tenant.expect("tenant");
    assert_eq!(tenant.name, "Brew Bar");
    assert_eq!(tenant.contact_email, "ana@example.com");
    assert!(tenant.slug.starts_with("brew-bar-"));

    let tenant_user = state.tenant_user.expect("tenant user");
    assert_eq!(tenant_user.role, UserRole::Owner);
    assert_eq!(tenant_user.user_id, user_id);
    assert_eq!(tenant_user.tenant_id, tenant.id);

    let profile = state.profile.expect("profile");
    assert_eq!(profile.id, user_id);
    assert_eq!(profile.full_name, "Ana Cruz");
    assert!(!profile.avatar_url.is_empty());

    // A fresh lookup now resolves the triple directly.
    match store.lookup_membership(user_id).await.expect("lookup") {
        LookupOutcome::Found(membership) => {
            assert_eq!(membership.tenant.id, tenant.id);
        }
        LookupOutcome::NotFound => panic!("membership should exist after provisioning"),
    }
}

#[tokio::test]
async fn second_login_does_not_provision_again() {
    let store = Arc::new(MemoryStore::new());
    let auth = MemoryAuth::new();
    let context = AppContext::new();
    let bootstrap = SessionBootstrap::new(store.clone(), context.clone());

    let session = signed_in_session(&auth, "ana@example.com").await;
    bootstrap
        .handle_event(signed_in_event(session.clone(), 1))
        .await
        .expect("first login");
    let first_tenant = context.tenant().await.expect("tenant");

    bootstrap
        .handle_event(signed_in_event(session, 2))
        .await
        .expect("second login");
    let second_tenant = context.tenant().await.expect("tenant");

    assert_eq!(first_tenant.id, second_tenant.id);
}

#[tokio::test]
async fn lookup_failure_fails_soft_without_provisioning() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let auth = MemoryAuth::new();
    let context = AppContext::new();
    let bootstrap = SessionBootstrap::new(store.clone(), context.clone());

    let session = signed_in_session(&auth, "ana@example.com").await;
    store.fail_on("lookup_membership");

    // A transport/server error is not a first login.
    bootstrap
        .handle_event(signed_in_event(session, 1))
        .await
        .expect("fail-soft");

    let state = context.snapshot().await;
    assert!(state.session.is_some());
    assert!(state.tenant.is_none());
    assert!(state.tenant_user.is_none());
}

#[tokio::test]
async fn provisioning_failure_is_returned_and_retryable() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let auth = MemoryAuth::new();
    let context = AppContext::new();
    let bootstrap = SessionBootstrap::new(store.clone(), context.clone());

    let session = signed_in_session(&auth, "ana@example.com").await;
    store.fail_on("create_tenant");

    let err = bootstrap
        .handle_event(signed_in_event(session, 1))
        .await
        .expect_err("provisioning should fail");
    assert!(matches!(err, AppError::Provisioning(_)));
    assert!(context.tenant().await.is_none());

    // The profile row from the partial attempt is tolerated on retry.
    bootstrap.retry_provisioning().await.expect("retry");
    let state = context.snapshot().await;
    assert!(state.is_resolved());
}

#[tokio::test]
async fn sign_out_clears_state_immediately() {
    let store = Arc::new(MemoryStore::new());
    let auth = MemoryAuth::new();
    let context = AppContext::new();
    let bootstrap = SessionBootstrap::new(store.clone(), context.clone());

    let session = signed_in_session(&auth, "ana@example.com").await;
    bootstrap
        .handle_event(signed_in_event(session, 1))
        .await
        .expect("login");
    assert!(context.snapshot().await.is_resolved());

    bootstrap
        .handle_event(signed_out_event(2))
        .await
        .expect("logout");

    let state = context.snapshot().await;
    assert!(state.session.is_none());
    assert!(state.tenant.is_none());
    assert!(state.tenant_user.is_none());
    assert!(state.profile.is_none());
}

#[tokio::test]
async fn stale_event_cannot_overwrite_newer_state() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let auth = MemoryAuth::new();
    let context = AppContext::new();
    let bootstrap = SessionBootstrap::new(store.clone(), context.clone());

    let session = signed_in_session(&auth, "ana@example.com").await;

    // Newer event first: the user is signed in.
    bootstrap
        .handle_event(signed_in_event(session, 2))
        .await
        .expect("login");
    assert!(context.snapshot().await.is_resolved());

    // A superseded sign-out event arrives late; its write must be
    // dropped, last-event-wins by event ordering.
    bootstrap
        .handle_event(signed_out_event(1))
        .await
        .expect("stale event");

    assert!(context.snapshot().await.is_resolved());
}

#[tokio::test]
async fn run_consumes_the_auth_event_stream() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(MemoryAuth::new());
    let context = AppContext::new();
    let bootstrap = SessionBootstrap::new(store.clone(), context.clone());

    let rx = auth.subscribe();
    let handle = tokio::spawn({
        let context = context.clone();
        async move {
            bootstrap.run(rx).await;
            context
        }
    });

    auth.sign_up(
        "ana@example.com",
        "secret",
        SignupMetadata {
            full_name: Some("Ana Cruz".to_string()),
            store_name: Some("Brew Bar".to_string()),
            store_type: Some(StoreType::CoffeeShop),
        },
    )
    .await
    .expect("sign up");
    auth.sign_in("ana@example.com", "secret").await.expect("sign in");

    let mut resolved = false;
    for _ in 0..100 {
        if context.snapshot().await.is_resolved() {
            resolved = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(resolved, "bootstrap never resolved the signed-in session");

    drop(auth);
    handle.abort();
}
