//! Session bootstrap
//!
//! Translates session-change events from the session provider into a
//! resolved tenant identity: look up the membership row for the
//! subject, and when the store explicitly reports "no matching row",
//! provision the Profile/Tenant/TenantUser triple for a first login.
//!
//! Event ordering contract: events carry a monotonic sequence number,
//! and a bootstrap only writes state if its event is still the newest
//! one observed. Completion order does not matter, event order does.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use orderly_client::store::{CatalogStore, IdentityStore, LookupOutcome};
use orderly_client::{AuthEvent, Session, StoreError};
use shared::models::{
    PLACEHOLDER_IMAGE, ProfileCreate, TenantCreate, TenantMembership, TenantUserCreate, UserRole,
};
use shared::slug;

use crate::context::{AppContext, SessionState};
use crate::error::{AppError, AppResult};

/// Resolves sessions to tenant identities. Sole writer of the
/// [`AppContext`] state.
pub struct SessionBootstrap<S> {
    store: Arc<S>,
    context: Arc<AppContext>,
}

impl<S> SessionBootstrap<S>
where
    S: IdentityStore + CatalogStore,
{
    pub fn new(store: Arc<S>, context: Arc<AppContext>) -> Self {
        Self { store, context }
    }

    /// Consume the auth event stream until it closes.
    pub async fn run(&self, mut rx: broadcast::Receiver<AuthEvent>) {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(e) = self.handle_event(event).await {
                        warn!(error = %e, "session bootstrap failed");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "auth event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Handle one session-change event.
    pub async fn handle_event(&self, event: AuthEvent) -> AppResult<()> {
        self.context.observe(event.seq);
        match event.session {
            None => {
                // Logout or expired restore: clear immediately.
                self.context
                    .apply_if_current(event.seq, SessionState::default())
                    .await;
                Ok(())
            }
            Some(session) => self.resolve(session, event.seq).await,
        }
    }

    /// Re-run provisioning for the current session after a failure.
    pub async fn retry_provisioning(&self) -> AppResult<()> {
        let snapshot = self.context.snapshot().await;
        let Some(session) = snapshot.session else {
            return Err(AppError::Validation("no active session".to_string()));
        };
        self.resolve(session, self.context.current_generation()).await
    }

    async fn resolve(&self, session: Session, seq: u64) -> AppResult<()> {
        let user_id = session.user.id;

        let outcome = match self.store.lookup_membership(user_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Transport/server failure is not a first login. Fail
                // soft: keep the session, surface no tenant.
                warn!(%user_id, error = %e, "membership lookup failed");
                self.apply_session_only(seq, session).await;
                return Ok(());
            }
        };

        let membership = match outcome {
            LookupOutcome::Found(membership) => *membership,
            LookupOutcome::NotFound => {
                info!(%user_id, "no membership row, provisioning tenant");
                if let Err(e) = self.provision(&session).await {
                    error!(%user_id, error = %e, "tenant provisioning failed");
                    self.apply_session_only(seq, session).await;
                    return Err(e);
                }
                match self.store.lookup_membership(user_id).await {
                    Ok(LookupOutcome::Found(membership)) => *membership,
                    Ok(LookupOutcome::NotFound) => {
                        self.apply_session_only(seq, session).await;
                        return Err(AppError::Provisioning(
                            "membership row missing after provisioning".to_string(),
                        ));
                    }
                    Err(e) => {
                        self.apply_session_only(seq, session).await;
                        return Err(e.into());
                    }
                }
            }
        };

        self.apply_membership(seq, session, membership).await;
        Ok(())
    }

    /// Create the Profile/Tenant/TenantUser triple for a first login.
    ///
    /// Idempotent: a conflict on any step means a previous partial
    /// attempt already wrote that row, and the flow continues with it.
    async fn provision(&self, session: &Session) -> AppResult<()> {
        let user = &session.user;
        let meta = &user.user_metadata;

        let full_name = meta
            .full_name
            .clone()
            .unwrap_or_else(|| user.email.clone());
        let store_name = meta
            .store_name
            .clone()
            .unwrap_or_else(|| "New Store".to_string());
        let store_type = meta.store_type.unwrap_or_default();
        let slug = slug::derive(&store_name, &user.id);

        let profile = ProfileCreate {
            id: user.id,
            full_name,
            avatar_url: PLACEHOLDER_IMAGE.to_string(),
        };
        match self.store.create_profile(&profile).await {
            Ok(_) => {}
            Err(StoreError::Conflict(_)) => {
                debug!(user_id = %user.id, "profile already exists, continuing");
            }
            Err(e) => return Err(AppError::Provisioning(format!("create profile: {}", e))),
        }

        let tenant = TenantCreate {
            name: store_name,
            slug: slug.clone(),
            store_type,
            contact_email: user.email.clone(),
        };
        let tenant = match self.store.create_tenant(&tenant).await {
            Ok(tenant) => tenant,
            Err(StoreError::Conflict(_)) => {
                // Deterministic slug: an earlier partial attempt
                // already created this tenant.
                debug!(%slug, "tenant already exists, reusing");
                self.store
                    .tenant_by_slug(&slug)
                    .await
                    .map_err(|e| AppError::Provisioning(format!("fetch tenant: {}", e)))?
            }
            Err(e) => return Err(AppError::Provisioning(format!("create tenant: {}", e))),
        };

        let link = TenantUserCreate {
            tenant_id: tenant.id,
            user_id: user.id,
            role: UserRole::Owner,
        };
        match self.store.create_tenant_user(&link).await {
            Ok(_) => {}
            Err(StoreError::Conflict(_)) => {
                debug!(user_id = %user.id, "tenant-user link already exists");
            }
            Err(e) => return Err(AppError::Provisioning(format!("link tenant user: {}", e))),
        }

        Ok(())
    }

    async fn apply_session_only(&self, seq: u64, session: Session) {
        let applied = self
            .context
            .apply_if_current(
                seq,
                SessionState {
                    session: Some(session),
                    ..SessionState::default()
                },
            )
            .await;
        if !applied {
            debug!(seq, "session bootstrap superseded, result dropped");
        }
    }

    async fn apply_membership(&self, seq: u64, session: Session, membership: TenantMembership) {
        let applied = self
            .context
            .apply_if_current(
                seq,
                SessionState {
                    session: Some(session),
                    tenant: Some(membership.tenant),
                    tenant_user: Some(membership.tenant_user),
                    profile: Some(membership.profile),
                },
            )
            .await;
        if !applied {
            debug!(seq, "session bootstrap superseded, result dropped");
        }
    }
}
