//! Session provider client
//!
//! Wraps the hosted auth API: imperative sign-up/sign-in/sign-out plus
//! a broadcast stream of session-change events. Every event carries a
//! monotonic sequence number; the bootstrap uses it for
//! last-event-wins ordering.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use shared::models::StoreType;

use crate::{AuthError, AuthResult, ClientConfig};

/// Metadata captured at signup and replayed at first-login provisioning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_type: Option<StoreType>,
}

/// The authenticated subject as the session provider reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub user_metadata: SignupMetadata,
}

/// An authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Kind of session-change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    /// Session restored on startup
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// A session-change event.
#[derive(Debug, Clone)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
    /// Event ordinal; strictly increasing per provider instance.
    pub seq: u64,
}

/// Session provider operations.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> AuthResult<()>;

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session>;

    async fn sign_out(&self) -> AuthResult<()>;

    /// Subscribe to session-change events.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Shared event emission for auth implementations.
pub(crate) struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
    seq: AtomicU64,
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthEvents {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            tx,
            seq: AtomicU64::new(0),
        }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn emit(&self, kind: AuthEventKind, session: Option<Session>) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        // A send error only means nobody is listening yet.
        let _ = self.tx.send(AuthEvent { kind, session, seq });
    }
}

/// HTTP client for the hosted session provider.
pub struct RemoteAuth {
    client: Client,
    base_url: String,
    api_key: String,
    current: Mutex<Option<Session>>,
    events: AuthEvents,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(default, alias = "error_description", alias = "msg")]
    message: String,
}

impl RemoteAuth {
    /// Create a new auth client from configuration
    pub fn new(config: &ClientConfig) -> AuthResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.auth_url(),
            api_key: config.api_key.clone(),
            current: Mutex::new(None),
            events: AuthEvents::new(),
        })
    }

    /// Announce a session restored from persisted storage (or the
    /// absence of one) so the bootstrap sees an initial event.
    pub fn announce_initial(&self, session: Option<Session>) {
        if let Ok(mut current) = self.current.lock() {
            *current = session.clone();
        }
        self.events.emit(AuthEventKind::InitialSession, session);
    }

    /// Exchange the refresh token for a new session.
    pub async fn refresh(&self) -> AuthResult<Session> {
        let refresh_token = self
            .current
            .lock()
            .ok()
            .and_then(|c| c.as_ref().and_then(|s| s.refresh_token.clone()))
            .ok_or_else(|| AuthError::Internal("no session to refresh".to_string()))?;

        let response = self
            .client
            .post(format!("{}/token?grant_type=refresh_token", self.base_url))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        let token: TokenResponse = Self::handle(response).await?;
        let session = Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: token.user,
        };
        if let Ok(mut current) = self.current.lock() {
            *current = Some(session.clone());
        }
        self.events
            .emit(AuthEventKind::TokenRefreshed, Some(session.clone()));
        Ok(session)
    }

    async fn handle<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> AuthResult<T> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(Into::into);
        }

        let text = response.text().await?;
        let message = serde_json::from_str::<AuthErrorBody>(&text)
            .map(|b| b.message)
            .unwrap_or(text);

        match status {
            reqwest::StatusCode::BAD_REQUEST if message.to_lowercase().contains("credentials") => {
                Err(AuthError::InvalidCredentials)
            }
            reqwest::StatusCode::BAD_REQUEST | reqwest::StatusCode::UNPROCESSABLE_ENTITY => {
                Err(AuthError::Validation(message))
            }
            _ => Err(AuthError::Internal(message)),
        }
    }
}

#[async_trait]
impl AuthClient for RemoteAuth {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> AuthResult<()> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": metadata,
        });
        let response = self
            .client
            .post(format!("{}/signup", self.base_url))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;
        // Signup replies with the pending user; confirmation happens
        // out of band, so the body is not a session yet.
        Self::handle::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .client
            .post(format!("{}/token?grant_type=password", self.base_url))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let token: TokenResponse = Self::handle(response).await?;
        let session = Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: token.user,
        };
        if let Ok(mut current) = self.current.lock() {
            *current = Some(session.clone());
        }
        self.events.emit(AuthEventKind::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        let token = self
            .current
            .lock()
            .ok()
            .and_then(|c| c.as_ref().map(|s| s.access_token.clone()));

        if let Some(token) = token {
            let response = self
                .client
                .post(format!("{}/logout", self.base_url))
                .header("apikey", &self.api_key)
                .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
                .send()
                .await?;
            if !response.status().is_success() {
                tracing::warn!(status = %response.status(), "remote logout failed, clearing local session anyway");
            }
        }

        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
        self.events.emit(AuthEventKind::SignedOut, None);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
