//! Application session context
//!
//! The one shared mutable resource in the system. The session bootstrap
//! is the only writer; every other component reads snapshots. Writes
//! are fenced by the event generation so a stale in-flight bootstrap
//! can never overwrite state set by a newer session event.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use orderly_client::Session;
use shared::models::{Profile, Tenant, TenantUser};

/// In-memory session/tenant/user state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub session: Option<Session>,
    pub tenant: Option<Tenant>,
    pub tenant_user: Option<TenantUser>,
    pub profile: Option<Profile>,
}

impl SessionState {
    /// True once a tenant has been resolved for the session.
    pub fn is_resolved(&self) -> bool {
        self.tenant.is_some() && self.tenant_user.is_some()
    }
}

/// Owner of the shared session state.
#[derive(Debug, Default)]
pub struct AppContext {
    state: RwLock<SessionState>,
    generation: AtomicU64,
}

impl AppContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Read-only copy of the current state.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// The active tenant, if a session has been resolved.
    pub async fn tenant(&self) -> Option<Tenant> {
        self.state.read().await.tenant.clone()
    }

    /// Newest event ordinal observed so far.
    pub(crate) fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Record that an event with ordinal `seq` has been observed.
    ///
    /// Generations only move forward; a late-arriving older event can
    /// never lower the fence.
    pub(crate) fn observe(&self, seq: u64) {
        self.generation.fetch_max(seq, Ordering::SeqCst);
    }

    /// Apply `state` if `seq` is still the newest observed event.
    /// Returns false when the write was superseded and dropped.
    pub(crate) async fn apply_if_current(&self, seq: u64, state: SessionState) -> bool {
        let mut guard = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != seq {
            return false;
        }
        *guard = state;
        true
    }
}
