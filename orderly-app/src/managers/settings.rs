//! Store settings manager

use std::sync::Arc;

use uuid::Uuid;

use orderly_client::store::TenantStore;
use shared::models::{Tenant, TenantUpdate};

use crate::error::AppResult;

/// Settings page writes for the active tenant.
///
/// The slug is immutable; `TenantUpdate` has no field for it, so there
/// is nothing to guard here.
pub struct SettingsManager<S> {
    store: Arc<S>,
    tenant_id: Uuid,
}

impl<S: TenantStore> SettingsManager<S> {
    pub fn new(store: Arc<S>, tenant_id: Uuid) -> Self {
        Self { store, tenant_id }
    }

    /// Apply a partial update and return the persisted tenant. The
    /// caller refreshes the session context from the returned row.
    pub async fn update(&self, data: TenantUpdate) -> AppResult<Tenant> {
        Ok(self.store.update_tenant(self.tenant_id, &data).await?)
    }
}
