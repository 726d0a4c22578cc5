//! Customer Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer entity, identified by (tenant_id, phone).
///
/// Checkout upserts on that composite key so repeat customers reuse the
/// same row across orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Upsert customer payload (conflict key: tenant_id, phone)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerUpsert {
    pub tenant_id: Uuid,
    pub name: String,
    pub phone: String,
}
