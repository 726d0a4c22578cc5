//! Tenant User Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Profile, Tenant};

/// Role of a user inside a tenant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Manager,
    Staff,
}

/// TenantUser entity - links an identity to a tenant with a role.
///
/// One row per (tenant, identity) pair; the provisioning flow creates
/// exactly one with role = owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantUser {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create tenant-user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantUserCreate {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Result of the membership lookup: the tenant-user row joined with
/// its tenant and profile.
#[derive(Debug, Clone)]
pub struct TenantMembership {
    pub tenant_user: TenantUser,
    pub tenant: Tenant,
    pub profile: Profile,
}
