//! Tenant Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of store a tenant runs, used for storefront presets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    CoffeeShop,
    Restaurant,
    MilkTea,
    #[default]
    Other,
}

/// Tenant entity - one store, the unit of data isolation.
///
/// The slug is derived once at provisioning time and never updated;
/// `TenantUpdate` has no slug field on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub store_type: StoreType,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub primary_color: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub address: String,
}

/// Create tenant payload (first-login provisioning only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantCreate {
    pub name: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub store_type: StoreType,
    pub contact_email: String,
}

/// Update tenant payload (settings page)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
