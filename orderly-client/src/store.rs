//! Store traits - the seams the application core is written against
//!
//! One trait per concern; `RemoteStore` implements all of them over the
//! REST API and `MemoryStore` (feature `memory`) implements them
//! in-process. Scoped create operations take the tenant id as an
//! explicit parameter so the implementation forces it onto the row
//! regardless of anything the payload might carry.

use async_trait::async_trait;
use uuid::Uuid;

use shared::models::{
    Category, CategoryCreate, CategoryUpdate, Customer, CustomerUpsert, MenuItem, MenuItemCreate,
    MenuItemUpdate, Order, OrderCreate, OrderItem, OrderItemCreate, OrderUpdate, Profile,
    ProfileCreate, Promotion, PromotionCreate, PromotionUpdate, Tenant, TenantCreate,
    TenantMembership, TenantUpdate, TenantUser, TenantUserCreate,
};

use crate::StoreResult;

/// Outcome of the membership lookup.
///
/// "No matching row" is an expected outcome that drives first-login
/// provisioning, so it is modeled explicitly instead of being folded
/// into the error channel.
#[derive(Debug)]
pub enum LookupOutcome {
    Found(Box<TenantMembership>),
    NotFound,
}

/// Identity resolution and first-login provisioning writes.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Look up the tenant-user row for `user_id`, joined with its
    /// tenant and profile.
    async fn lookup_membership(&self, user_id: Uuid) -> StoreResult<LookupOutcome>;

    async fn create_profile(&self, data: &ProfileCreate) -> StoreResult<Profile>;

    async fn create_tenant(&self, data: &TenantCreate) -> StoreResult<Tenant>;

    async fn create_tenant_user(&self, data: &TenantUserCreate) -> StoreResult<TenantUser>;
}

/// Categories and menu items, plus the public storefront entry point.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Resolve a tenant by its public storefront slug.
    async fn tenant_by_slug(&self, slug: &str) -> StoreResult<Tenant>;

    async fn list_categories(&self, tenant_id: Uuid) -> StoreResult<Vec<Category>>;

    async fn create_category(&self, tenant_id: Uuid, data: &CategoryCreate) -> StoreResult<Category>;

    async fn update_category(&self, id: Uuid, data: &CategoryUpdate) -> StoreResult<Category>;

    async fn delete_category(&self, id: Uuid) -> StoreResult<()>;

    async fn list_menu_items(&self, tenant_id: Uuid) -> StoreResult<Vec<MenuItem>>;

    async fn create_menu_item(&self, tenant_id: Uuid, data: &MenuItemCreate) -> StoreResult<MenuItem>;

    async fn update_menu_item(&self, id: Uuid, data: &MenuItemUpdate) -> StoreResult<MenuItem>;

    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<()>;

    /// Delete every menu item referencing `category_id`. Run before a
    /// category delete; the store does not cascade on its own.
    async fn delete_menu_items_in_category(&self, category_id: Uuid) -> StoreResult<()>;
}

/// Promotions CRUD.
#[async_trait]
pub trait PromotionStore: Send + Sync {
    async fn list_promotions(&self, tenant_id: Uuid) -> StoreResult<Vec<Promotion>>;

    async fn create_promotion(&self, tenant_id: Uuid, data: &PromotionCreate)
    -> StoreResult<Promotion>;

    async fn update_promotion(&self, id: Uuid, data: &PromotionUpdate) -> StoreResult<Promotion>;

    async fn delete_promotion(&self, id: Uuid) -> StoreResult<()>;
}

/// Orders, order items and the customer upsert used by checkout.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn list_orders(&self, tenant_id: Uuid) -> StoreResult<Vec<Order>>;

    async fn update_order(&self, id: Uuid, data: &OrderUpdate) -> StoreResult<Order>;

    /// Upsert on the (tenant_id, phone) conflict key.
    async fn upsert_customer(&self, data: &CustomerUpsert) -> StoreResult<Customer>;

    async fn insert_order(&self, data: &OrderCreate) -> StoreResult<Order>;

    async fn insert_order_items(&self, rows: &[OrderItemCreate]) -> StoreResult<Vec<OrderItem>>;

    async fn list_order_items(&self, order_id: Uuid) -> StoreResult<Vec<OrderItem>>;

    /// Checkout compensation: remove an order whose items failed to
    /// insert.
    async fn delete_order(&self, id: Uuid) -> StoreResult<()>;
}

/// Tenant settings writes.
#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn update_tenant(&self, id: Uuid, data: &TenantUpdate) -> StoreResult<Tenant>;
}
