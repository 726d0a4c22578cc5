//! Remote store implementation over the REST client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::models::{
    Category, CategoryCreate, CategoryUpdate, Customer, CustomerUpsert, MenuItem, MenuItemCreate,
    MenuItemUpdate, Order, OrderCreate, OrderItem, OrderItemCreate, OrderUpdate, Profile,
    ProfileCreate, Promotion, PromotionCreate, PromotionUpdate, Tenant, TenantCreate,
    TenantMembership, TenantUpdate, TenantUser, TenantUserCreate,
};

use crate::rest::{Query, RestClient};
use crate::session::RemoteAuth;
use crate::store::{
    CatalogStore, IdentityStore, LookupOutcome, OrderStore, PromotionStore, TenantStore,
};
use crate::{AuthResult, ClientConfig, StoreError, StoreResult};

/// Wire shape of the membership lookup with embedded relations.
#[derive(Debug, Deserialize)]
struct MembershipRow {
    #[serde(flatten)]
    tenant_user: TenantUser,
    tenants: Tenant,
    profiles: Profile,
}

/// Insert payload with the active tenant forced onto the row.
///
/// Callers pass the scoped payloads without a tenant id; the wrapper is
/// what actually goes over the wire, so a payload can never smuggle a
/// different tenant in.
#[derive(Debug, Serialize)]
struct Scoped<'a, T> {
    tenant_id: Uuid,
    #[serde(flatten)]
    data: &'a T,
}

/// Typed client for the tenant data store.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    rest: RestClient,
}

impl RemoteStore {
    /// Create a new store client from configuration
    pub fn new(config: &ClientConfig) -> StoreResult<Self> {
        Ok(Self {
            rest: RestClient::new(config)?,
        })
    }

    /// Scope subsequent requests to a session token so the store's
    /// row-level policies see the authenticated subject.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        Self {
            rest: self.rest.with_token(token),
        }
    }

    /// Build the matching auth client for the same backend.
    pub fn auth(config: &ClientConfig) -> AuthResult<RemoteAuth> {
        RemoteAuth::new(config)
    }
}

#[async_trait]
impl IdentityStore for RemoteStore {
    async fn lookup_membership(&self, user_id: Uuid) -> StoreResult<LookupOutcome> {
        let query = Query::new()
            .select("*,tenants(*),profiles(*)")
            .eq("user_id", user_id);
        match self
            .rest
            .select_single::<MembershipRow>("tenant_users", &query)
            .await
        {
            Ok(row) => Ok(LookupOutcome::Found(Box::new(TenantMembership {
                tenant_user: row.tenant_user,
                tenant: row.tenants,
                profile: row.profiles,
            }))),
            Err(StoreError::RowNotFound) => Ok(LookupOutcome::NotFound),
            Err(e) => Err(e),
        }
    }

    async fn create_profile(&self, data: &ProfileCreate) -> StoreResult<Profile> {
        self.rest.insert("profiles", data).await
    }

    async fn create_tenant(&self, data: &TenantCreate) -> StoreResult<Tenant> {
        self.rest.insert("tenants", data).await
    }

    async fn create_tenant_user(&self, data: &TenantUserCreate) -> StoreResult<TenantUser> {
        self.rest.insert("tenant_users", data).await
    }
}

#[async_trait]
impl CatalogStore for RemoteStore {
    async fn tenant_by_slug(&self, slug: &str) -> StoreResult<Tenant> {
        let query = Query::new().eq("slug", slug);
        self.rest.select_single("tenants", &query).await
    }

    async fn list_categories(&self, tenant_id: Uuid) -> StoreResult<Vec<Category>> {
        let query = Query::new().eq("tenant_id", tenant_id).order_asc("name");
        self.rest.select("categories", &query).await
    }

    async fn create_category(&self, tenant_id: Uuid, data: &CategoryCreate) -> StoreResult<Category> {
        self.rest
            .insert("categories", &Scoped { tenant_id, data })
            .await
    }

    async fn update_category(&self, id: Uuid, data: &CategoryUpdate) -> StoreResult<Category> {
        let query = Query::new().eq("id", id);
        self.rest.update("categories", &query, data).await
    }

    async fn delete_category(&self, id: Uuid) -> StoreResult<()> {
        let query = Query::new().eq("id", id);
        self.rest.delete("categories", &query).await
    }

    async fn list_menu_items(&self, tenant_id: Uuid) -> StoreResult<Vec<MenuItem>> {
        let query = Query::new().eq("tenant_id", tenant_id);
        self.rest.select("menu_items", &query).await
    }

    async fn create_menu_item(&self, tenant_id: Uuid, data: &MenuItemCreate) -> StoreResult<MenuItem> {
        self.rest
            .insert("menu_items", &Scoped { tenant_id, data })
            .await
    }

    async fn update_menu_item(&self, id: Uuid, data: &MenuItemUpdate) -> StoreResult<MenuItem> {
        let query = Query::new().eq("id", id);
        self.rest.update("menu_items", &query, data).await
    }

    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<()> {
        let query = Query::new().eq("id", id);
        self.rest.delete("menu_items", &query).await
    }

    async fn delete_menu_items_in_category(&self, category_id: Uuid) -> StoreResult<()> {
        let query = Query::new().eq("category_id", category_id);
        self.rest.delete("menu_items", &query).await
    }
}

#[async_trait]
impl PromotionStore for RemoteStore {
    async fn list_promotions(&self, tenant_id: Uuid) -> StoreResult<Vec<Promotion>> {
        let query = Query::new().eq("tenant_id", tenant_id).order_desc("starts_at");
        self.rest.select("promotions", &query).await
    }

    async fn create_promotion(
        &self,
        tenant_id: Uuid,
        data: &PromotionCreate,
    ) -> StoreResult<Promotion> {
        self.rest
            .insert("promotions", &Scoped { tenant_id, data })
            .await
    }

    async fn update_promotion(&self, id: Uuid, data: &PromotionUpdate) -> StoreResult<Promotion> {
        let query = Query::new().eq("id", id);
        self.rest.update("promotions", &query, data).await
    }

    async fn delete_promotion(&self, id: Uuid) -> StoreResult<()> {
        let query = Query::new().eq("id", id);
        self.rest.delete("promotions", &query).await
    }
}

#[async_trait]
impl OrderStore for RemoteStore {
    async fn list_orders(&self, tenant_id: Uuid) -> StoreResult<Vec<Order>> {
        let query = Query::new()
            .eq("tenant_id", tenant_id)
            .order_desc("created_at");
        self.rest.select("orders", &query).await
    }

    async fn update_order(&self, id: Uuid, data: &OrderUpdate) -> StoreResult<Order> {
        let query = Query::new().eq("id", id);
        self.rest.update("orders", &query, data).await
    }

    async fn upsert_customer(&self, data: &CustomerUpsert) -> StoreResult<Customer> {
        self.rest
            .upsert("customers", "tenant_id,phone", data)
            .await
    }

    async fn insert_order(&self, data: &OrderCreate) -> StoreResult<Order> {
        self.rest.insert("orders", data).await
    }

    async fn insert_order_items(&self, rows: &[OrderItemCreate]) -> StoreResult<Vec<OrderItem>> {
        self.rest.insert_many("order_items", rows).await
    }

    async fn list_order_items(&self, order_id: Uuid) -> StoreResult<Vec<OrderItem>> {
        let query = Query::new().eq("order_id", order_id);
        self.rest.select("order_items", &query).await
    }

    async fn delete_order(&self, id: Uuid) -> StoreResult<()> {
        let query = Query::new().eq("id", id);
        self.rest.delete("orders", &query).await
    }
}

#[async_trait]
impl TenantStore for RemoteStore {
    async fn update_tenant(&self, id: Uuid, data: &TenantUpdate) -> StoreResult<Tenant> {
        let query = Query::new().eq("id", id);
        self.rest.update("tenants", &query, data).await
    }
}
