//! In-memory store and auth backends
//!
//! In-process implementations of the store and auth traits, used by
//! tests and local development. They mirror the remote backend's
//! observable behavior: the (tenant_id, phone) customer conflict key,
//! per-tenant unique promotion codes, globally unique slugs, and
//! postgres-style conflict messages.
//!
//! Every operation bumps an operation counter so tests can assert that
//! a code path issued no store calls at all, and single named
//! operations can be made to fail once via [`MemoryStore::fail_on`].

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use shared::models::{
    Category, CategoryCreate, CategoryUpdate, Customer, CustomerUpsert, MenuItem, MenuItemCreate,
    MenuItemUpdate, Order, OrderCreate, OrderItem, OrderItemCreate, OrderUpdate, Profile,
    ProfileCreate, Promotion, PromotionCreate, PromotionUpdate, Tenant, TenantCreate,
    TenantMembership, TenantUpdate, TenantUser, TenantUserCreate,
};

use crate::session::{AuthClient, AuthEvent, AuthEventKind, AuthEvents, AuthUser, Session, SignupMetadata};
use crate::store::{
    CatalogStore, IdentityStore, LookupOutcome, OrderStore, PromotionStore, TenantStore,
};
use crate::{AuthError, AuthResult, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    profiles: Vec<Profile>,
    tenants: Vec<Tenant>,
    tenant_users: Vec<TenantUser>,
    categories: Vec<Category>,
    menu_items: Vec<MenuItem>,
    promotions: Vec<Promotion>,
    customers: Vec<Customer>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
}

/// In-memory tenant data store.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    ops: AtomicU64,
    failures: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations issued so far.
    pub fn ops(&self) -> u64 {
        self.ops.load(Ordering::SeqCst)
    }

    /// Make the next call to the named operation fail once.
    pub fn fail_on(&self, op: &str) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(op.to_string());
        }
    }

    /// Count the operation and apply any injected failure.
    fn guard(&self, op: &str) -> StoreResult<()> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let mut failures = self.lock_failures()?;
        if failures.remove(op) {
            return Err(StoreError::Internal(format!("injected failure: {}", op)));
        }
        Ok(())
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Internal("state lock poisoned".to_string()))
    }

    fn lock_failures(&self) -> StoreResult<std::sync::MutexGuard<'_, HashSet<String>>> {
        self.failures
            .lock()
            .map_err(|_| StoreError::Internal("state lock poisoned".to_string()))
    }

    fn conflict(constraint: &str) -> StoreError {
        StoreError::Conflict(format!(
            "duplicate key value violates unique constraint \"{}\"",
            constraint
        ))
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn lookup_membership(&self, user_id: Uuid) -> StoreResult<LookupOutcome> {
        self.guard("lookup_membership")?;
        let tables = self.lock()?;
        let Some(tenant_user) = tables
            .tenant_users
            .iter()
            .find(|tu| tu.user_id == user_id)
            .cloned()
        else {
            return Ok(LookupOutcome::NotFound);
        };
        let tenant = tables
            .tenants
            .iter()
            .find(|t| t.id == tenant_user.tenant_id)
            .cloned()
            .ok_or(StoreError::RowNotFound)?;
        let profile = tables
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .cloned()
            .ok_or(StoreError::RowNotFound)?;
        Ok(LookupOutcome::Found(Box::new(TenantMembership {
            tenant_user,
            tenant,
            profile,
        })))
    }

    async fn create_profile(&self, data: &ProfileCreate) -> StoreResult<Profile> {
        self.guard("create_profile")?;
        let mut tables = self.lock()?;
        if tables.profiles.iter().any(|p| p.id == data.id) {
            return Err(Self::conflict("profiles_pkey"));
        }
        let profile = Profile {
            id: data.id,
            full_name: data.full_name.clone(),
            avatar_url: data.avatar_url.clone(),
        };
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn create_tenant(&self, data: &TenantCreate) -> StoreResult<Tenant> {
        self.guard("create_tenant")?;
        let mut tables = self.lock()?;
        if tables.tenants.iter().any(|t| t.slug == data.slug) {
            return Err(Self::conflict("tenants_slug_key"));
        }
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            slug: data.slug.clone(),
            store_type: data.store_type,
            logo_url: String::new(),
            primary_color: String::new(),
            contact_email: data.contact_email.clone(),
            contact_phone: String::new(),
            address: String::new(),
        };
        tables.tenants.push(tenant.clone());
        Ok(tenant)
    }

    async fn create_tenant_user(&self, data: &TenantUserCreate) -> StoreResult<TenantUser> {
        self.guard("create_tenant_user")?;
        let mut tables = self.lock()?;
        if tables
            .tenant_users
            .iter()
            .any(|tu| tu.tenant_id == data.tenant_id && tu.user_id == data.user_id)
        {
            return Err(Self::conflict("tenant_users_tenant_id_user_id_key"));
        }
        let tenant_user = TenantUser {
            id: Uuid::new_v4(),
            tenant_id: data.tenant_id,
            user_id: data.user_id,
            role: data.role,
            is_active: true,
        };
        tables.tenant_users.push(tenant_user.clone());
        Ok(tenant_user)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn tenant_by_slug(&self, slug: &str) -> StoreResult<Tenant> {
        self.guard("tenant_by_slug")?;
        let tables = self.lock()?;
        tables
            .tenants
            .iter()
            .find(|t| t.slug == slug)
            .cloned()
            .ok_or(StoreError::RowNotFound)
    }

    async fn list_categories(&self, tenant_id: Uuid) -> StoreResult<Vec<Category>> {
        self.guard("list_categories")?;
        let tables = self.lock()?;
        let mut rows: Vec<Category> = tables
            .categories
            .iter()
            .filter(|c| c.tenant_id == tenant_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create_category(&self, tenant_id: Uuid, data: &CategoryCreate) -> StoreResult<Category> {
        self.guard("create_category")?;
        let mut tables = self.lock()?;
        let category = Category {
            id: Uuid::new_v4(),
            tenant_id,
            name: data.name.clone(),
            sort_order: data.sort_order.unwrap_or(0),
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: Uuid, data: &CategoryUpdate) -> StoreResult<Category> {
        self.guard("update_category")?;
        let mut tables = self.lock()?;
        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::RowNotFound)?;
        if let Some(name) = &data.name {
            category.name = name.clone();
        }
        if let Some(sort_order) = data.sort_order {
            category.sort_order = sort_order;
        }
        Ok(category.clone())
    }

    async fn delete_category(&self, id: Uuid) -> StoreResult<()> {
        self.guard("delete_category")?;
        let mut tables = self.lock()?;
        tables.categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn list_menu_items(&self, tenant_id: Uuid) -> StoreResult<Vec<MenuItem>> {
        self.guard("list_menu_items")?;
        let tables = self.lock()?;
        Ok(tables
            .menu_items
            .iter()
            .filter(|m| m.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn create_menu_item(&self, tenant_id: Uuid, data: &MenuItemCreate) -> StoreResult<MenuItem> {
        self.guard("create_menu_item")?;
        let mut tables = self.lock()?;
        let item = MenuItem {
            id: Uuid::new_v4(),
            tenant_id,
            category_id: data.category_id,
            name: data.name.clone(),
            description: data.description.clone().unwrap_or_default(),
            image_url: data.image_url.clone().unwrap_or_default(),
            price: data.price,
            discount_price: None,
            is_available: data.is_available.unwrap_or(true),
        };
        tables.menu_items.push(item.clone());
        Ok(item)
    }

    async fn update_menu_item(&self, id: Uuid, data: &MenuItemUpdate) -> StoreResult<MenuItem> {
        self.guard("update_menu_item")?;
        let mut tables = self.lock()?;
        let item = tables
            .menu_items
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::RowNotFound)?;
        if let Some(category_id) = data.category_id {
            item.category_id = Some(category_id);
        }
        if let Some(name) = &data.name {
            item.name = name.clone();
        }
        if let Some(description) = &data.description {
            item.description = description.clone();
        }
        if let Some(image_url) = &data.image_url {
            item.image_url = image_url.clone();
        }
        if let Some(price) = data.price {
            item.price = price;
        }
        if let Some(is_available) = data.is_available {
            item.is_available = is_available;
        }
        Ok(item.clone())
    }

    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<()> {
        self.guard("delete_menu_item")?;
        let mut tables = self.lock()?;
        tables.menu_items.retain(|m| m.id != id);
        Ok(())
    }

    async fn delete_menu_items_in_category(&self, category_id: Uuid) -> StoreResult<()> {
        self.guard("delete_menu_items_in_category")?;
        let mut tables = self.lock()?;
        tables
            .menu_items
            .retain(|m| m.category_id != Some(category_id));
        Ok(())
    }
}

#[async_trait]
impl PromotionStore for MemoryStore {
    async fn list_promotions(&self, tenant_id: Uuid) -> StoreResult<Vec<Promotion>> {
        self.guard("list_promotions")?;
        let tables = self.lock()?;
        Ok(tables
            .promotions
            .iter()
            .filter(|p| p.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn create_promotion(
        &self,
        tenant_id: Uuid,
        data: &PromotionCreate,
    ) -> StoreResult<Promotion> {
        self.guard("create_promotion")?;
        let mut tables = self.lock()?;
        if tables
            .promotions
            .iter()
            .any(|p| p.tenant_id == tenant_id && p.code == data.code)
        {
            return Err(Self::conflict("promotions_tenant_id_code_key"));
        }
        let promotion = Promotion {
            id: Uuid::new_v4(),
            tenant_id,
            code: data.code.clone(),
            description: data.description.clone().unwrap_or_default(),
            discount_type: data.discount_type,
            discount_value: data.discount_value,
            min_spend: data.min_spend,
            starts_at: data.starts_at,
            ends_at: data.ends_at,
            is_active: data.is_active.unwrap_or(true),
        };
        tables.promotions.push(promotion.clone());
        Ok(promotion)
    }

    async fn update_promotion(&self, id: Uuid, data: &PromotionUpdate) -> StoreResult<Promotion> {
        self.guard("update_promotion")?;
        let mut tables = self.lock()?;
        let promotion = tables
            .promotions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::RowNotFound)?;
        if let Some(code) = &data.code {
            promotion.code = code.clone();
        }
        if let Some(description) = &data.description {
            promotion.description = description.clone();
        }
        if let Some(discount_type) = data.discount_type {
            promotion.discount_type = discount_type;
        }
        if let Some(discount_value) = data.discount_value {
            promotion.discount_value = discount_value;
        }
        if let Some(min_spend) = data.min_spend {
            promotion.min_spend = Some(min_spend);
        }
        if let Some(starts_at) = data.starts_at {
            promotion.starts_at = starts_at;
        }
        if let Some(ends_at) = data.ends_at {
            promotion.ends_at = ends_at;
        }
        if let Some(is_active) = data.is_active {
            promotion.is_active = is_active;
        }
        Ok(promotion.clone())
    }

    async fn delete_promotion(&self, id: Uuid) -> StoreResult<()> {
        self.guard("delete_promotion")?;
        let mut tables = self.lock()?;
        tables.promotions.retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn list_orders(&self, tenant_id: Uuid) -> StoreResult<Vec<Order>> {
        self.guard("list_orders")?;
        let tables = self.lock()?;
        let mut rows: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| o.tenant_id == tenant_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_order(&self, id: Uuid, data: &OrderUpdate) -> StoreResult<Order> {
        self.guard("update_order")?;
        let mut tables = self.lock()?;
        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::RowNotFound)?;
        if let Some(status) = data.status {
            order.status = status;
        }
        if let Some(payment_status) = data.payment_status {
            order.payment_status = payment_status;
        }
        Ok(order.clone())
    }

    async fn upsert_customer(&self, data: &CustomerUpsert) -> StoreResult<Customer> {
        self.guard("upsert_customer")?;
        let mut tables = self.lock()?;
        if let Some(existing) = tables
            .customers
            .iter_mut()
            .find(|c| c.tenant_id == data.tenant_id && c.phone == data.phone)
        {
            existing.name = data.name.clone();
            return Ok(existing.clone());
        }
        let customer = Customer {
            id: Uuid::new_v4(),
            tenant_id: data.tenant_id,
            name: data.name.clone(),
            phone: data.phone.clone(),
            email: None,
        };
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    async fn insert_order(&self, data: &OrderCreate) -> StoreResult<Order> {
        self.guard("insert_order")?;
        let mut tables = self.lock()?;
        let order = Order {
            id: Uuid::new_v4(),
            tenant_id: data.tenant_id,
            customer_id: data.customer_id,
            order_number: data.order_number.clone(),
            order_type: data.order_type,
            status: data.status,
            payment_status: data.payment_status,
            pickup_reservation_at: data.pickup_reservation_at,
            total: data.total,
            created_at: Utc::now(),
        };
        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn insert_order_items(&self, rows: &[OrderItemCreate]) -> StoreResult<Vec<OrderItem>> {
        self.guard("insert_order_items")?;
        let mut tables = self.lock()?;
        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            let item = OrderItem {
                id: Uuid::new_v4(),
                order_id: row.order_id,
                menu_item_id: row.menu_item_id,
                quantity: row.quantity,
                line_total: row.line_total,
            };
            tables.order_items.push(item.clone());
            inserted.push(item);
        }
        Ok(inserted)
    }

    async fn list_order_items(&self, order_id: Uuid) -> StoreResult<Vec<OrderItem>> {
        self.guard("list_order_items")?;
        let tables = self.lock()?;
        Ok(tables
            .order_items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn delete_order(&self, id: Uuid) -> StoreResult<()> {
        self.guard("delete_order")?;
        let mut tables = self.lock()?;
        tables.orders.retain(|o| o.id != id);
        tables.order_items.retain(|i| i.order_id != id);
        Ok(())
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn update_tenant(&self, id: Uuid, data: &TenantUpdate) -> StoreResult<Tenant> {
        self.guard("update_tenant")?;
        let mut tables = self.lock()?;
        let tenant = tables
            .tenants
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::RowNotFound)?;
        if let Some(name) = &data.name {
            tenant.name = name.clone();
        }
        if let Some(logo_url) = &data.logo_url {
            tenant.logo_url = logo_url.clone();
        }
        if let Some(primary_color) = &data.primary_color {
            tenant.primary_color = primary_color.clone();
        }
        if let Some(contact_email) = &data.contact_email {
            tenant.contact_email = contact_email.clone();
        }
        if let Some(contact_phone) = &data.contact_phone {
            tenant.contact_phone = contact_phone.clone();
        }
        if let Some(address) = &data.address {
            tenant.address = address.clone();
        }
        Ok(tenant.clone())
    }
}

struct MemoryUser {
    email: String,
    password: String,
    user: AuthUser,
}

/// In-memory session provider.
#[derive(Default)]
pub struct MemoryAuth {
    users: Mutex<Vec<MemoryUser>>,
    events: AuthEvents,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce a restored session, mirroring `RemoteAuth`.
    pub fn announce_initial(&self, session: Option<Session>) {
        self.events.emit(AuthEventKind::InitialSession, session);
    }

    fn lock_users(&self) -> AuthResult<std::sync::MutexGuard<'_, Vec<MemoryUser>>> {
        self.users
            .lock()
            .map_err(|_| AuthError::Internal("state lock poisoned".to_string()))
    }
}

#[async_trait]
impl AuthClient for MemoryAuth {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> AuthResult<()> {
        let mut users = self.lock_users()?;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::Validation(
                "User already registered".to_string(),
            ));
        }
        users.push(MemoryUser {
            email: email.to_string(),
            password: password.to_string(),
            user: AuthUser {
                id: Uuid::new_v4(),
                email: email.to_string(),
                user_metadata: metadata,
            },
        });
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session> {
        let session = {
            let users = self.lock_users()?;
            let user = users
                .iter()
                .find(|u| u.email == email && u.password == password)
                .ok_or(AuthError::InvalidCredentials)?;
            Session {
                access_token: Uuid::new_v4().to_string(),
                refresh_token: Some(Uuid::new_v4().to_string()),
                user: user.user.clone(),
            }
        };
        self.events
            .emit(AuthEventKind::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.events.emit(AuthEventKind::SignedOut, None);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
