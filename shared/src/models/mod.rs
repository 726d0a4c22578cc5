//! Data model entities
//!
//! One module per table of the tenant data store. Every tenant-scoped
//! entity carries its `tenant_id`; create payloads for scoped entities
//! deliberately omit it so the managers can force the active tenant.

mod category;
mod customer;
mod menu_item;
mod order;
mod profile;
mod promotion;
mod tenant;
mod tenant_user;

pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use customer::{Customer, CustomerUpsert};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{
    Order, OrderCreate, OrderItem, OrderItemCreate, OrderStatus, OrderType, OrderUpdate,
    PaymentStatus,
};
pub use profile::{Profile, ProfileCreate};
pub use promotion::{DiscountType, Promotion, PromotionCreate, PromotionUpdate};
pub use tenant::{StoreType, Tenant, TenantCreate, TenantUpdate};
pub use tenant_user::{TenantMembership, TenantUser, TenantUserCreate, UserRole};

/// Fallback image used when a profile or menu item has no upload yet.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iNDAwIiBoZWlnaHQ9IjMwMCIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iNDAwIiBoZWlnaHQ9IjMwMCIgZmlsbD0iI2VlZSIgLz48dGV4dCB4PSI1MCUiIHk9IjUwJSIgZG9taW5hbnQtYmFzZWxpbmU9Im1pZGRsZSIgdGV4dC1hbmNob3I9Im1pZGRsZSIgZm9udC1mYW1pbHk9InNhbnMtc2VyaWYiIGZvbnQtc2l6ZT0iMjRweCIgZmlsbD0iI2NjYyI+SW1hZ2U8L3RleHQ+PC9zdmc+";
