//! Orderly application core
//!
//! The tenant-scoped heart of the platform: session bootstrap (identity
//! resolution plus first-login provisioning), one resource manager per
//! entity type, and the storefront cart/checkout flow. Everything is
//! written against the store traits from `orderly-client`, so the same
//! code runs over the remote backend or the in-memory one.

pub mod bootstrap;
pub mod context;
pub mod error;
pub mod managers;
pub mod storefront;

pub use bootstrap::SessionBootstrap;
pub use context::{AppContext, SessionState};
pub use error::{AppError, AppResult};
pub use managers::{
    CategoryManager, MenuItemManager, OrderManager, PromotionManager, SettingsManager,
};
pub use storefront::{Cart, CartError, Checkout, CustomerContact, PlacedOrder, StorefrontView};
