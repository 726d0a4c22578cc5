//! Resource managers
//!
//! One manager per tenant-scoped entity type, all following the same
//! contract: every read is filtered to the active tenant, every create
//! forces the active tenant onto the row, and the local collection is
//! reconciled from the store's response after each mutation — replace
//! on update, remove only after a confirmed delete. A failed list
//! degrades to an empty collection plus a returned error; nothing
//! panics past a manager.

mod categories;
mod menu;
mod orders;
mod promotions;
mod settings;

pub use categories::CategoryManager;
pub use menu::MenuItemManager;
pub use orders::OrderManager;
pub use promotions::PromotionManager;
pub use settings::SettingsManager;
