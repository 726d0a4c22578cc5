//! Public storefront: browse, cart, checkout

mod cart;
mod checkout;

pub use cart::{Cart, CartError, CartLine};
pub use checkout::{Checkout, CustomerContact, PlacedOrder};

use tracing::warn;
use uuid::Uuid;

use orderly_client::store::CatalogStore;
use shared::models::{Category, MenuItem, Tenant};

use crate::error::AppResult;

/// Everything the public storefront page needs for one tenant.
#[derive(Debug, Clone)]
pub struct StorefrontView {
    pub tenant: Tenant,
    pub categories: Vec<Category>,
    pub menu_items: Vec<MenuItem>,
}

impl StorefrontView {
    /// Load the storefront for `slug`. The tenant resolve must come
    /// first; categories and menu items are independent and fetched
    /// concurrently.
    pub async fn load<S: CatalogStore>(store: &S, slug: &str) -> AppResult<StorefrontView> {
        let tenant = store.tenant_by_slug(slug).await.map_err(|e| {
            warn!(%slug, error = %e, "storefront tenant resolve failed");
            e
        })?;

        let (categories, menu_items) = tokio::join!(
            store.list_categories(tenant.id),
            store.list_menu_items(tenant.id)
        );
        let mut categories = categories?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(StorefrontView {
            tenant,
            categories,
            menu_items: menu_items?,
        })
    }

    /// Menu items for the selected category tab; `None` means all.
    pub fn visible_items(&self, category_id: Option<Uuid>) -> Vec<&MenuItem> {
        match category_id {
            Some(id) => self
                .menu_items
                .iter()
                .filter(|i| i.category_id == Some(id))
                .collect(),
            None => self.menu_items.iter().collect(),
        }
    }
}
