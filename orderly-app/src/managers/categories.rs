//! Category manager

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use orderly_client::store::CatalogStore;
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::error::AppResult;

/// Tenant-scoped category view state and mutations.
///
/// Categories are kept sorted by name ascending after every local
/// insert and update; the store's returned order is not trusted.
pub struct CategoryManager<S> {
    store: Arc<S>,
    tenant_id: Uuid,
    categories: Vec<Category>,
}

impl<S: CatalogStore> CategoryManager<S> {
    pub fn new(store: Arc<S>, tenant_id: Uuid) -> Self {
        Self {
            store,
            tenant_id,
            categories: Vec::new(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Reload from the store. On failure the local collection is
    /// emptied and the error returned for the caller to surface.
    pub async fn refresh(&mut self) -> AppResult<()> {
        match self.store.list_categories(self.tenant_id).await {
            Ok(mut rows) => {
                rows.sort_by(|a, b| a.name.cmp(&b.name));
                self.categories = rows;
                Ok(())
            }
            Err(e) => {
                self.categories.clear();
                Err(e.into())
            }
        }
    }

    pub async fn create(&mut self, data: CategoryCreate) -> AppResult<Category> {
        let category = self.store.create_category(self.tenant_id, &data).await?;
        self.categories.push(category.clone());
        self.resort();
        Ok(category)
    }

    pub async fn update(&mut self, id: Uuid, data: CategoryUpdate) -> AppResult<Category> {
        let category = self.store.update_category(id, &data).await?;
        if let Some(existing) = self.categories.iter_mut().find(|c| c.id == id) {
            *existing = category.clone();
        }
        self.resort();
        Ok(category)
    }

    /// Application-enforced cascade: dependent menu items go first. If
    /// that step fails the category row is left untouched.
    pub async fn delete(&mut self, id: Uuid) -> AppResult<()> {
        if let Err(e) = self.store.delete_menu_items_in_category(id).await {
            warn!(category_id = %id, error = %e, "dependent menu item delete failed, keeping category");
            return Err(e.into());
        }
        self.store.delete_category(id).await?;
        self.categories.retain(|c| c.id != id);
        Ok(())
    }

    fn resort(&mut self) {
        self.categories.sort_by(|a, b| a.name.cmp(&b.name));
    }
}
