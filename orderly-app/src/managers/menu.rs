//! Menu item manager

use std::sync::Arc;

use uuid::Uuid;

use orderly_client::store::CatalogStore;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

use crate::error::AppResult;

/// Tenant-scoped menu item view state and mutations.
pub struct MenuItemManager<S> {
    store: Arc<S>,
    tenant_id: Uuid,
    items: Vec<MenuItem>,
}

impl<S: CatalogStore> MenuItemManager<S> {
    pub fn new(store: Arc<S>, tenant_id: Uuid) -> Self {
        Self {
            store,
            tenant_id,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Items in one category, or everything when no filter is set.
    pub fn items_in(&self, category_id: Option<Uuid>) -> Vec<&MenuItem> {
        match category_id {
            Some(id) => self
                .items
                .iter()
                .filter(|i| i.category_id == Some(id))
                .collect(),
            None => self.items.iter().collect(),
        }
    }

    pub async fn refresh(&mut self) -> AppResult<()> {
        match self.store.list_menu_items(self.tenant_id).await {
            Ok(rows) => {
                self.items = rows;
                Ok(())
            }
            Err(e) => {
                self.items.clear();
                Err(e.into())
            }
        }
    }

    pub async fn create(&mut self, data: MenuItemCreate) -> AppResult<MenuItem> {
        let item = self.store.create_menu_item(self.tenant_id, &data).await?;
        self.items.push(item.clone());
        Ok(item)
    }

    pub async fn update(&mut self, id: Uuid, data: MenuItemUpdate) -> AppResult<MenuItem> {
        let item = self.store.update_menu_item(id, &data).await?;
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == id) {
            *existing = item.clone();
        }
        Ok(item)
    }

    pub async fn delete(&mut self, id: Uuid) -> AppResult<()> {
        self.store.delete_menu_item(id).await?;
        self.items.retain(|i| i.id != id);
        Ok(())
    }

    /// Narrow availability toggle; touches no other field.
    pub async fn set_available(&mut self, id: Uuid, is_available: bool) -> AppResult<MenuItem> {
        let data = MenuItemUpdate {
            is_available: Some(is_available),
            ..MenuItemUpdate::default()
        };
        self.update(id, data).await
    }
}
