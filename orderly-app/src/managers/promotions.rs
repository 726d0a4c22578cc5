//! Promotion manager

use std::sync::Arc;

use uuid::Uuid;

use orderly_client::store::PromotionStore;
use shared::models::{Promotion, PromotionCreate, PromotionUpdate};

use crate::error::AppResult;

/// Tenant-scoped promotion view state and mutations.
///
/// A duplicate code bubbles up as `StoreError::Conflict` carrying the
/// store's message verbatim.
pub struct PromotionManager<S> {
    store: Arc<S>,
    tenant_id: Uuid,
    promotions: Vec<Promotion>,
}

impl<S: PromotionStore> PromotionManager<S> {
    pub fn new(store: Arc<S>, tenant_id: Uuid) -> Self {
        Self {
            store,
            tenant_id,
            promotions: Vec::new(),
        }
    }

    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }

    pub async fn refresh(&mut self) -> AppResult<()> {
        match self.store.list_promotions(self.tenant_id).await {
            Ok(rows) => {
                self.promotions = rows;
                Ok(())
            }
            Err(e) => {
                self.promotions.clear();
                Err(e.into())
            }
        }
    }

    pub async fn create(&mut self, data: PromotionCreate) -> AppResult<Promotion> {
        let promotion = self.store.create_promotion(self.tenant_id, &data).await?;
        self.promotions.push(promotion.clone());
        Ok(promotion)
    }

    pub async fn update(&mut self, id: Uuid, data: PromotionUpdate) -> AppResult<Promotion> {
        let promotion = self.store.update_promotion(id, &data).await?;
        if let Some(existing) = self.promotions.iter_mut().find(|p| p.id == id) {
            *existing = promotion.clone();
        }
        Ok(promotion)
    }

    pub async fn delete(&mut self, id: Uuid) -> AppResult<()> {
        self.store.delete_promotion(id).await?;
        self.promotions.retain(|p| p.id != id);
        Ok(())
    }

    /// Narrow active-flag toggle.
    pub async fn set_active(&mut self, id: Uuid, is_active: bool) -> AppResult<Promotion> {
        let data = PromotionUpdate {
            is_active: Some(is_active),
            ..PromotionUpdate::default()
        };
        self.update(id, data).await
    }
}
