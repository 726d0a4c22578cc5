//! Order manager (operator flow)

use std::sync::Arc;

use uuid::Uuid;

use orderly_client::store::OrderStore;
use shared::models::{Order, OrderItem, OrderStatus, OrderUpdate, PaymentStatus};

use crate::error::{AppError, AppResult};

/// Tenant-scoped order view for the dashboard.
///
/// Orders are created by checkout, never here; this manager reads them
/// and advances their status along the fulfilment chain.
pub struct OrderManager<S> {
    store: Arc<S>,
    tenant_id: Uuid,
    orders: Vec<Order>,
}

impl<S: OrderStore> OrderManager<S> {
    pub fn new(store: Arc<S>, tenant_id: Uuid) -> Self {
        Self {
            store,
            tenant_id,
            orders: Vec::new(),
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Reload from the store, newest first.
    pub async fn refresh(&mut self) -> AppResult<()> {
        match self.store.list_orders(self.tenant_id).await {
            Ok(mut rows) => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                self.orders = rows;
                Ok(())
            }
            Err(e) => {
                self.orders.clear();
                Err(e.into())
            }
        }
    }

    pub async fn items_of(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        Ok(self.store.list_order_items(order_id).await?)
    }

    /// Advance an order's status, enforcing the state machine:
    /// pending -> preparing -> ready -> completed, cancelled from any
    /// non-terminal state.
    pub async fn set_status(&mut self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let current = self
            .orders
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::Validation("unknown order".to_string()))?;
        if !current.status.can_transition_to(status) {
            return Err(AppError::Validation(format!(
                "cannot move order from {:?} to {:?}",
                current.status, status
            )));
        }
        let data = OrderUpdate {
            status: Some(status),
            ..OrderUpdate::default()
        };
        let order = self.store.update_order(id, &data).await?;
        if let Some(existing) = self.orders.iter_mut().find(|o| o.id == id) {
            *existing = order.clone();
        }
        Ok(order)
    }

    /// Mark an order paid (pickup counter flow).
    pub async fn set_payment_status(
        &mut self,
        id: Uuid,
        payment_status: PaymentStatus,
    ) -> AppResult<Order> {
        let data = OrderUpdate {
            payment_status: Some(payment_status),
            ..OrderUpdate::default()
        };
        let order = self.store.update_order(id, &data).await?;
        if let Some(existing) = self.orders.iter_mut().find(|o| o.id == id) {
            *existing = order.clone();
        }
        Ok(order)
    }
}
