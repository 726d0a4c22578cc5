//! Checkout flow
//!
//! Converts a cart into customer + order + order-item rows. The writes
//! are strictly sequential, each awaited before the next. There is no
//! server-side transaction across them, so a failed item insert is
//! compensated by deleting the just-created order rather than leaving
//! an empty order behind.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use orderly_client::StoreError;
use orderly_client::store::OrderStore;
use shared::models::{
    Customer, CustomerUpsert, Order, OrderCreate, OrderItem, OrderItemCreate, OrderStatus,
    OrderType, PaymentStatus, Tenant,
};
use shared::util;

use crate::error::{AppError, AppResult};
use crate::storefront::Cart;

/// Pickup details collected at checkout.
#[derive(Debug, Clone)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
}

/// The committed order, returned to the confirmation view.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub customer: Customer,
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Storefront checkout against one store backend.
pub struct Checkout<S> {
    store: Arc<S>,
}

impl<S: OrderStore> Checkout<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Place a pickup order for the cart's contents.
    ///
    /// Validation happens before any store call; on success the cart
    /// is cleared.
    pub async fn place_order(
        &self,
        tenant: &Tenant,
        cart: &mut Cart,
        contact: &CustomerContact,
    ) -> AppResult<PlacedOrder> {
        if contact.name.trim().is_empty() || contact.phone.trim().is_empty() {
            return Err(AppError::Validation(
                "Please enter your name and phone number.".to_string(),
            ));
        }
        if cart.is_empty() {
            return Err(AppError::Validation("your cart is empty".to_string()));
        }

        let customer = self
            .store
            .upsert_customer(&CustomerUpsert {
                tenant_id: tenant.id,
                name: contact.name.clone(),
                phone: contact.phone.clone(),
            })
            .await
            .map_err(Self::checkout_failed)?;

        let subtotal = cart.subtotal();
        let order_number = util::order_number(&tenant.name, util::now_millis());
        let now = Utc::now();

        let order = self
            .store
            .insert_order(&OrderCreate {
                tenant_id: tenant.id,
                customer_id: customer.id,
                order_number,
                order_type: OrderType::Pickup,
                status: OrderStatus::Pending,
                payment_status: PaymentStatus::Unpaid,
                // No real scheduling yet; pickup is "now".
                pickup_reservation_at: now,
                total: subtotal,
            })
            .await
            .map_err(Self::checkout_failed)?;

        let rows: Vec<OrderItemCreate> = cart
            .lines()
            .iter()
            .map(|line| OrderItemCreate {
                order_id: order.id,
                menu_item_id: line.item.id,
                quantity: line.quantity,
                line_total: line.line_total(),
            })
            .collect();

        let items = match self.store.insert_order_items(&rows).await {
            Ok(items) => items,
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "order item insert failed, compensating");
                self.compensate(order.id).await;
                return Err(Self::checkout_failed(e));
            }
        };

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            tenant_id = %tenant.id,
            "order placed"
        );
        cart.clear();

        Ok(PlacedOrder {
            customer,
            order,
            items,
        })
    }

    /// Best-effort removal of an order whose items never landed.
    async fn compensate(&self, order_id: Uuid) {
        if let Err(e) = self.store.delete_order(order_id).await {
            // The orphan order stays behind; nothing more to do from
            // the client side.
            error!(%order_id, error = %e, "checkout compensation failed, orphan order remains");
        }
    }

    fn checkout_failed(source: StoreError) -> AppError {
        AppError::Checkout { source }
    }
}
