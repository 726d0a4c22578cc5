//! In-memory storefront cart
//!
//! Transient by design: the cart lives only in view state and is lost
//! on navigation away without checkout.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use shared::models::MenuItem;

/// One cart line: a menu item snapshot and its quantity.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: MenuItem,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.item.price * Decimal::from(self.quantity)
    }
}

/// Cart errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Sold-out items cannot be added.
    #[error("item is not available")]
    ItemUnavailable,
}

/// Pending order, keyed by menu item identity.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total unit count across all lines.
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Add one unit of `item`: increment the existing line if the item
    /// is already in the cart, otherwise append a new line.
    pub fn add(&mut self, item: &MenuItem) -> Result<(), CartError> {
        if !item.is_available {
            return Err(CartError::ItemUnavailable);
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.item.id == item.id) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine {
                item: item.clone(),
                quantity: 1,
            });
        }
        Ok(())
    }

    /// Drop a line entirely.
    pub fn remove(&mut self, item_id: Uuid) {
        self.lines.retain(|l| l.item.id != item_id);
    }

    /// Exact sum of price x quantity over all lines.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
