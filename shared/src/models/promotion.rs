//! Promotion Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discount type for a promotion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage off the subtotal (discount_value = percent)
    Percent,
    /// Fixed amount off the subtotal
    Fixed,
}

/// Promotion entity
///
/// The code is unique per tenant; the store enforces the constraint and
/// its conflict message is surfaced verbatim on duplicate creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub min_spend: Option<Decimal>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Promotion {
    /// Discount this promotion grants on `subtotal` at `now`, or `None`
    /// when it is inactive, outside its validity window or below the
    /// minimum spend.
    pub fn discount_on(&self, subtotal: Decimal, now: DateTime<Utc>) -> Option<Decimal> {
        if !self.is_active || now < self.starts_at || now > self.ends_at {
            return None;
        }
        if let Some(min) = self.min_spend {
            if subtotal < min {
                return None;
            }
        }
        let discount = match self.discount_type {
            DiscountType::Percent => subtotal * self.discount_value / Decimal::from(100),
            DiscountType::Fixed => self.discount_value,
        };
        Some(discount.min(subtotal))
    }
}

/// Create promotion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionCreate {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub min_spend: Option<Decimal>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Update promotion payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromotionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub discount_value: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub min_spend: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promo(discount_type: DiscountType, value: i64, min_spend: Option<i64>) -> Promotion {
        let now = Utc::now();
        Promotion {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            code: "WELCOME".to_string(),
            description: String::new(),
            discount_type,
            discount_value: Decimal::from(value),
            min_spend: min_spend.map(Decimal::from),
            starts_at: now - Duration::hours(1),
            ends_at: now + Duration::hours(1),
            is_active: true,
        }
    }

    #[test]
    fn percent_discount_applies() {
        let p = promo(DiscountType::Percent, 10, None);
        let d = p.discount_on(Decimal::from(200), Utc::now());
        assert_eq!(d, Some(Decimal::from(20)));
    }

    #[test]
    fn fixed_discount_is_capped_at_subtotal() {
        let p = promo(DiscountType::Fixed, 50, None);
        let d = p.discount_on(Decimal::from(30), Utc::now());
        assert_eq!(d, Some(Decimal::from(30)));
    }

    #[test]
    fn min_spend_gates_discount() {
        let p = promo(DiscountType::Fixed, 20, Some(100));
        assert_eq!(p.discount_on(Decimal::from(99), Utc::now()), None);
        assert_eq!(
            p.discount_on(Decimal::from(100), Utc::now()),
            Some(Decimal::from(20))
        );
    }

    #[test]
    fn expired_promotion_grants_nothing() {
        let mut p = promo(DiscountType::Percent, 10, None);
        p.ends_at = Utc::now() - Duration::minutes(1);
        assert_eq!(p.discount_on(Decimal::from(200), Utc::now()), None);
    }
}
