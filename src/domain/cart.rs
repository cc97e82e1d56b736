//! Cart domain entities.
//!
//! A cart's `total` is a derived value: outside an in-flight mutation it
//! always equals the sum of `quantity * unit_price` over its line items.
//! Totals are recomputed from the full item set after every mutation rather
//! than patched incrementally.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Shopping cart aggregate root.
///
/// At most one cart with `is_active = true` exists per user; it is created
/// lazily on the first item addition.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Cart {
    pub id: i32,
    pub user_id: i32,
    pub is_active: bool,
    /// Derived: `Σ item.quantity × item.unit_price`
    #[schema(value_type = String, example = "50.00")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single product line within a cart.
///
/// `unit_price` is a snapshot captured when the product was first added;
/// later catalog price changes do not affect existing lines.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(value_type = String, example = "10.00")]
    pub unit_price: Decimal,
}

impl CartItem {
    /// Line subtotal (`quantity × unit_price`).
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A cart together with its line items, as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartContents {
    #[serde(flatten)]
    pub cart: Cart,
    pub items: Vec<CartItem>,
}

/// Full recompute of a cart total from its current line items.
pub fn cart_total(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::subtotal).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(product_id: i32, quantity: i32, unit_price: Decimal) -> CartItem {
        CartItem {
            id: product_id,
            cart_id: 1,
            product_id,
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_total_sums_line_subtotals() {
        let items = vec![
            item(7, 5, dec!(10.00)),
            item(9, 2, dec!(3.25)),
            item(12, 1, dec!(0.99)),
        ];
        assert_eq!(cart_total(&items), dec!(57.49));
    }

    #[test]
    fn test_subtotal_uses_snapshot_price() {
        let line = item(7, 3, dec!(19.90));
        assert_eq!(line.subtotal(), dec!(59.70));
    }
}
