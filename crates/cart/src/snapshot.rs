//! Serializable cart state for the host's local store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use storefront_core::Entity;

use crate::error::CartError;
use crate::line::CartLine;

/// `{ "lines": [...] }`, what the host persists between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// Check the cart invariants: positive quantities, one line per product.
    pub fn validate(&self) -> Result<(), CartError> {
        let mut seen = HashSet::with_capacity(self.lines.len());
        for line in &self.lines {
            if line.quantity == 0 {
                return Err(CartError::InvalidSnapshot(format!(
                    "line for product {} has quantity 0",
                    line.product_id
                )));
            }
            if !seen.insert(*line.id()) {
                return Err(CartError::InvalidSnapshot(format!(
                    "duplicate line for product {}",
                    line.product_id
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate persisted JSON.
    pub fn from_json(json: &str) -> Result<Self, CartError> {
        let snapshot: CartSnapshot =
            serde_json::from_str(json).map_err(|e| CartError::InvalidSnapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{Money, ProductId};

    fn line(id: u64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            title: format!("product {id}"),
            unit_price: Money::from_cents(1_000),
            image_ref: String::new(),
            quantity,
        }
    }

    #[test]
    fn persisted_shape_uses_camel_case_fields() {
        let snapshot = CartSnapshot {
            lines: vec![line(1, 2)],
        };
        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        let first = &json["lines"][0];
        assert_eq!(first["productId"], 1);
        assert_eq!(first["unitPrice"], 10.0);
        assert_eq!(first["quantity"], 2);
        assert!(first.get("imageRef").is_some());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let snapshot = CartSnapshot {
            lines: vec![line(1, 0)],
        };
        assert!(matches!(snapshot.validate(), Err(CartError::InvalidSnapshot(_))));
    }

    #[test]
    fn duplicate_products_are_rejected() {
        let snapshot = CartSnapshot {
            lines: vec![line(1, 1), line(1, 3)],
        };
        assert!(matches!(snapshot.validate(), Err(CartError::InvalidSnapshot(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn malformed_json_is_an_invalid_snapshot() {
        assert!(matches!(
            CartSnapshot::from_json("{\"lines\": [{\"productId\": \"x\"}]}"),
            Err(CartError::InvalidSnapshot(_))
        ));
        assert!(matches!(
            CartSnapshot::from_json("{\"lines\": [{\"productId\": 1, \"title\": \"a\", \"unitPrice\": 1.0, \"quantity\": -2}]}"),
            Err(CartError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn missing_lines_key_means_empty_cart() {
        assert_eq!(CartSnapshot::from_json("{}").unwrap(), CartSnapshot::default());
    }
}
