//! Placed orders, read back from the order service.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, ProductId, timestamp};

/// A previously placed order. Created by the order service; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(with = "timestamp::placed_at")]
    pub placed_at: NaiveDateTime,
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<Decimal>,
}

const fn default_quantity() -> u32 {
    1
}

impl Order {
    /// Number of item rows in the order.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Human-readable placement time, e.g. "May 1, 2024 3:04 PM".
    #[must_use]
    pub fn placed_at_display(&self) -> String {
        self.placed_at.format("%b %-d, %Y %-I:%M %p").to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_order_with_sparse_items() {
        let json = r#"{
            "id": 9,
            "items": [{"productId": 1, "quantity": 2}, {"productName": "Mug"}],
            "placedAt": "2024-05-01T15:04:00"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, OrderId::new(9));
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[1].quantity, 1);
        assert_eq!(order.placed_at_display(), "May 1, 2024 3:04 PM");
    }

    #[test]
    fn test_deserializes_epoch_millis() {
        let json = r#"{"id": 1, "items": [], "placedAt": 0}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.placed_at_display(), "Jan 1, 1970 12:00 AM");
    }

    #[test]
    fn test_rejects_unparseable_timestamp() {
        let json = r#"{"id": 1, "items": [], "placedAt": "yesterday"}"#;
        assert!(serde_json::from_str::<Order>(json).is_err());
    }
}
