//! Catalog products.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, Price, ProductId, timestamp};

/// A product as served by the catalog backend.
///
/// Products are owned by the backend; the storefront only ever holds
/// transient read copies (and snapshots inside cart lines).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    pub price: Decimal,
    #[serde(rename = "productAvailable", default)]
    pub available: bool,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "timestamp::listing_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
}

impl Product {
    /// Whether the product cannot be added at all.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        !self.available || self.stock_quantity <= 0
    }

    /// Whether the backend holds an image for this product.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image_name.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Unit price in the given currency.
    #[must_use]
    pub const fn unit_price(&self, currency: CurrencyCode) -> Price {
        Price::new(self.price, currency)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use super::*;

    /// Build an in-stock product for tests.
    pub fn product(id: i64, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            brand: "Acme".to_string(),
            category: "misc".to_string(),
            price: Decimal::from(price),
            available: true,
            stock_quantity: 10,
            description: String::new(),
            release_date: None,
            image_name: None,
            image_type: None,
        }
    }
}
