//! Catalogue product models.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use customer_ops_core::{Price, ProductId};

const fn default_true() -> bool {
    true
}

/// A catalogue product, either current or announced for a future season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Document ID.
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    /// Unit price in the default currency.
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Free-form specification table (weight, fit, origin, ...).
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    /// Missing means active; only an explicit `false` hides a product.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Announced but not yet orderable.
    #[serde(default)]
    pub is_future: bool,
    /// Free-text launch window such as "Spring 2025".
    pub launch_date: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price with currency, for display.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from_amount(self.price)
    }

    /// Case-insensitive substring match on name or SKU.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self.sku.to_lowercase().contains(&needle)
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    /// Product name (required, trimmed).
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    #[serde(default)]
    pub is_future: bool,
    #[serde(default)]
    pub launch_date: Option<String>,
}

/// Input for updating a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_future: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_active_means_active() {
        let product: Product =
            serde_json::from_value(serde_json::json!({"id": "p1", "name": "Atlas", "price": 285}))
                .unwrap();
        assert!(product.active);
        assert!(!product.is_future);
        assert_eq!(product.unit_price().display(), "$285.00");
    }

    #[test]
    fn test_search_matches_name_or_sku() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "p1", "name": "Atlas Selvage Raw", "sku": "ORB-ATL-001"
        }))
        .unwrap();
        assert!(product.matches_search("selvage"));
        assert!(product.matches_search("orb-atl"));
        assert!(!product.matches_search("eclipse"));
    }
}
