//! Order models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use customer_ops_core::{CustomerId, OrderId, OrderStatus, UserId};

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Document ID.
    pub id: OrderId,
    /// Short title shown in lists.
    #[serde(default)]
    pub title: String,
    /// Free-text description of the order.
    #[serde(default)]
    pub summary: String,
    /// Lifecycle status.
    #[serde(default)]
    pub status: OrderStatus,
    /// Customer account the order belongs to.
    pub customer_id: Option<CustomerId>,
    /// Staff member responsible for the order.
    pub assigned_to_uid: Option<UserId>,
    /// Requested delivery date.
    pub delivery_date: Option<NaiveDate>,
    /// Whether staff have opened the order yet.
    #[serde(default)]
    pub viewed: bool,
    /// User who submitted the order.
    pub created_by_uid: Option<UserId>,
    /// When the order was submitted.
    pub created_at: Option<DateTime<Utc>>,
    /// When the order was last written.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Case-insensitive substring match on title, customer ID and summary.
    ///
    /// An empty needle matches everything.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let customer = self.customer_id.as_ref().map_or("", |c| c.as_str());
        [self.title.as_str(), customer, self.summary.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Input for submitting a new order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    /// Order title (required, trimmed).
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub summary: Option<String>,
    /// Customer account. Ignored for customer users, who are pinned to
    /// their own account.
    #[serde(default, alias = "customer")]
    pub customer_id: Option<CustomerId>,
    /// Requested delivery date.
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
}

/// Filter criteria for listing orders.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Only orders in this status (`None` means all).
    pub status: Option<OrderStatus>,
    /// Substring search over title, customer ID and summary.
    pub search: Option<String>,
}

impl OrderFilter {
    /// Whether an order passes the filter.
    #[must_use]
    pub fn accepts(&self, order: &Order) -> bool {
        self.status.is_none_or(|s| order.status == s)
            && self
                .search
                .as_deref()
                .is_none_or(|q| order.matches_search(q))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(title: &str, customer: &str, summary: &str) -> Order {
        Order {
            id: OrderId::new("o1"),
            title: title.to_owned(),
            summary: summary.to_owned(),
            status: OrderStatus::Submitted,
            customer_id: Some(CustomerId::new(customer)),
            assigned_to_uid: None,
            delivery_date: None,
            viewed: false,
            created_by_uid: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let o = order("Spring Order", "cust-1", "Two hundred pairs");
        assert!(o.matches_search("spring"));
        assert!(o.matches_search("CUST-1"));
        assert!(o.matches_search("hundred"));
        assert!(!o.matches_search("winter"));
        assert!(o.matches_search("  "));
    }

    #[test]
    fn test_filter_by_status() {
        let o = order("A", "c", "");
        let confirmed = OrderFilter {
            status: Some(OrderStatus::Confirmed),
            search: None,
        };
        assert!(!confirmed.accepts(&o));
        assert!(OrderFilter::default().accepts(&o));
    }

    #[test]
    fn test_create_input_accepts_customer_alias() {
        let input: CreateOrderInput =
            serde_json::from_str(r#"{"title": "Spring Order", "customer": "cust-1"}"#).unwrap();
        assert_eq!(input.customer_id, Some(CustomerId::new("cust-1")));
    }

    #[test]
    fn test_order_reads_camel_case_document() {
        let o: Order = serde_json::from_value(serde_json::json!({
            "id": "o9",
            "title": "T",
            "status": "in_progress",
            "customerId": "c1",
            "deliveryDate": "2025-03-01",
        }))
        .unwrap();
        assert_eq!(o.status, OrderStatus::InProgress);
        assert!(!o.viewed);
        assert_eq!(o.delivery_date, NaiveDate::from_ymd_opt(2025, 3, 1));
    }
}
