//! Home dashboard summary.

use serde::Serialize;

use customer_ops_core::OrderStatus;

use super::orders::{OrderError, OrderService};
use crate::models::{CurrentUser, Order, OrderFilter};
use crate::store::DocumentStore;

const RECENT_ORDERS: usize = 5;

/// Order counts and the most recent orders for the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total: usize,
    /// Orders that are neither closed nor cancelled.
    pub active: usize,
    pub in_progress: usize,
    pub delivered: usize,
    /// Newest first.
    pub recent: Vec<Order>,
}

impl Dashboard {
    /// Summarize orders that are already sorted newest first.
    #[must_use]
    pub fn summarize(orders: Vec<Order>) -> Self {
        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();
        let in_progress = count(OrderStatus::InProgress);
        let delivered = count(OrderStatus::Delivered);
        let active = orders.iter().filter(|o| o.status.is_active()).count();
        let total = orders.len();

        let mut recent = orders;
        recent.truncate(RECENT_ORDERS);

        Self {
            total,
            active,
            in_progress,
            delivered,
            recent,
        }
    }

    /// Load the dashboard for `viewer`, using the same scoping as the order list.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Store` if the orders cannot be read.
    pub async fn load(store: &dyn DocumentStore, viewer: &CurrentUser) -> Result<Self, OrderError> {
        let orders = OrderService::new(store)
            .list(viewer, &OrderFilter::default())
            .await?;
        Ok(Self::summarize(orders))
    }
}

#[cfg(test)]
mod tests {
    use customer_ops_core::OrderId;

    use super::*;

    fn order(id: usize, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(format!("o{id}")),
            title: format!("Order {id}"),
            summary: String::new(),
            status,
            customer_id: None,
            assigned_to_uid: None,
            delivery_date: None,
            viewed: false,
            created_by_uid: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_summarize_counts() {
        let orders = vec![
            order(1, OrderStatus::Submitted),
            order(2, OrderStatus::InProgress),
            order(3, OrderStatus::Delivered),
            order(4, OrderStatus::Closed),
            order(5, OrderStatus::Cancelled),
            order(6, OrderStatus::InProgress),
            order(7, OrderStatus::Confirmed),
        ];
        let dashboard = Dashboard::summarize(orders);

        assert_eq!(dashboard.total, 7);
        assert_eq!(dashboard.active, 5);
        assert_eq!(dashboard.in_progress, 2);
        assert_eq!(dashboard.delivered, 1);
        assert_eq!(dashboard.recent.len(), 5);
        assert_eq!(dashboard.recent[0].id.as_str(), "o1");
    }

    #[test]
    fn test_empty_dashboard() {
        assert_eq!(Dashboard::summarize(Vec::new()), Dashboard::default());
    }
}
