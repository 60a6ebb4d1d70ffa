//! Order repository, including the order timeline sub-collection.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;

use customer_ops_core::{CustomerId, OrderId, OrderStatus, TimelineKind, UserId};

use super::{ORDERS, UPDATES, order_child, patch};
use crate::models::{Order, TimelineEntry};
use crate::store::{
    CollectionPath, Direction, DocumentStore, Query, StoreError, Subscription, decode_all, encode,
};

/// A validated order ready to be written.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub title: String,
    pub summary: String,
    pub customer_id: CustomerId,
    pub delivery_date: Option<NaiveDate>,
    pub created_by_uid: UserId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderDocument<'a> {
    title: &'a str,
    summary: &'a str,
    status: OrderStatus,
    customer_id: &'a CustomerId,
    assigned_to_uid: Option<&'a UserId>,
    delivery_date: Option<NaiveDate>,
    viewed: bool,
    created_by_uid: &'a UserId,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineDocument<'a> {
    #[serde(rename = "type")]
    kind: TimelineKind,
    message: &'a str,
    created_by_uid: &'a UserId,
    created_by_name: Option<&'a str>,
    created_at: chrono::DateTime<Utc>,
}

/// Repository for orders and their timeline.
pub struct OrderRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    fn collection() -> CollectionPath {
        CollectionPath::root(ORDERS)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails or the document is malformed.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        self.store
            .get(&Self::collection(), id.as_str())
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    /// List orders newest first, optionally scoped to one customer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a document is malformed.
    pub async fn list(&self, customer: Option<&CustomerId>) -> Result<Vec<Order>, StoreError> {
        let mut query =
            Query::collection(Self::collection()).order_by("createdAt", Direction::Descending);
        if let Some(customer) = customer {
            query = query.where_eq("customerId", customer.as_str());
        }
        decode_all(&self.store.query(&query).await?)
    }

    /// Submit a new order in `submitted` status, unviewed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn create(&self, order: &NewOrder) -> Result<OrderId, StoreError> {
        let now = Utc::now();
        let doc = OrderDocument {
            title: &order.title,
            summary: &order.summary,
            status: OrderStatus::Submitted,
            customer_id: &order.customer_id,
            assigned_to_uid: None,
            delivery_date: order.delivery_date,
            viewed: false,
            created_by_uid: &order.created_by_uid,
            created_at: now,
            updated_at: now,
        };
        let id = self.store.add(&Self::collection(), encode(&doc)?).await?;
        Ok(OrderId::new(id))
    }

    /// Set the order status.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order does not exist.
    pub async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), StoreError> {
        let fields = patch(&json!({ "status": status, "updatedAt": Utc::now() }))?;
        self.store
            .update(&Self::collection(), id.as_str(), fields)
            .await
    }

    /// Set or clear the assigned staff member.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order does not exist.
    pub async fn update_assignment(
        &self,
        id: &OrderId,
        assignee: Option<&UserId>,
    ) -> Result<(), StoreError> {
        let fields = patch(&json!({ "assignedToUid": assignee, "updatedAt": Utc::now() }))?;
        self.store
            .update(&Self::collection(), id.as_str(), fields)
            .await
    }

    /// Flag the order as seen by staff.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order does not exist.
    pub async fn mark_viewed(&self, id: &OrderId) -> Result<(), StoreError> {
        let fields = patch(&json!({ "viewed": true }))?;
        self.store
            .update(&Self::collection(), id.as_str(), fields)
            .await
    }

    /// Query matching orders that staff have not opened yet.
    #[must_use]
    pub fn unviewed_query() -> Query {
        Query::collection(Self::collection()).where_eq("viewed", false)
    }

    /// Number of unviewed orders.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn count_unviewed(&self) -> Result<usize, StoreError> {
        Ok(self.store.query(&Self::unviewed_query()).await?.len())
    }

    /// Subscribe to the set of unviewed orders.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the initial snapshot cannot be loaded.
    pub async fn watch_unviewed(&self) -> Result<Subscription, StoreError> {
        self.store.watch(Self::unviewed_query()).await
    }

    // =========================================================================
    // Timeline
    // =========================================================================

    /// Timeline entries of an order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a document is malformed.
    pub async fn list_updates(&self, id: &OrderId) -> Result<Vec<TimelineEntry>, StoreError> {
        let query = Query::collection(order_child(id.as_str(), UPDATES))
            .order_by("createdAt", Direction::Descending);
        decode_all(&self.store.query(&query).await?)
    }

    /// Append one timeline entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn append_update(
        &self,
        id: &OrderId,
        kind: TimelineKind,
        message: &str,
        actor_uid: &UserId,
        actor_name: Option<&str>,
    ) -> Result<(), StoreError> {
        let doc = TimelineDocument {
            kind,
            message,
            created_by_uid: actor_uid,
            created_by_name: actor_name,
            created_at: Utc::now(),
        };
        self.store
            .add(&order_child(id.as_str(), UPDATES), encode(&doc)?)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn new_order(title: &str, customer: &str) -> NewOrder {
        NewOrder {
            title: title.to_owned(),
            summary: String::new(),
            customer_id: CustomerId::new(customer),
            delivery_date: None,
            created_by_uid: UserId::new("u1"),
        }
    }

    #[tokio::test]
    async fn test_create_starts_submitted_and_unviewed() {
        let store = MemoryStore::new();
        let repo = OrderRepository::new(&store);
        let id = repo.create(&new_order("Spring Order", "cust-1")).await.unwrap();

        let order = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Submitted);
        assert!(!order.viewed);
        assert_eq!(order.customer_id, Some(CustomerId::new("cust-1")));
        assert!(order.assigned_to_uid.is_none());
    }

    #[tokio::test]
    async fn test_list_scopes_by_customer_newest_first() {
        let store = MemoryStore::new();
        let repo = OrderRepository::new(&store);
        repo.create(&new_order("one", "c1")).await.unwrap();
        repo.create(&new_order("two", "c2")).await.unwrap();
        repo.create(&new_order("three", "c1")).await.unwrap();

        let titles: Vec<_> = repo
            .list(Some(&CustomerId::new("c1")))
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.title)
            .collect();
        assert_eq!(titles, vec!["three", "one"]);
        assert_eq!(repo.list(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_assignment_can_be_cleared() {
        let store = MemoryStore::new();
        let repo = OrderRepository::new(&store);
        let id = repo.create(&new_order("A", "c1")).await.unwrap();

        repo.update_assignment(&id, Some(&UserId::new("s1")))
            .await
            .unwrap();
        assert_eq!(
            repo.get(&id).await.unwrap().unwrap().assigned_to_uid,
            Some(UserId::new("s1"))
        );

        repo.update_assignment(&id, None).await.unwrap();
        assert!(repo.get(&id).await.unwrap().unwrap().assigned_to_uid.is_none());
    }

    #[tokio::test]
    async fn test_unviewed_count() {
        let store = MemoryStore::new();
        let repo = OrderRepository::new(&store);
        let id = repo.create(&new_order("A", "c1")).await.unwrap();
        repo.create(&new_order("B", "c1")).await.unwrap();
        assert_eq!(repo.count_unviewed().await.unwrap(), 2);

        repo.mark_viewed(&id).await.unwrap();
        assert_eq!(repo.count_unviewed().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_timeline_lists_newest_first() {
        let store = MemoryStore::new();
        let repo = OrderRepository::new(&store);
        let id = repo.create(&new_order("A", "c1")).await.unwrap();
        let actor = UserId::new("s1");

        repo.append_update(&id, TimelineKind::Created, "Order submitted", &actor, None)
            .await
            .unwrap();
        repo.append_update(
            &id,
            TimelineKind::StatusChange,
            "Status changed to confirmed",
            &actor,
            Some("Sam"),
        )
        .await
        .unwrap();

        let updates = repo.list_updates(&id).await.unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].kind, TimelineKind::StatusChange);
        assert_eq!(updates[0].created_by_name.as_deref(), Some("Sam"));
    }

    #[tokio::test]
    async fn test_same_timestamp_updates_list_latest_first() {
        let store = MemoryStore::new();
        let repo = OrderRepository::new(&store);
        let id = repo.create(&new_order("Spring Order", "cust-1")).await.unwrap();

        let updates = order_child(id.as_str(), UPDATES);
        for (kind, message) in [
            ("created", "Order submitted"),
            ("status_change", "Status changed to in progress"),
        ] {
            let fields = encode(&json!({
                "type": kind,
                "message": message,
                "createdAt": "2025-03-01T10:00:00Z",
            }))
            .unwrap();
            store.add(&updates, fields).await.unwrap();
        }

        let listed = repo.list_updates(&id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].message, "Status changed to in progress");
        assert_eq!(listed[1].message, "Order submitted");
    }
}
