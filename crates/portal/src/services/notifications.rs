//! Unread order notifications for staff.
//!
//! An order is unread while its `viewed` flag is false. The unread count is
//! recomputed from every snapshot of a live query on the orders collection.
//! The notification surface opens on the first zero to nonzero transition in
//! a session; the first snapshot only sets the baseline.

use futures::Stream;
use serde::Serialize;

use crate::db::OrderRepository;
use crate::store::{DocumentStore, StoreError, Subscription};

/// One step of the unread feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnreadUpdate {
    /// Current number of unviewed orders.
    pub count: usize,
    /// Whether the notification surface should open now.
    pub notify: bool,
}

/// Edge detector over successive unread counts.
#[derive(Debug, Clone, Default)]
pub struct UnreadTracker {
    baseline_set: bool,
    count: usize,
    opened: bool,
}

impl UnreadTracker {
    /// Create a tracker with no baseline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next count.
    ///
    /// `notify` is true only on a zero to nonzero edge after the baseline,
    /// and at most once per tracker.
    pub fn observe(&mut self, count: usize) -> UnreadUpdate {
        let previous = self.count;
        self.count = count;

        if !self.baseline_set {
            self.baseline_set = true;
            return UnreadUpdate {
                count,
                notify: false,
            };
        }

        let notify = !self.opened && previous == 0 && count > 0;
        if notify {
            self.opened = true;
        }
        UnreadUpdate { count, notify }
    }

    /// The last observed count.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Whether the notification has already opened this session.
    #[must_use]
    pub const fn has_opened(&self) -> bool {
        self.opened
    }
}

/// Subscribe to the unread count.
///
/// # Errors
///
/// Returns `StoreError` if the initial snapshot cannot be loaded.
pub async fn subscribe_unread(store: &dyn DocumentStore) -> Result<Subscription, StoreError> {
    OrderRepository::new(store).watch_unviewed().await
}

/// Turn an unread subscription into a stream of tracked updates.
///
/// The stream ends when the store side of the subscription goes away.
pub fn unread_updates(mut subscription: Subscription) -> impl Stream<Item = UnreadUpdate> + Send {
    async_stream::stream! {
        let mut tracker = UnreadTracker::new();
        while let Some(snapshot) = subscription.next().await {
            let update = tracker.observe(snapshot.len());
            if update.notify {
                tracing::info!(count = update.count, "New orders awaiting review");
            }
            yield update;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::StreamExt;
    use serde_json::json;

    use super::*;
    use crate::store::{CollectionPath, MemoryStore, encode};

    #[test]
    fn test_first_snapshot_is_baseline() {
        let mut tracker = UnreadTracker::new();
        let first = tracker.observe(3);
        assert_eq!(first.count, 3);
        assert!(!first.notify);
        assert!(!tracker.observe(4).notify);
    }

    #[test]
    fn test_opens_on_zero_to_nonzero() {
        let mut tracker = UnreadTracker::new();
        assert!(!tracker.observe(0).notify);
        assert!(tracker.observe(1).notify);
        assert!(!tracker.observe(2).notify);
        assert!(tracker.has_opened());
    }

    #[test]
    fn test_opens_at_most_once() {
        let mut tracker = UnreadTracker::new();
        tracker.observe(0);
        assert!(tracker.observe(1).notify);
        assert_eq!(tracker.observe(0).count, 0);
        let again = tracker.observe(5);
        assert_eq!(again.count, 5);
        assert!(!again.notify);
    }

    #[tokio::test]
    async fn test_stream_follows_store_writes() {
        let store = MemoryStore::new();
        let orders = CollectionPath::root(crate::db::ORDERS);
        let sub = subscribe_unread(&store).await.unwrap();
        let mut updates = Box::pin(unread_updates(sub));

        let baseline = updates.next().await.unwrap();
        assert_eq!(baseline, UnreadUpdate { count: 0, notify: false });

        store
            .add(&orders, encode(&json!({"title": "New", "viewed": false})).unwrap())
            .await
            .unwrap();
        let update = updates.next().await.unwrap();
        assert_eq!(update, UnreadUpdate { count: 1, notify: true });
    }
}
