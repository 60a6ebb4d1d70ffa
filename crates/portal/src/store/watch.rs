//! Query subscriptions.
//!
//! Each watched query owns a `tokio::sync::watch` channel holding its latest
//! result set. Backends call [`ChangeHub::watchers_for`] after every write and
//! push a fresh snapshot into each affected channel with `send_replace`, so
//! slow subscribers only ever see the newest snapshot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::Stream;
use tokio::sync::watch;

use super::{CollectionPath, Document, Query};

struct Watcher {
    query: Query,
    tx: watch::Sender<Vec<Document>>,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    watchers: HashMap<u64, Watcher>,
}

/// Registry of live query subscriptions for one store.
#[derive(Clone, Default)]
pub struct ChangeHub {
    inner: Arc<Mutex<HubInner>>,
}

impl ChangeHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription whose first snapshot is `initial`.
    #[must_use]
    pub fn register(&self, query: Query, initial: Vec<Document>) -> Subscription {
        let (tx, rx) = watch::channel(initial);
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.watchers.insert(id, Watcher { query, tx });
        drop(inner);

        tracing::debug!(watcher_id = id, "Registered query subscription");
        Subscription {
            id,
            hub: self.clone(),
            rx,
            primed: false,
        }
    }

    /// Queries and senders of every subscription on `collection`.
    #[must_use]
    pub fn watchers_for(
        &self,
        collection: &CollectionPath,
    ) -> Vec<(Query, watch::Sender<Vec<Document>>)> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner
            .watchers
            .values()
            .filter(|w| &w.query.collection == collection)
            .map(|w| (w.query.clone(), w.tx.clone()))
            .collect()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .watchers
            .len()
    }

    /// Whether there are no live subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, id: u64) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.watchers.remove(&id);
    }
}

/// A live query subscription.
///
/// Dropping the subscription unregisters it from its store.
pub struct Subscription {
    id: u64,
    hub: ChangeHub,
    rx: watch::Receiver<Vec<Document>>,
    primed: bool,
}

impl Subscription {
    /// The most recent snapshot, without waiting.
    #[must_use]
    pub fn current(&self) -> Vec<Document> {
        self.rx.borrow().clone()
    }

    /// Wait for the next unseen snapshot.
    ///
    /// The first call returns the snapshot taken at subscription time. Returns
    /// `None` once the store side has gone away.
    pub async fn next(&mut self) -> Option<Vec<Document>> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Turn the subscription into a stream of snapshots.
    pub fn into_stream(mut self) -> impl Stream<Item = Vec<Document>> + Send {
        async_stream::stream! {
            while let Some(snapshot) = self.next().await {
                yield snapshot;
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.release(self.id);
        tracing::debug!(watcher_id = self.id, "Released query subscription");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(name: &str) -> Query {
        Query::collection(CollectionPath::root(name))
    }

    #[tokio::test]
    async fn test_first_next_returns_initial_snapshot() {
        let hub = ChangeHub::new();
        let mut sub = hub.register(query("orders"), Vec::new());
        assert_eq!(sub.next().await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_send_replace_wakes_subscriber() {
        let hub = ChangeHub::new();
        let mut sub = hub.register(query("orders"), Vec::new());
        sub.next().await.unwrap();

        let doc = Document {
            id: "o1".into(),
            fields: serde_json::Map::new(),
        };
        for (_, tx) in hub.watchers_for(&CollectionPath::root("orders")) {
            tx.send_replace(vec![doc.clone()]);
        }
        assert_eq!(sub.next().await, Some(vec![doc]));
    }

    #[test]
    fn test_watchers_filtered_by_collection() {
        let hub = ChangeHub::new();
        let _orders = hub.register(query("orders"), Vec::new());
        let _products = hub.register(query("products"), Vec::new());
        assert_eq!(hub.watchers_for(&CollectionPath::root("orders")).len(), 1);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let hub = ChangeHub::new();
        let sub = hub.register(query("orders"), Vec::new());
        assert_eq!(hub.len(), 1);
        drop(sub);
        assert!(hub.is_empty());
    }
}
