//! In-process document store.
//!
//! Used by the test suites and when the portal runs without a database.
//! Contents are lost on restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::{
    ChangeHub, CollectionPath, Document, DocumentStore, Fields, Query, StoreError, Subscription,
    new_document_id,
};

struct Row {
    seq: u64,
    fields: Fields,
}

/// Document store held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, Row>>>,
    seq: AtomicU64,
    hub: ChangeHub,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live query subscriptions.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.hub.len()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn run_query(&self, query: &Query) -> Vec<Document> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(rows) = collections.get(query.collection.as_str()) else {
            return Vec::new();
        };

        let mut matched: Vec<(u64, Document)> = rows
            .iter()
            .filter(|(_, row)| query.matches(&row.fields))
            .map(|(id, row)| {
                (
                    row.seq,
                    Document {
                        id: id.clone(),
                        fields: row.fields.clone(),
                    },
                )
            })
            .collect();
        drop(collections);

        matched.sort_by_key(|(seq, _)| *seq);
        let mut docs: Vec<Document> = matched.into_iter().map(|(_, doc)| doc).collect();
        query.sort(&mut docs);
        docs
    }

    fn notify(&self, collection: &CollectionPath) {
        for (query, tx) in self.hub.watchers_for(collection) {
            tx.send_replace(self.run_query(&query));
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(
        &self,
        collection: &CollectionPath,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(collections
            .get(collection.as_str())
            .and_then(|rows| rows.get(id))
            .map(|row| Document {
                id: id.to_owned(),
                fields: row.fields.clone(),
            }))
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        Ok(self.run_query(query))
    }

    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String, StoreError> {
        let id = new_document_id();
        let seq = self.next_seq();
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(collection.as_str().to_owned())
            .or_default()
            .insert(id.clone(), Row { seq, fields });
        self.notify(collection);
        Ok(id)
    }

    async fn update(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        {
            let mut collections = self
                .collections
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let row = collections
                .get_mut(collection.as_str())
                .and_then(|rows| rows.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_owned(),
                })?;
            row.fields.extend(fields);
        }
        self.notify(collection);
        Ok(())
    }

    async fn set_merge(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let seq = self.next_seq();
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(collection.as_str().to_owned())
            .or_default()
            .entry(id.to_owned())
            .or_insert_with(|| Row {
                seq,
                fields: Fields::new(),
            })
            .fields
            .extend(fields);
        self.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: &CollectionPath, id: &str) -> Result<(), StoreError> {
        let removed = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(collection.as_str())
            .and_then(|rows| rows.remove(id))
            .is_some();
        if removed {
            self.notify(collection);
        }
        Ok(())
    }

    async fn watch(&self, query: Query) -> Result<Subscription, StoreError> {
        let initial = self.run_query(&query);
        Ok(self.hub.register(query, initial))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
