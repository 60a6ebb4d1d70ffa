//! Order comment repository.

use chrono::{DateTime, Utc};
use serde::Serialize;

use customer_ops_core::{CommentId, OrderId, UserId};

use super::{COMMENTS, order_child};
use crate::models::Comment;
use crate::store::{CollectionPath, Direction, DocumentStore, Query, StoreError, decode_all, encode};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentDocument<'a> {
    message: &'a str,
    created_by_uid: &'a UserId,
    created_by_name: &'a str,
    parent_id: Option<&'a CommentId>,
    created_at: DateTime<Utc>,
}

/// Repository for the comments of one order.
pub struct CommentRepository<'a> {
    store: &'a dyn DocumentStore,
    collection: CollectionPath,
}

impl<'a> CommentRepository<'a> {
    /// Create a repository scoped to `order_id`.
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore, order_id: &OrderId) -> Self {
        Self {
            store,
            collection: order_child(order_id.as_str(), COMMENTS),
        }
    }

    /// All comments of the order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a document is malformed.
    pub async fn list(&self) -> Result<Vec<Comment>, StoreError> {
        let query =
            Query::collection(self.collection.clone()).order_by("createdAt", Direction::Ascending);
        decode_all(&self.store.query(&query).await?)
    }

    /// Whether a comment with this ID exists in the order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails.
    pub async fn exists(&self, id: &CommentId) -> Result<bool, StoreError> {
        Ok(self
            .store
            .get(&self.collection, id.as_str())
            .await?
            .is_some())
    }

    /// Post a comment, optionally as a reply.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn create(
        &self,
        message: &str,
        author_uid: &UserId,
        author_name: &str,
        parent_id: Option<&CommentId>,
    ) -> Result<CommentId, StoreError> {
        let doc = CommentDocument {
            message,
            created_by_uid: author_uid,
            created_by_name: author_name,
            parent_id,
            created_at: Utc::now(),
        };
        let id = self.store.add(&self.collection, encode(&doc)?).await?;
        Ok(CommentId::new(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_replies_keep_parent_reference() {
        let store = MemoryStore::new();
        let repo = CommentRepository::new(&store, &OrderId::new("o1"));
        let author = UserId::new("u1");

        let root = repo.create("Any update?", &author, "Ana", None).await.unwrap();
        repo.create("Shipping Friday", &author, "Sam", Some(&root))
            .await
            .unwrap();

        let comments = repo.list().await.unwrap();
        assert_eq!(comments.len(), 2);
        assert!(!comments[0].is_reply());
        assert_eq!(comments[1].parent_id.as_ref(), Some(&root));
        assert!(repo.exists(&root).await.unwrap());
    }
}
