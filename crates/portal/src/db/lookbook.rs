//! Lookbook feed repository.

use chrono::Utc;
use serde_json::json;

use customer_ops_core::{LookbookCommentId, LookbookPostId, UserId};

use super::{COMMENTS, LOOKBOOK, patch};
use crate::models::{LookbookComment, LookbookPost, LookbookPostInput, UpdateLookbookPostInput};
use crate::store::{
    CollectionPath, Direction, DocumentStore, Fields, Query, StoreError, decode_all, encode,
};

/// Repository for lookbook posts and their comments.
pub struct LookbookRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> LookbookRepository<'a> {
    /// Create a new lookbook repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    fn collection() -> CollectionPath {
        CollectionPath::root(LOOKBOOK)
    }

    fn comments(post_id: &LookbookPostId) -> CollectionPath {
        Self::collection().child(post_id.as_str(), COMMENTS)
    }

    fn new_post_fields(input: &LookbookPostInput) -> Result<Fields, StoreError> {
        let now = json!(Utc::now());
        let mut fields = encode(input)?;
        fields.insert("title".to_owned(), json!(input.title.trim()));
        fields.insert("createdAt".to_owned(), now.clone());
        fields.insert("updatedAt".to_owned(), now);
        Ok(fields)
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// All posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a document is malformed.
    pub async fn list(&self) -> Result<Vec<LookbookPost>, StoreError> {
        let query =
            Query::collection(Self::collection()).order_by("createdAt", Direction::Descending);
        decode_all(&self.store.query(&query).await?)
    }

    /// Get a post by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails or the document is malformed.
    pub async fn get(&self, id: &LookbookPostId) -> Result<Option<LookbookPost>, StoreError> {
        self.store
            .get(&Self::collection(), id.as_str())
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    /// Publish a new post.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn create(&self, input: &LookbookPostInput) -> Result<LookbookPostId, StoreError> {
        let fields = Self::new_post_fields(input)?;
        let id = self.store.add(&Self::collection(), fields).await?;
        Ok(LookbookPostId::new(id))
    }

    /// Create or overwrite a post at a fixed ID (used by seeding).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn upsert(
        &self,
        id: &LookbookPostId,
        input: &LookbookPostInput,
    ) -> Result<(), StoreError> {
        let fields = Self::new_post_fields(input)?;
        self.store
            .set_merge(&Self::collection(), id.as_str(), fields)
            .await
    }

    /// Merge changes into a post.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the post does not exist.
    pub async fn update(
        &self,
        id: &LookbookPostId,
        input: &UpdateLookbookPostInput,
    ) -> Result<(), StoreError> {
        let mut fields = encode(input)?;
        fields.insert("updatedAt".to_owned(), json!(Utc::now()));
        self.store
            .update(&Self::collection(), id.as_str(), fields)
            .await
    }

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the delete fails.
    pub async fn delete(&self, id: &LookbookPostId) -> Result<(), StoreError> {
        self.store.delete(&Self::collection(), id.as_str()).await
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Comments on a post, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a document is malformed.
    pub async fn list_comments(
        &self,
        post_id: &LookbookPostId,
    ) -> Result<Vec<LookbookComment>, StoreError> {
        let query =
            Query::collection(Self::comments(post_id)).order_by("createdAt", Direction::Ascending);
        decode_all(&self.store.query(&query).await?)
    }

    /// Comment on a post.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn add_comment(
        &self,
        post_id: &LookbookPostId,
        message: &str,
        author_uid: &UserId,
        author_name: &str,
    ) -> Result<LookbookCommentId, StoreError> {
        let fields = patch(&json!({
            "message": message,
            "createdByUid": author_uid,
            "createdByName": author_name,
            "createdAt": Utc::now(),
        }))?;
        let id = self.store.add(&Self::comments(post_id), fields).await?;
        Ok(LookbookCommentId::new(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use customer_ops_core::LookbookPostType;

    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_create_update_and_comment() {
        let store = MemoryStore::new();
        let repo = LookbookRepository::new(&store);
        let id = repo
            .create(&LookbookPostInput {
                kind: LookbookPostType::Campaign,
                title: " Summer 2025 ".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let post = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(post.title, "Summer 2025");
        assert_eq!(post.kind, LookbookPostType::Campaign);

        repo.update(
            &id,
            &UpdateLookbookPostInput {
                featured: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(repo.get(&id).await.unwrap().unwrap().featured);

        repo.add_comment(&id, "Love it", &UserId::new("u1"), "Ana")
            .await
            .unwrap();
        let comments = repo.list_comments(&id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].created_by_name, "Ana");
    }
}
