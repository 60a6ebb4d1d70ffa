//! Document store abstraction.
//!
//! Every record in the portal lives in a hosted-style document store: named
//! collections of JSON documents addressed by generated string IDs, with
//! sub-collections nested under a parent document (`orders/{id}/tasks`).
//!
//! # Primitives
//!
//! - `get` - load one document by ID
//! - `query` - equality filters plus a single order-by field
//! - `add` - insert with a generated ID
//! - `update` - partial merge into an existing document
//! - `set_merge` - create-or-merge at a known ID
//! - `delete` - remove a document (missing documents are not an error)
//! - `watch` - subscribe to full result-set snapshots of a query
//!
//! # Backends
//!
//! - [`MemoryStore`] - in-process maps, used for tests and database-less runs
//! - [`PgStore`] - a single JSONB table in `PostgreSQL`
//!
//! Neither backend offers transactions across documents; each write is atomic
//! on its own and the last write wins.

pub mod memory;
pub mod postgres;
pub mod query;
pub mod watch;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use query::{Direction, OrderBy, Query};
pub use watch::{ChangeHub, Subscription};

/// Field map of a stored document (the document body without its ID).
pub type Fields = serde_json::Map<String, Value>;

/// Store handle shared across services and handlers.
pub type SharedStore = Arc<dyn DocumentStore>;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A record could not be converted to or from a document.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document does not exist (only raised by `update`).
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// Collection path that was addressed.
        collection: String,
        /// Document ID that was addressed.
        id: String,
    },

    /// A record serialized to something other than a JSON object.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// Path of a collection, e.g. `orders` or `orders/abc123/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// A top-level collection.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// A sub-collection nested under one document of this collection.
    #[must_use]
    pub fn child(&self, doc_id: &str, name: &str) -> Self {
        Self(format!("{}/{doc_id}/{name}", self.0))
    }

    /// The path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored document: its ID plus its field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-generated (or caller-chosen) document ID.
    pub id: String,
    /// Document body.
    pub fields: Fields,
}

impl Document {
    /// Decode the document into a typed record.
    ///
    /// The document ID is injected as an `id` field, so records declare their
    /// ID as an ordinary field.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the fields do not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_owned(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// Encode a record or patch into a document field map.
///
/// Any `id` field is dropped, because the ID is addressed separately.
///
/// # Errors
///
/// Returns `StoreError::InvalidDocument` if `value` does not serialize to a
/// JSON object.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(StoreError::InvalidDocument(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Decode every document of a result set, failing on the first bad one.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if any document does not match `T`.
pub fn decode_all<T: DeserializeOwned>(docs: &[Document]) -> Result<Vec<T>, StoreError> {
    docs.iter().map(Document::decode).collect()
}

/// Generate a new document ID.
#[must_use]
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Document store client.
///
/// Implementations are cheap to share behind an [`Arc`]; see [`SharedStore`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// Load one document by ID.
    async fn get(
        &self,
        collection: &CollectionPath,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// Run a query and return the full result set.
    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Insert a document with a generated ID and return the ID.
    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String, StoreError>;

    /// Merge `fields` into an existing document.
    ///
    /// Fails with `StoreError::NotFound` if the document does not exist.
    async fn update(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Merge `fields` into the document at `id`, creating it if absent.
    async fn set_merge(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete(&self, collection: &CollectionPath, id: &str) -> Result<(), StoreError>;

    /// Subscribe to a query.
    ///
    /// The subscription yields the current result set first, then a fresh
    /// snapshot after every write to the watched collection.
    async fn watch(&self, query: Query) -> Result<Subscription, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
