//! `PostgreSQL` document store.
//!
//! All collections share one table, `portal_documents`, keyed by
//! `(collection, id)` with the document body in a JSONB column. Equality
//! filters run in the database as a containment match (`data @> $filters`);
//! ordering is applied in process so that both backends order identically.
//!
//! Subscriptions are served in process: after each write through this store,
//! watched queries on the written collection are re-run and pushed to their
//! subscribers. Writes made by other processes are not observed.
//!
//! # Migrations
//!
//! Stored in `crates/portal/migrations/` and applied with:
//! ```bash
//! cargo run -p customer-ops-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;

use super::{
    ChangeHub, CollectionPath, Document, DocumentStore, Fields, Query, StoreError, Subscription,
    new_document_id,
};

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Fields>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            fields: row.data.0,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Document store backed by a `PostgreSQL` JSONB table.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    hub: ChangeHub,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            hub: ChangeHub::new(),
        }
    }

    /// The underlying pool (shared with the session store).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, data
            FROM portal_documents
            WHERE collection = $1 AND data @> $2
            ORDER BY seq
            ",
        )
        .bind(query.collection.as_str())
        .bind(Json(query.filter_object()))
        .fetch_all(&self.pool)
        .await?;

        let mut docs: Vec<Document> = rows.into_iter().map(Document::from).collect();
        query.sort(&mut docs);
        Ok(docs)
    }

    async fn notify(&self, collection: &CollectionPath) {
        for (query, tx) in self.hub.watchers_for(collection) {
            match self.fetch(&query).await {
                Ok(snapshot) => {
                    tx.send_replace(snapshot);
                }
                Err(e) => {
                    tracing::warn!(
                        collection = %collection,
                        error = %e,
                        "Failed to refresh query subscription"
                    );
                }
            }
        }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get(
        &self,
        collection: &CollectionPath,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, data
            FROM portal_documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.fetch(query).await
    }

    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String, StoreError> {
        let id = new_document_id();
        sqlx::query(
            r"
            INSERT INTO portal_documents (collection, id, data)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(collection.as_str())
        .bind(&id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;

        self.notify(collection).await;
        Ok(id)
    }

    async fn update(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r"
            UPDATE portal_documents
            SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_owned(),
            });
        }

        self.notify(collection).await;
        Ok(())
    }

    async fn set_merge(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO portal_documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = portal_documents.data || EXCLUDED.data, updated_at = NOW()
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;

        self.notify(collection).await;
        Ok(())
    }

    async fn delete(&self, collection: &CollectionPath, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM portal_documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            self.notify(collection).await;
        }
        Ok(())
    }

    async fn watch(&self, query: Query) -> Result<Subscription, StoreError> {
        let initial = self.fetch(&query).await?;
        Ok(self.hub.register(query, initial))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
