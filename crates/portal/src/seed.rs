//! Demo catalogue seeding.
//!
//! The fixture is YAML with two lists, `products` and `lookbook`, each entry
//! carrying a fixed `id`. Seeding writes with set-merge at those IDs, so it
//! can be re-run safely.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use customer_ops_core::{LookbookPostId, ProductId};

use crate::db::{LookbookRepository, ProductRepository};
use crate::models::{CreateProductInput, LookbookPostInput};
use crate::store::{DocumentStore, StoreError};

/// The bundled demo fixture.
pub const DEMO_FIXTURE: &str = include_str!("../fixtures/demo.yaml");

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid fixture: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// A product entry in the fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    pub id: ProductId,
    #[serde(flatten)]
    pub product: CreateProductInput,
}

/// A lookbook entry in the fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPost {
    pub id: LookbookPostId,
    #[serde(flatten)]
    pub post: LookbookPostInput,
}

/// Parsed seed fixture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub products: Vec<SeedProduct>,
    #[serde(default)]
    pub lookbook: Vec<SeedPost>,
}

impl SeedData {
    /// Parse a fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Parse` if the YAML does not match the fixture shape.
    pub fn from_yaml(content: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// The bundled demo fixture.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Parse` if the bundled fixture is malformed.
    pub fn demo() -> Result<Self, SeedError> {
        Self::from_yaml(DEMO_FIXTURE)
    }

    /// Read a fixture from disk.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Io` if the file cannot be read.
    pub async fn from_file(path: &Path) -> Result<Self, SeedError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&content)
    }
}

/// Counts of seeded documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub posts: usize,
}

/// Write every fixture entry to the store.
///
/// # Errors
///
/// Returns `SeedError::Store` on the first failed write.
#[tracing::instrument(skip_all, fields(products = data.products.len(), posts = data.lookbook.len()))]
pub async fn seed(store: &dyn DocumentStore, data: &SeedData) -> Result<SeedSummary, SeedError> {
    let products = ProductRepository::new(store);
    for entry in &data.products {
        products.upsert(&entry.id, &entry.product).await?;
    }

    let lookbook = LookbookRepository::new(store);
    for entry in &data.lookbook {
        lookbook.upsert(&entry.id, &entry.post).await?;
    }

    let summary = SeedSummary {
        products: data.products.len(),
        posts: data.lookbook.len(),
    };
    tracing::info!(
        products = summary.products,
        posts = summary.posts,
        "Seeded demo catalogue"
    );
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use customer_ops_core::LookbookPostType;
    use rust_decimal::Decimal;

    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_demo_fixture_parses() {
        let data = SeedData::demo().unwrap();
        assert_eq!(data.products.len(), 13);
        assert_eq!(data.lookbook.len(), 6);

        let atlas = &data.products[0];
        assert_eq!(atlas.id.as_str(), "orb-001");
        assert_eq!(atlas.product.price, Decimal::from(285));
        assert_eq!(atlas.product.specs.get("inseam").map(String::as_str), Some("34\""));

        let future = data.products.iter().filter(|p| p.product.is_future).count();
        assert_eq!(future, 3);

        assert_eq!(data.lookbook[0].post.kind, LookbookPostType::Campaign);
        assert!(data.lookbook[0].post.featured);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = MemoryStore::new();
        let data = SeedData::demo().unwrap();

        seed(&store, &data).await.unwrap();
        let summary = seed(&store, &data).await.unwrap();
        assert_eq!(summary, SeedSummary { products: 13, posts: 6 });

        let products = ProductRepository::new(&store).list(false).await.unwrap();
        assert_eq!(products.len(), 13);
        assert!(products.iter().all(|p| p.active));

        let posts = LookbookRepository::new(&store).list().await.unwrap();
        assert_eq!(posts.len(), 6);
    }
}
