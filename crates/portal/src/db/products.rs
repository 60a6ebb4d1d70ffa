//! Catalogue product repository.

use chrono::Utc;
use serde_json::json;

use customer_ops_core::ProductId;

use super::PRODUCTS;
use crate::models::{CreateProductInput, Product, UpdateProductInput};
use crate::store::{CollectionPath, Direction, DocumentStore, Fields, Query, StoreError, decode_all, encode};

/// Repository for catalogue products.
pub struct ProductRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    fn collection() -> CollectionPath {
        CollectionPath::root(PRODUCTS)
    }

    fn new_product_fields(input: &CreateProductInput) -> Result<Fields, StoreError> {
        let now = json!(Utc::now());
        let mut fields = encode(input)?;
        fields.insert("name".to_owned(), json!(input.name.trim()));
        fields.insert("active".to_owned(), json!(true));
        fields.insert("createdAt".to_owned(), now.clone());
        fields.insert("updatedAt".to_owned(), now);
        Ok(fields)
    }

    /// Products newest first.
    ///
    /// With `only_active`, products explicitly marked inactive are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a document is malformed.
    pub async fn list(&self, only_active: bool) -> Result<Vec<Product>, StoreError> {
        let query =
            Query::collection(Self::collection()).order_by("createdAt", Direction::Descending);
        let products: Vec<Product> = decode_all(&self.store.query(&query).await?)?;
        Ok(if only_active {
            products.into_iter().filter(|p| p.active).collect()
        } else {
            products
        })
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails or the document is malformed.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        self.store
            .get(&Self::collection(), id.as_str())
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    /// Create an active product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn create(&self, input: &CreateProductInput) -> Result<ProductId, StoreError> {
        let fields = Self::new_product_fields(input)?;
        let id = self.store.add(&Self::collection(), fields).await?;
        Ok(ProductId::new(id))
    }

    /// Create or overwrite a product at a fixed ID (used by seeding).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn upsert(
        &self,
        id: &ProductId,
        input: &CreateProductInput,
    ) -> Result<(), StoreError> {
        let fields = Self::new_product_fields(input)?;
        self.store
            .set_merge(&Self::collection(), id.as_str(), fields)
            .await
    }

    /// Merge changes into a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist.
    pub async fn update(&self, id: &ProductId, input: &UpdateProductInput) -> Result<(), StoreError> {
        let mut fields = encode(input)?;
        fields.insert("updatedAt".to_owned(), json!(Utc::now()));
        self.store
            .update(&Self::collection(), id.as_str(), fields)
            .await
    }

    /// Flip the active flag and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist.
    pub async fn toggle_active(&self, id: &ProductId) -> Result<bool, StoreError> {
        let product = self.get(id).await?.ok_or_else(|| StoreError::NotFound {
            collection: PRODUCTS.to_owned(),
            id: id.to_string(),
        })?;
        let active = !product.active;
        let update = UpdateProductInput {
            active: Some(active),
            ..Default::default()
        };
        self.update(id, &update).await?;
        Ok(active)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the delete fails.
    pub async fn delete(&self, id: &ProductId) -> Result<(), StoreError> {
        self.store.delete(&Self::collection(), id.as_str()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::store::MemoryStore;

    fn input(name: &str) -> CreateProductInput {
        CreateProductInput {
            name: name.to_owned(),
            sku: format!("SKU-{name}"),
            price: Decimal::new(195, 0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_toggle_hides_from_active_list() {
        let store = MemoryStore::new();
        let repo = ProductRepository::new(&store);
        let id = repo.create(&input("Atlas")).await.unwrap();
        repo.create(&input("Meridian")).await.unwrap();

        assert!(!repo.toggle_active(&id).await.unwrap());
        assert_eq!(repo.list(true).await.unwrap().len(), 1);
        assert_eq!(repo.list(false).await.unwrap().len(), 2);

        assert!(repo.toggle_active(&id).await.unwrap());
        assert_eq!(repo.list(true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        let repo = ProductRepository::new(&store);
        repo.create(&input("first")).await.unwrap();
        repo.create(&input("second")).await.unwrap();
        let names: Vec<_> = repo
            .list(false)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_upsert_uses_fixed_id() {
        let store = MemoryStore::new();
        let repo = ProductRepository::new(&store);
        let id = ProductId::new("orb-001");
        repo.upsert(&id, &input("Atlas")).await.unwrap();
        repo.upsert(&id, &input("Atlas")).await.unwrap();

        assert_eq!(repo.list(false).await.unwrap().len(), 1);
        let product = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(product.price, Decimal::new(195, 0));
    }

    #[tokio::test]
    async fn test_toggle_missing_is_not_found() {
        let store = MemoryStore::new();
        let repo = ProductRepository::new(&store);
        let err = repo.toggle_active(&ProductId::new("nope")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
