//! Customer account repository.

use chrono::Utc;
use serde_json::json;

use customer_ops_core::CustomerId;

use super::{CUSTOMERS, patch};
use crate::models::{CreateCustomerInput, Customer, UpdateCustomerInput};
use crate::store::{CollectionPath, Direction, DocumentStore, Query, StoreError, decode_all, encode};

/// Repository for customer accounts.
pub struct CustomerRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    fn collection() -> CollectionPath {
        CollectionPath::root(CUSTOMERS)
    }

    /// All customers sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a document is malformed.
    pub async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        let query = Query::collection(Self::collection()).order_by("name", Direction::Ascending);
        decode_all(&self.store.query(&query).await?)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails or the document is malformed.
    pub async fn get(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError> {
        self.store
            .get(&Self::collection(), id.as_str())
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    /// Create an active customer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn create(&self, input: &CreateCustomerInput) -> Result<CustomerId, StoreError> {
        let now = Utc::now();
        let fields = patch(&json!({
            "name": input.name.trim(),
            "contactEmail": input.contact_email,
            "contactPhone": input.contact_phone,
            "active": true,
            "createdAt": now,
            "updatedAt": now,
        }))?;
        let id = self.store.add(&Self::collection(), fields).await?;
        Ok(CustomerId::new(id))
    }

    /// Merge changes into a customer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the customer does not exist.
    pub async fn update(
        &self,
        id: &CustomerId,
        input: &UpdateCustomerInput,
    ) -> Result<(), StoreError> {
        let mut fields = encode(input)?;
        fields.insert("updatedAt".to_owned(), json!(Utc::now()));
        self.store
            .update(&Self::collection(), id.as_str(), fields)
            .await
    }

    /// Delete a customer. Orders referencing it are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the delete fails.
    pub async fn delete(&self, id: &CustomerId) -> Result<(), StoreError> {
        self.store.delete(&Self::collection(), id.as_str()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn input(name: &str) -> CreateCustomerInput {
        CreateCustomerInput {
            name: name.to_owned(),
            contact_email: None,
            contact_phone: None,
        }
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let store = MemoryStore::new();
        let repo = CustomerRepository::new(&store);
        repo.create(&input("Zephyr Goods")).await.unwrap();
        repo.create(&input("Acme Denim")).await.unwrap();

        let names: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Acme Denim", "Zephyr Goods"]);
    }

    #[tokio::test]
    async fn test_create_is_active_and_update_merges() {
        let store = MemoryStore::new();
        let repo = CustomerRepository::new(&store);
        let id = repo.create(&input("  Acme  ")).await.unwrap();

        let customer = repo.get(&id).await.unwrap().unwrap();
        assert!(customer.active);
        assert_eq!(customer.name, "Acme");

        let update = UpdateCustomerInput {
            contact_phone: Some("555-0100".into()),
            ..Default::default()
        };
        repo.update(&id, &update).await.unwrap();
        let customer = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(customer.name, "Acme");
        assert_eq!(customer.contact_phone.as_deref(), Some("555-0100"));

        repo.delete(&id).await.unwrap();
        assert!(repo.get(&id).await.unwrap().is_none());
    }
}
