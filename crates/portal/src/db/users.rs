//! User profile and credential repository.

use chrono::Utc;
use serde_json::json;

use customer_ops_core::{CustomerId, UserId, UserRole};

use super::{CREDENTIALS, USERS, patch};
use crate::models::{Credential, UserProfile};
use crate::store::{CollectionPath, DocumentStore, Query, StoreError, decode_all};

/// Repository for user profiles and password credentials.
pub struct UserRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    fn users() -> CollectionPath {
        CollectionPath::root(USERS)
    }

    fn credentials() -> CollectionPath {
        CollectionPath::root(CREDENTIALS)
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    /// Load a user profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails or the document is malformed.
    pub async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        self.store
            .get(&Self::users(), id.as_str())
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    /// Create or merge a user profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let fields = patch(&json!({
            "role": profile.role,
            "name": profile.name,
            "customerId": profile.customer_id,
            "email": profile.email,
        }))?;
        self.store
            .set_merge(&Self::users(), profile.id.as_str(), fields)
            .await
    }

    /// Users with a staff-like role, sorted by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a document is malformed.
    pub async fn list_staff(&self) -> Result<Vec<UserProfile>, StoreError> {
        let docs = self.store.query(&Query::collection(Self::users())).await?;
        let mut staff: Vec<UserProfile> = decode_all::<UserProfile>(&docs)?
            .into_iter()
            .filter(UserProfile::is_staff)
            .collect();
        staff.sort_by_cached_key(|u| u.name.to_lowercase());
        Ok(staff)
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Find a credential by (normalized) email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a document is malformed.
    pub async fn find_credential(&self, email: &str) -> Result<Option<Credential>, StoreError> {
        let query = Query::collection(Self::credentials()).where_eq("email", email);
        let docs = self.store.query(&query).await?;
        docs.first().map(|doc| doc.decode()).transpose()
    }

    /// Store a credential for a user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn save_credential(
        &self,
        id: &UserId,
        email: &str,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let fields = patch(&json!({
            "email": email,
            "passwordHash": password_hash,
            "createdAt": Utc::now(),
        }))?;
        self.store
            .set_merge(&Self::credentials(), id.as_str(), fields)
            .await
    }

    /// Create a user profile with an explicit role.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn create_profile(
        &self,
        id: &UserId,
        email: &str,
        name: &str,
        role: UserRole,
        customer_id: Option<CustomerId>,
    ) -> Result<UserProfile, StoreError> {
        let profile = UserProfile {
            id: id.clone(),
            role,
            name: name.to_owned(),
            customer_id,
            email: Some(email.to_owned()),
        };
        self.save_profile(&profile).await?;
        Ok(profile)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, encode};

    #[tokio::test]
    async fn test_list_staff_filters_roles_case_insensitively() {
        let store = MemoryStore::new();
        let users = CollectionPath::root(USERS);
        for (id, role, name) in [
            ("u1", "Staff", "zoe"),
            ("u2", "customer", "Carl"),
            ("u3", "ADMIN", "Adam"),
            ("u4", "", "Nobody"),
        ] {
            store
                .set_merge(&users, id, encode(&json!({"role": role, "name": name})).unwrap())
                .await
                .unwrap();
        }

        let repo = UserRepository::new(&store);
        let names: Vec<_> = repo
            .list_staff()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Adam", "zoe"]);
    }

    #[tokio::test]
    async fn test_credential_lookup_by_email() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        let id = UserId::new("u1");
        repo.save_credential(&id, "ana@example.com", "hash")
            .await
            .unwrap();

        let found = repo.find_credential("ana@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(repo.find_credential("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_round_trip() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        let id = UserId::new("u9");
        repo.create_profile(&id, "s@example.com", "Sam", UserRole::Staff, None)
            .await
            .unwrap();
        let profile = repo.get_profile(&id).await.unwrap().unwrap();
        assert!(profile.is_staff());
        assert_eq!(profile.name, "Sam");
    }
}
