//! Authentication service.
//!
//! Provides email/password sign-in against argon2 hashes stored in the
//! `credentials` collection, and profile loading from `users/{uid}`.

mod context;
mod error;

pub use context::SessionContext;
pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use customer_ops_core::{CustomerId, Email, UserId, UserRole};

use crate::db::UserRepository;
use crate::models::{CurrentUser, UserProfile};
use crate::store::{DocumentStore, new_document_id};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Details for creating a user from the CLI.
#[derive(Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password: &'a str,
    pub role: UserRole,
    pub customer_id: Option<CustomerId>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            users: UserRepository::new(store),
        }
    }

    /// Create a credential and profile for a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[tracing::instrument(skip(self, user), fields(email = %user.email, role = %user.role))]
    pub async fn register(&self, user: NewUser<'_>) -> Result<UserProfile, AuthError> {
        let email = Email::parse(user.email)?.normalized();
        validate_password(user.password)?;

        if self.users.find_credential(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(user.password)?;
        let uid = UserId::new(new_document_id());
        self.users
            .save_credential(&uid, &email, &password_hash)
            .await?;

        let name = user.name.trim();
        let name = if name.is_empty() { email.as_str() } else { name };
        let profile = self
            .users
            .create_profile(&uid, &email, name, user.role, user.customer_id)
            .await?;

        tracing::info!(uid = %uid, "User registered");
        Ok(profile)
    }

    /// Sign in with email and password and load the user's profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::InvalidCredentials`
    /// for bad input; `AuthError::Store` if the credential lookup fails.
    #[tracing::instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email)?.normalized();

        let credential = self
            .users
            .find_credential(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &credential.password_hash)?;

        let profile = self.load_profile(&credential.id, &email).await;
        tracing::info!(uid = %credential.id, role = %profile.role, "User signed in");
        Ok(CurrentUser::from_profile(profile, &email))
    }

    /// Load a user's profile, creating a placeholder if none exists.
    ///
    /// Never fails: if the store cannot be read, an in-memory placeholder is
    /// returned instead.
    pub async fn load_profile(&self, uid: &UserId, email: &str) -> UserProfile {
        match self.users.get_profile(uid).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                let placeholder = UserProfile::placeholder(uid.clone(), email);
                if let Err(e) = self.users.save_profile(&placeholder).await {
                    tracing::warn!(uid = %uid, error = %e, "Failed to save placeholder profile");
                }
                placeholder
            }
            Err(e) => {
                tracing::warn!(uid = %uid, error = %e, "Failed to load profile, using placeholder");
                UserProfile::placeholder(uid.clone(), email)
            }
        }
    }
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
