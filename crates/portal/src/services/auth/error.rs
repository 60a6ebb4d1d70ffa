//! Authentication error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] customer_ops_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// A credential already exists for this email.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Document store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Message safe to show on the sign-in form.
    ///
    /// Credential problems of any kind read the same, so the form does not
    /// reveal which emails have accounts.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) | Self::InvalidCredentials => "Invalid email or password",
            Self::WeakPassword(_) | Self::UserAlreadyExists | Self::PasswordHash | Self::Store(_) => {
                "Unable to sign in"
            }
        }
    }
}
