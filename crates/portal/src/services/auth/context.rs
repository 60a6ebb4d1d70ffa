//! Explicit authentication state for a client session.
//!
//! Holds the signed-in user behind a `watch` channel so that long-running
//! consumers (the CLI watcher, notification tasks) can react to sign-in and
//! sign-out without global state.

use std::sync::Arc;

use tokio::sync::watch;

use super::{AuthError, AuthService};
use crate::models::CurrentUser;

/// Observable sign-in state.
#[derive(Clone)]
pub struct SessionContext {
    tx: Arc<watch::Sender<Option<CurrentUser>>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Create a signed-out context.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current(&self) -> Option<CurrentUser> {
        self.tx.borrow().clone()
    }

    /// Observe sign-in state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.tx.subscribe()
    }

    /// Sign in and publish the new user.
    ///
    /// The context is left unchanged on failure.
    ///
    /// # Errors
    ///
    /// Returns the `AuthError` from the sign-in attempt.
    pub async fn sign_in(
        &self,
        auth: &AuthService<'_>,
        email: &str,
        password: &str,
    ) -> Result<CurrentUser, AuthError> {
        let user = auth.sign_in(email, password).await?;
        self.tx.send_replace(Some(user.clone()));
        Ok(user)
    }

    /// Publish an already authenticated user.
    pub fn set(&self, user: CurrentUser) {
        self.tx.send_replace(Some(user));
    }

    /// Clear the signed-in user.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use customer_ops_core::UserRole;

    use super::*;
    use crate::services::auth::NewUser;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_sign_in_and_out_are_observable() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.register(NewUser {
            email: "ana@example.com",
            name: "Ana",
            password: "correct-horse",
            role: UserRole::Customer,
            customer_id: None,
        })
        .await
        .unwrap();

        let ctx = SessionContext::new();
        let mut rx = ctx.subscribe();
        assert!(ctx.current().is_none());

        ctx.sign_in(&auth, "ana@example.com", "correct-horse")
            .await
            .unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().name, "Ana");

        ctx.sign_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn test_failed_sign_in_leaves_state() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        let ctx = SessionContext::new();
        assert!(ctx.sign_in(&auth, "x@example.com", "password1").await.is_err());
        assert!(ctx.current().is_none());
    }
}
