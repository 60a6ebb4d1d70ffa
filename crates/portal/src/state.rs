//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::PortalConfig;
use crate::store::{DocumentStore, SharedStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    store: SharedStore,
}

impl AppState {
    /// Create the state from a loaded config and a document store.
    #[must_use]
    pub fn new(config: PortalConfig, store: SharedStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// The document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// A shared handle to the document store, for work that outlives a request.
    #[must_use]
    pub fn shared_store(&self) -> SharedStore {
        Arc::clone(&self.inner.store)
    }
}
