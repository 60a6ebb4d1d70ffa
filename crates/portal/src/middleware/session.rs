//! Session middleware configuration for the portal.
//!
//! Sessions live in `PostgreSQL` (via `tower-sessions-sqlx-store`) when a
//! database is configured and in process memory otherwise.

use axum::Router;
use sqlx::PgPool;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::PortalConfig;

/// Session cookie name for the portal.
pub const SESSION_COOKIE_NAME: &str = "customer_ops_session";

/// Session inactivity expiry in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Session layer over whichever store backs this deployment.
pub enum SessionLayer {
    Postgres(SessionManagerLayer<PostgresStore>),
    Memory(SessionManagerLayer<MemoryStore>),
}

impl SessionLayer {
    /// Wrap `router` in the session layer.
    #[must_use]
    pub fn apply(self, router: Router) -> Router {
        match self {
            Self::Postgres(layer) => router.layer(layer),
            Self::Memory(layer) => router.layer(layer),
        }
    }

    /// Which session store is in use.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

/// Create the session layer.
///
/// With a pool, sessions are stored in the `tower_sessions.session` table
/// (created by `ops-cli migrate`). Without one, an in-memory store is used and
/// sessions are lost on restart.
#[must_use]
pub fn create_session_layer(pool: Option<&PgPool>, config: &PortalConfig) -> SessionLayer {
    match pool {
        Some(pool) => SessionLayer::Postgres(configure(PostgresStore::new(pool.clone()), config)),
        None => SessionLayer::Memory(configure(MemoryStore::default(), config)),
    }
}

fn configure<S: SessionStore + Clone>(store: S, config: &PortalConfig) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
