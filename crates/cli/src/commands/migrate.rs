//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! ops-cli migrate
//! ```
//!
//! Applies the document table migrations from `crates/portal/migrations/`
//! and creates the `tower_sessions` schema used by the session store.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CliError, connect};

/// Run all portal migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running document store migrations...");
    sqlx::migrate!("../portal/migrations").run(&pool).await?;

    tracing::info!("Running session store migrations...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
