//! Command implementations.
//!
//! Every command talks to the same `PostgreSQL` database as the portal,
//! located by `PORTAL_DATABASE_URL` (falling back to `DATABASE_URL`).

pub mod migrate;
pub mod seed;
pub mod user;
pub mod watch;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use customer_ops_portal::seed::SeedError;
use customer_ops_portal::services::AuthError;
use customer_ops_portal::store::StoreError;
use customer_ops_portal::store::postgres::create_pool;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Document store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Sign-in or registration failed.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Seeding failed.
    #[error("{0}")]
    Seed(#[from] SeedError),

    /// A command-line argument was rejected.
    #[error("Invalid {0}: {1}")]
    InvalidArgument(&'static str, String),

    /// The signed-in user may not run this command.
    #[error("{0}")]
    Forbidden(String),
}

/// Load the database URL from the environment.
fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    ["PORTAL_DATABASE_URL", "DATABASE_URL"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .map(SecretString::from)
        .ok_or(CliError::MissingEnvVar("PORTAL_DATABASE_URL"))
}

/// Connect to the portal database.
async fn connect() -> Result<PgPool, CliError> {
    let url = database_url()?;
    tracing::info!("Connecting to portal database...");
    Ok(create_pool(&url).await?)
}
