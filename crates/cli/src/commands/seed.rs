//! Seed the catalogue and lookbook.
//!
//! # Usage
//!
//! ```bash
//! # The bundled demo catalogue
//! ops-cli seed demo
//!
//! # A fixture file with the same shape
//! ops-cli seed demo --file fixtures/spring.yaml
//! ```
//!
//! Entries carry fixed IDs, so seeding twice leaves one copy of each.

use std::path::Path;

use tracing::info;

use customer_ops_portal::seed::{SeedData, seed};
use customer_ops_portal::store::PgStore;

use super::{CliError, connect};

/// Seed from `file`, or from the bundled demo fixture.
///
/// # Errors
///
/// Returns `CliError` if the file is missing or malformed, or a write fails.
pub async fn demo(file: Option<&Path>) -> Result<(), CliError> {
    // Read and validate the fixture before connecting to the database
    let data = match file {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::InvalidArgument(
                    "file",
                    format!("not found: {}", path.display()),
                ));
            }
            info!(path = %path.display(), "Loading fixture from file");
            SeedData::from_file(path).await?
        }
        None => SeedData::demo()?,
    };

    info!(
        products = data.products.len(),
        posts = data.lookbook.len(),
        "Parsed fixture"
    );

    let store = PgStore::new(connect().await?);
    let summary = seed(&store, &data).await?;

    info!("Seeding complete!");
    info!("  Products: {}", summary.products);
    info!("  Lookbook posts: {}", summary.posts);
    Ok(())
}
