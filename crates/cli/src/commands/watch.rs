//! Watch for new orders awaiting staff review.
//!
//! # Usage
//!
//! ```bash
//! ops-cli watch unread -e ops@example.com
//! ```
//!
//! Signs in as a staff user and polls the unread count. The first reading is
//! the baseline; a single notification is logged the first time the count
//! goes from zero to positive. Stop with Ctrl+C.

use std::time::Duration;

use customer_ops_portal::services::{AuthService, OrderService, SessionContext, UnreadTracker};
use customer_ops_portal::store::PgStore;

use super::{CliError, connect};

/// Poll the unread count until interrupted.
///
/// # Errors
///
/// Returns `CliError::Auth` if sign-in fails and `CliError::Forbidden` if
/// the user is not staff.
pub async fn unread(email: &str, password: &str, interval: Duration) -> Result<(), CliError> {
    let store = PgStore::new(connect().await?);

    let session = SessionContext::new();
    let user = session
        .sign_in(&AuthService::new(&store), email, password)
        .await?;
    if !user.is_staff() {
        session.sign_out();
        return Err(CliError::Forbidden(format!("{email} is not a staff user")));
    }
    tracing::info!(uid = %user.uid, "Watching for new orders (Ctrl+C to stop)");

    let orders = OrderService::new(&store);
    let mut tracker = UnreadTracker::new();
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        let count = match orders.unread_count(&user).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read unread count");
                continue;
            }
        };

        let update = tracker.observe(count);
        if update.notify {
            tracing::info!(count, "New orders awaiting review");
        } else {
            tracing::debug!(count, "Unread count");
        }
    }

    session.sign_out();
    tracing::info!("Stopped watching");
    Ok(())
}
