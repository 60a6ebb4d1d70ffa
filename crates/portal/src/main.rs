//! Customer operations portal server.
//!
//! Serves the portal JSON API on port 3002.
//!
//! # Storage
//!
//! With `PORTAL_DATABASE_URL` (or `DATABASE_URL`) set, documents and
//! sessions live in `PostgreSQL`. Without it everything is kept in memory,
//! which is only suitable for local development and demos.
//!
//! Migrations are not run on startup:
//! ```bash
//! cargo run -p customer-ops-cli -- migrate
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::error::Error;
use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use customer_ops_portal::config::PortalConfig;
use customer_ops_portal::middleware::create_session_layer;
use customer_ops_portal::seed::{SeedData, seed};
use customer_ops_portal::state::AppState;
use customer_ops_portal::store::postgres::create_pool;
use customer_ops_portal::store::{MemoryStore, PgStore, SharedStore};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &PortalConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            // Customer contact details stay out of error reports
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "customer_ops_portal=info,tower_http=debug".into());

    // JSON on Fly.io for structured log parsing, text locally
    let is_fly = std::env::var("FLY_APP_NAME").is_ok();
    let json_layer = is_fly.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_fly).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = PortalConfig::from_env()?;

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let pool = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            tracing::info!("Database pool created");
            Some(pool)
        }
        None => {
            tracing::warn!("No database configured; documents and sessions are kept in memory");
            None
        }
    };

    let store: SharedStore = match &pool {
        Some(pool) => Arc::new(PgStore::new(pool.clone())),
        None => Arc::new(MemoryStore::new()),
    };

    if config.seed_demo {
        let summary = seed(store.as_ref(), &SeedData::demo()?).await?;
        tracing::info!(
            products = summary.products,
            posts = summary.posts,
            "Demo catalogue ready"
        );
    }

    let session_layer = create_session_layer(pool.as_ref(), &config);
    tracing::info!(
        store = store.backend(),
        sessions = session_layer.backend(),
        "Storage configured"
    );

    let addr = config.socket_addr();
    let base_url = config.base_url.clone();
    let app = customer_ops_portal::app(AppState::new(config, store), session_layer);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %base_url, "portal listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
