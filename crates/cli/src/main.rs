//! Customer operations CLI: migrations, user management and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ops-cli migrate
//!
//! # Create a staff user
//! ops-cli user create -e ops@example.com -n "Ops Lead" -r staff
//!
//! # Seed the demo catalogue and lookbook
//! ops-cli seed demo
//!
//! # Follow new orders awaiting review
//! ops-cli watch unread -e ops@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create users with an email/password credential
//! - `seed demo` - Seed products and lookbook posts
//! - `watch unread` - Log when new orders arrive

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ops-cli")]
#[command(author, version, about = "Customer operations CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed the catalogue
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Watch live data
    Watch {
        #[command(subcommand)]
        target: WatchTarget,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Sign-in email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password (at least 8 characters)
        #[arg(short, long, env = "OPS_USER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Role (`admin`, `staff`, `customer`)
        #[arg(short, long, default_value = "staff")]
        role: String,

        /// Customer ID for customer users
        #[arg(long)]
        customer: Option<String>,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed products and lookbook posts
    Demo {
        /// Fixture file (defaults to the bundled demo catalogue)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum WatchTarget {
    /// Log when orders awaiting review arrive
    Unread {
        /// Staff email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long, env = "OPS_USER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Seconds between checks
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                password,
                role,
                customer,
            } => {
                commands::user::create(commands::user::CreateUser {
                    email: &email,
                    name: &name,
                    password: &password,
                    role: &role,
                    customer: customer.as_deref(),
                })
                .await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Demo { file } => commands::seed::demo(file.as_deref()).await?,
        },
        Commands::Watch { target } => match target {
            WatchTarget::Unread {
                email,
                password,
                interval,
            } => {
                let interval = Duration::from_secs(interval.max(1));
                commands::watch::unread(&email, &password, interval).await?;
            }
        },
    }
    Ok(())
}
