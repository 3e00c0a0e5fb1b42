//! Rocket Cart CLI - inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! cart-cli show
//!
//! # Add one unit of a product
//! cart-cli add 1
//!
//! # Set a product's quantity
//! cart-cli set 1 3
//!
//! # Remove a product
//! cart-cli remove 1
//! ```
//!
//! # Commands
//!
//! - `show` - Print the cart
//! - `add` - Add one unit of a product (looked up in the catalog when new)
//! - `set` - Set a product's quantity, checked against remote stock
//! - `remove` - Remove a product's line
//!
//! Configuration is read from the environment (see `rocket_cart::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocket_cart::{CartConfig, ProductId};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Log filter used when `RUST_LOG` is unset. This binary logs under the
/// `cart_cli` target, not the package name.
const DEFAULT_LOG_FILTER: &str = "rocket_cart=info,cart_cli=info";

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Rocket Cart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Set {
        /// Product ID
        product_id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Sentry client for the configured DSN, if any. Dropping the guard flushes.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Warnings and errors become Sentry events; info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            sentry_guard
                .is_some()
                .then(|| sentry_tracing::layer().event_filter(sentry_event_filter)),
        )
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), commands::CommandError> {
    let cart = commands::open_cart(config).await?;

    match cli.command {
        Commands::Show => {}
        Commands::Add { product_id } => cart.add_item(&product_id).await?,
        Commands::Remove { product_id } => cart.remove_item(&product_id).await?,
        Commands::Set { product_id, amount } => {
            cart.set_quantity(&product_id, amount).await?;
        }
    }

    commands::print_cart(&cart.snapshot());
    Ok(())
}
