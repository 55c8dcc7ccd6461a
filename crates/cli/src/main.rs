//! `EcomPro` CLI - drive the demo storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the apparel section, cheapest first
//! ecompro products --sort price-asc
//!
//! # Add two of a product and check out
//! ecompro cart add 3 --qty 2
//! ecompro checkout
//!
//! # Add a product as the bootstrap admin
//! ecompro --username admin --password password product-add \
//!     --title "Linen Shirt" --price 1499 --category Apparel
//!
//! # Interactive session (login lasts until exit)
//! ecompro shell
//! ```
//!
//! Durable state (cart, accounts, custom products, theme) lives under
//! `ECOMPRO_DATA_DIR`. The login session lives only as long as the process.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::Parser;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecompro_storefront::Store;
use ecompro_storefront::config::StorefrontConfig;
use ecompro_storefront::storage::{FileStore, KeyValueStore, MemoryStore};

mod commands;
mod output;
mod shell;

use commands::Commands;

#[derive(Parser)]
#[command(name = "ecompro")]
#[command(author, version, about = "EcomPro demo storefront")]
struct Cli {
    /// Log in as this user before running the command
    #[arg(long, global = true, env = "ECOMPRO_USERNAME", requires = "password")]
    username: Option<String>,

    /// Password for --username
    #[arg(long, global = true, env = "ECOMPRO_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
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

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean on stdout
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ecompro_storefront=info,ecompro_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let local: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.data_dir)?);
    let session: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let mut store = Store::open(config, local, session)?;
    store.load_catalog().await;

    if let (Some(username), Some(password)) = (&cli.username, &cli.password) {
        store
            .login(username, password)
            .map_err(|e| e.report())?;
    }

    match cli.command {
        Commands::Shell => shell::run(&mut store).await?,
        command => {
            let section = store.config().section;
            let Some(request) = command.into_store_command(section) else {
                return Ok(());
            };
            let outcome = store.dispatch(request).await.map_err(|e| e.report())?;
            output::render(&outcome);
        }
    }

    Ok(())
}
