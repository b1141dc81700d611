//! contact-server
//!
//! Serves an in-memory contact store over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use contact_store::{http, Config, ContactStore, InMemoryContactStore};

#[derive(Parser)]
#[command(name = "contact-server")]
#[command(about = "HTTP service for contact records with ETag concurrency control")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Log filter, e.g. "debug" or "contact_store=trace" (overrides config)
    #[arg(long)]
    log_level: Option<String>,

    /// Start with an empty store instead of the fixture contact
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if cli.no_seed {
        config.seed_test_contact = false;
    }

    init_logging(&config.log_level);

    let store = if config.seed_test_contact {
        InMemoryContactStore::seeded(config.first_id)
    } else {
        InMemoryContactStore::with_first_id(config.first_id)
    };
    info!(
        contacts = store.len()?,
        first_id = config.first_id,
        "contact store ready"
    );

    http::serve(Arc::new(store), &config.bind, shutdown_signal())
        .await
        .with_context(|| format!("Failed to serve on {}", config.bind))?;

    info!("contact service stopped");
    Ok(())
}

/// Install the fmt subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "ctrl-c handler unavailable, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
