//! Product API server (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────────┐
//!                  │                       PRODUCT API                         │
//!                  │                                                           │
//!   Request        │  ┌─────────┐   ┌──────────────┐   ┌───────────────┐       │
//!   ───────────────┼─▶│  axum   │──▶│ auth         │──▶│ payload       │──┐    │
//!                  │  │ router  │   │ interceptor  │   │ interceptor   │  │    │
//!                  │  └─────────┘   └──────┬───────┘   └───────────────┘  │    │
//!                  │                       │ verify                       ▼    │
//!                  │                ┌──────▼───────┐              ┌──────────┐ │
//!                  │                │ token codec  │              │ handlers │ │
//!                  │                │ + secret     │              └────┬─────┘ │
//!                  │                └──────────────┘                   │       │
//!                  │                                              ┌────▼─────┐ │
//!                  │  ┌─────────────────────────────┐             │  data    │ │
//!                  │  │ lifecycle: start / signal / │────close───▶│  store   │ │
//!                  │  │ drain race / stop           │             └──────────┘ │
//!                  │  └─────────────────────────────┘                          │
//!                  └──────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use product_api::config::{load_config, ApiConfig};
use product_api::lifecycle::{signals, Server};
use product_api::observability::{logging, metrics};
use product_api::security::SigningSecret;
use product_api::store::MemoryStore;

#[derive(Parser)]
#[command(name = "product-api")]
#[command(about = "Product API server with signed-token authentication", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "APP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ApiConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(
        config = ?args.config,
        bind_address = %config.listener.bind_address,
        token_ttl_secs = config.auth.token_ttl_secs,
        drain_deadline_secs = config.lifecycle.drain_deadline_secs,
        "product-api v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = Arc::new(MemoryStore::with_users(&config.store.users));
    let secret = SigningSecret::from_env_or_generate(&config.auth.secret_env);

    let server = match Server::initialize(config, store, secret).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            std::process::exit(1);
        }
    };

    let listener = server.bind().await?;
    let outcome = server.run(listener, signals::shutdown_signal()).await?;

    tracing::info!(outcome = outcome.as_str(), "Shutdown complete");
    Ok(())
}
