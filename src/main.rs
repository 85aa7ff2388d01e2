//! statusboard - Status Dashboard
//!
//! Polls a monitoring backend and serves dashboard views over HTTP.

use statusboard::api::ApiClient;
use statusboard::config::ServerConfig;
use statusboard::poller::{Poller, PollerOptions};
use statusboard::prefs::Preferences;
use statusboard::web::Server;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("statusboard=info".parse()?))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting statusboard on port {}...", cfg.http_port);
    tracing::info!("Using backend at {}", cfg.api_url);

    let prefs = Preferences::load(&cfg.prefs_path);
    tracing::info!("Loaded preferences from {}", cfg.prefs_path);

    // Create poller
    let client = ApiClient::new(&cfg.api_url, cfg.request_timeout)?;
    let poller = Arc::new(Poller::new(
        Arc::new(client),
        PollerOptions {
            interval: cfg.poll_interval,
            fetch_concurrency: cfg.fetch_concurrency,
        },
    ));

    // Start poller
    poller.start().await;

    // Start web server
    let server = Server::new(cfg, poller.clone(), prefs);
    let result = server.start().await;

    poller.stop().await;
    result
}
