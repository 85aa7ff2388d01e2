//! Web server module.

mod handlers;

pub use handlers::*;

use crate::config::ServerConfig;
use crate::poller::Poller;
use crate::prefs::Preferences;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub poller: Arc<Poller>,
    pub prefs: Arc<Mutex<Preferences>>,
}

/// Web server for the dashboard.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(config: ServerConfig, poller: Arc<Poller>, prefs: Preferences) -> Self {
        Self {
            state: AppState {
                config,
                poller,
                prefs: Arc::new(Mutex::new(prefs)),
            },
        }
    }

    /// Build the router with all routes.
    pub(crate) fn routes(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/api/health", get(handlers::handle_health))
            .route("/api/overview", get(handlers::handle_overview))
            .route("/api/monitors/{id}/detail", get(handlers::handle_detail))
            .route("/api/monitors/{id}/period", put(handlers::handle_set_period))
            .route("/api/pause", post(handlers::handle_pause))
            .route("/api/resume", post(handlers::handle_resume))
            .route(
                "/api/preferences",
                get(handlers::handle_get_preferences).put(handlers::handle_put_preferences),
            )
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(64 * 1024))
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
