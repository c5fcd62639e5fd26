//! API server: router assembly and serve loop

use axum::{
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use spendlens_core::SpendStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{handlers, AppState};

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Build the Axum router with all routes.
///
/// The CORS layer is permissive: the service backs browser dashboards on
/// other origins.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::service_info))
        .route("/health", get(handlers::health::health))
        .route("/analytics/agent", get(handlers::analytics::agent_analytics))
        .route("/activitytimeline", get(handlers::analytics::activity_timeline))
        .route("/tokens-usage", get(handlers::analytics::tokens_usage))
        .route("/total-tokens", get(handlers::analytics::total_tokens))
        .route("/detailed-usage", get(handlers::analytics::detailed_usage))
        .route("/recentmessages", get(handlers::analytics::recent_messages))
        .route("/update-messages", post(handlers::messages::update_messages))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API Server
pub struct ApiServer {
    config: ApiConfig,
    store: Arc<dyn SpendStore>,
}

impl ApiServer {
    pub fn new(config: ApiConfig, store: Arc<dyn SpendStore>) -> Self {
        Self { config, store }
    }

    pub fn router(&self) -> Router {
        build_router(AppState {
            store: self.store.clone(),
        })
    }

    /// Bind and serve until the task is cancelled.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

        let router = self.router();

        info!("SpendLens analytics API listening on http://{}", addr);
        info!("   Health:    http://{}/health", addr);
        info!("   Analytics: http://{}/analytics/agent", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
