//! Health probe and service descriptor

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::error;

use crate::error::ApiError;
use crate::models::{HealthResponse, ServiceDescriptor};
use crate::AppState;

/// `GET /health` — 503 when the database is unreachable.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.store.ping().await.map_err(|err| {
        error!(error = %err, "health check failed");
        ApiError::unavailable("Database connection failed")
    })?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().naive_utc(),
    }))
}

/// `GET /` — static service descriptor.
pub async fn service_info() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        message: "SpendLens Analytics API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        health: "/health".to_string(),
    })
}
