//! SpendLens HTTP API
//!
//! Axum surface for the spend-log analytics endpoints. Handlers talk to any
//! `SpendStore` through shared state, so the router can be exercised against
//! a stub store in tests while production uses PostgreSQL.

pub mod error;
pub mod handlers;
pub mod models;
pub mod server;
pub mod shape;

pub use server::{build_router, ApiConfig, ApiServer};

use spendlens_core::SpendStore;
use std::sync::Arc;

/// Shared application state for the API server
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SpendStore>,
}
