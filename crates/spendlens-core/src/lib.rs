//! SpendLens Core
//!
//! Shared types for the spend-log analytics service: the error taxonomy,
//! agent identity types, the lookback window, optional JSON path extraction,
//! and the `SpendStore` trait implemented by storage backends.

pub mod agent;
pub mod error;
pub mod json_path;
pub mod spend_store;
pub mod window;

pub use agent::{AgentFilter, AgentMetadata};
pub use error::{Error, Result};
pub use spend_store::SpendStore;
pub use window::QueryWindow;
