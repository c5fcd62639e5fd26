//! PostgreSQL spend store
//!
//! `SpendStore` implementation over the `LiteLLM_SpendLogs` table written by
//! the LiteLLM proxy logging pipeline.

pub mod config;
pub mod pg_spend_store;

pub use config::PgStoreConfig;
pub use pg_spend_store::PgSpendStore;
