//! HTTP handlers

pub mod analytics;
pub mod health;
pub mod messages;
