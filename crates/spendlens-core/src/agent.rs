//! Agent identity types
//!
//! An agent is a logical client identified by a (name, version) pair carried
//! in the `requester_metadata` object of each spend log's
//! `proxy_server_request` payload.

use serde::{Deserialize, Serialize};

/// Filter shared by every read operation: rows match when their nested
/// metadata carries exactly this name/version pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFilter {
    pub agent_name: String,
    pub agent_version: String,
}

impl AgentFilter {
    pub fn new(agent_name: impl Into<String>, agent_version: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            agent_version: agent_version.into(),
        }
    }
}

/// The five metadata keys the update operation merges into a row's
/// `messages` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMetadata {
    pub agent_name: String,
    pub agent_user_id: String,
    pub agent_version: String,
    pub agent_app_name: String,
    pub agent_session_id: String,
}
