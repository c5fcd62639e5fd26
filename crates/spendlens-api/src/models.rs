//! Wire models for API requests and responses

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use spendlens_core::AgentMetadata;

/// Calendar range covered by a response, `YYYY-MM-DD` on both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

/// Aggregate metrics for the analytics summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub total_sessions: i64,
    pub total_messages: i64,
    pub avg_daily_messages: f64,
    pub total_users: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub agent_name: String,
    pub agent_version: String,
    pub metrics: Metrics,
    pub date_range: DateRange,
}

/// One day of the session activity timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySessionActivity {
    pub date: String,
    pub sessions: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityTimelineResponse {
    pub agent_name: String,
    pub agent_version: String,
    pub date_range: DateRange,
    pub daily_sessions: Vec<DailySessionActivity>,
}

/// One day of the token usage timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTokenUsage {
    pub date: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokensUsageResponse {
    pub agent_name: String,
    pub agent_version: String,
    pub date_range: DateRange,
    pub daily_tokens: Vec<DailyTokenUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalTokensResponse {
    pub agent_name: String,
    pub agent_version: String,
    pub date_range: DateRange,
    pub total_prompt_tokens: i64,
    pub total_completion_tokens: i64,
}

/// One proxied request in the detailed usage log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedUsageLog {
    pub timestamp: NaiveDateTime,
    pub agent_name: String,
    pub total_tokens: i64,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedUsageResponse {
    pub agent_name: String,
    pub agent_version: String,
    pub date_range: DateRange,
    pub usage_logs: Vec<DetailedUsageLog>,
}

/// One assistant message in the recent messages list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentMessage {
    pub timestamp: NaiveDateTime,
    pub session_id: String,
    pub message_length: i64,
    pub agent_name: String,
    pub model_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentMessagesResponse {
    pub agent_name: String,
    pub agent_version: String,
    pub date_range: DateRange,
    pub messages: Vec<RecentMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: NaiveDateTime,
}

/// Static descriptor served at `/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub message: String,
    pub version: String,
    pub health: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessagesRequest {
    pub request_id: String,
    pub agent_metadata: AgentMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessagesResponse {
    pub status: String,
    pub request_id: String,
    pub message: String,
}

/// Body carried by every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
    pub error_code: String,
}
