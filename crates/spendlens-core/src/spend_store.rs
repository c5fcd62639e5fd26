//! Storage seam for spend log analytics
//!
//! `SpendStore` abstracts the `LiteLLM_SpendLogs` table so the HTTP layer
//! can be exercised against an in-memory stub while production runs on
//! PostgreSQL (`spendlens-store-postgres`).
//!
//! Read operations return raw rows only for dates/requests that matched;
//! zero-filling missing dates is the response shaper's job, not the store's.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{AgentFilter, AgentMetadata, QueryWindow, Result};

/// Aggregate metrics for one agent/version over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    /// Distinct `agent_session_id` values.
    pub total_sessions: i64,
    /// Sum of response `choices` array lengths (empty/null responses count 0).
    pub total_messages: i64,
    /// Requests per distinct active day, rounded to 2 decimals.
    pub avg_daily_messages: f64,
    /// Distinct `agent_user_id` values.
    pub total_users: i64,
}

/// Distinct sessions on one calendar date. Dates without rows are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySessionRow {
    pub date: NaiveDate,
    pub sessions: i64,
}

/// Token sums on one calendar date. Dates without rows are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTokenRow {
    pub date: NaiveDate,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
}

/// Window-wide token sums, null aggregates coerced to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTotals {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
}

impl TokenTotals {
    pub const ZERO: TokenTotals = TokenTotals {
        prompt_tokens: 0,
        completion_tokens: 0,
    };
}

/// One proxied request. `agent_name` stays optional here; the API layer
/// falls back to the query parameter when the payload lacked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogRow {
    pub timestamp: NaiveDateTime,
    pub agent_name: Option<String>,
    pub total_tokens: i64,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    /// `endTime - startTime` in seconds.
    pub duration_seconds: f64,
}

/// One assistant message extracted from a non-empty response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRow {
    pub timestamp: NaiveDateTime,
    pub session_id: Option<String>,
    pub agent_name: Option<String>,
    pub model_name: Option<String>,
    pub message: Option<String>,
}

/// Spend log store
///
/// Implementations:
/// - `PgSpendStore`: PostgreSQL over the LiteLLM schema (production)
/// - hand-rolled stubs in HTTP tests
///
/// Every read shares the same predicate: `proxy_server_request` is a
/// non-empty document, its nested agent name/version equal the filter, and
/// `startTime` falls inside the half-open window bounds.
#[async_trait]
pub trait SpendStore: Send + Sync {
    /// Connectivity probe backing the health endpoint.
    async fn ping(&self) -> Result<()>;

    /// Aggregate metrics, or `None` when no messages matched. Absence is
    /// distinguishable from zero so the caller can answer 404.
    async fn agent_summary(
        &self,
        filter: &AgentFilter,
        window: QueryWindow,
    ) -> Result<Option<AgentSummary>>;

    /// Distinct session counts per calendar date, oldest first.
    async fn daily_sessions(
        &self,
        filter: &AgentFilter,
        window: QueryWindow,
    ) -> Result<Vec<DailySessionRow>>;

    /// Prompt/completion token sums per calendar date, oldest first.
    async fn daily_tokens(
        &self,
        filter: &AgentFilter,
        window: QueryWindow,
    ) -> Result<Vec<DailyTokenRow>>;

    /// Window-wide token sums.
    async fn token_totals(&self, filter: &AgentFilter, window: QueryWindow)
        -> Result<TokenTotals>;

    /// Per-request usage logs, newest first.
    async fn usage_logs(
        &self,
        filter: &AgentFilter,
        window: QueryWindow,
    ) -> Result<Vec<UsageLogRow>>;

    /// Messages from rows with non-empty responses, newest first.
    async fn recent_messages(
        &self,
        filter: &AgentFilter,
        window: QueryWindow,
    ) -> Result<Vec<MessageRow>>;

    /// Merge the five agent metadata keys into the `messages` document of
    /// the row with `request_id`. Must be a single atomic statement;
    /// unrelated keys already in the document are preserved, and reapplying
    /// the same metadata is a no-op.
    ///
    /// # Errors
    /// - `Error::RequestNotFound` when no row has that id
    /// - `Error::Database` for store failures
    async fn merge_request_metadata(
        &self,
        request_id: &str,
        metadata: &AgentMetadata,
    ) -> Result<()>;
}
