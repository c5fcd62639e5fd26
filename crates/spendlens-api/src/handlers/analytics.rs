//! Read endpoints: summary, timelines, totals, detailed usage, messages
//!
//! Failure policy: the timeline, totals, and list endpoints degrade to
//! zero-filled or empty bodies when the store errors (a dashboard should
//! never hard-fail on a transient database problem), logging the error with
//! agent and window context first. Only the summary endpoint propagates
//! store failures as 500, and only it distinguishes "no data" (404) from
//! zero.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use spendlens_core::{spend_store::TokenTotals, AgentFilter, QueryWindow};
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::models::{
    ActivityTimelineResponse, AnalyticsResponse, DetailedUsageLog, DetailedUsageResponse, Metrics,
    RecentMessage, RecentMessagesResponse, TokensUsageResponse, TotalTokensResponse,
};
use crate::shape;
use crate::AppState;

/// Query parameters shared by every read endpoint
#[derive(Debug, Deserialize)]
pub struct AgentQuery {
    pub agent_name: String,
    pub agent_version: String,
    pub days: i64,
}

impl AgentQuery {
    fn filter(&self) -> AgentFilter {
        AgentFilter::new(&self.agent_name, &self.agent_version)
    }
}

/// `GET /analytics/agent`
pub async fn agent_analytics(
    State(state): State<AppState>,
    Query(params): Query<AgentQuery>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let window = QueryWindow::last_days(params.days)?;
    let filter = params.filter();

    info!(
        agent_name = %filter.agent_name,
        agent_version = %filter.agent_version,
        days = params.days,
        "fetching agent analytics"
    );

    let summary = state
        .store
        .agent_summary(&filter, window)
        .await
        .map_err(|err| {
            error!(
                error = %err,
                agent_name = %filter.agent_name,
                agent_version = %filter.agent_version,
                start_date = %window.start_date(),
                end_date = %window.end_date(),
                "agent summary query failed"
            );
            ApiError::internal("Failed to fetch analytics data")
        })?;

    let Some(summary) = summary else {
        return Err(ApiError::not_found(format!(
            "No data found for agent '{}' version '{}' in the last {} days",
            filter.agent_name, filter.agent_version, params.days
        )));
    };

    Ok(Json(AnalyticsResponse {
        agent_name: filter.agent_name,
        agent_version: filter.agent_version,
        metrics: Metrics {
            total_sessions: summary.total_sessions,
            total_messages: summary.total_messages,
            avg_daily_messages: summary.avg_daily_messages,
            total_users: summary.total_users,
        },
        date_range: shape::date_range(window),
    }))
}

/// `GET /activitytimeline`
pub async fn activity_timeline(
    State(state): State<AppState>,
    Query(params): Query<AgentQuery>,
) -> Result<Json<ActivityTimelineResponse>, ApiError> {
    let window = QueryWindow::last_days(params.days)?;
    let filter = params.filter();

    let rows = match state.store.daily_sessions(&filter, window).await {
        Ok(rows) => rows,
        Err(err) => {
            warn!(
                error = %err,
                agent_name = %filter.agent_name,
                agent_version = %filter.agent_version,
                start_date = %window.start_date(),
                end_date = %window.end_date(),
                "activity timeline query failed, returning zero-filled series"
            );
            Vec::new()
        }
    };

    Ok(Json(ActivityTimelineResponse {
        agent_name: filter.agent_name,
        agent_version: filter.agent_version,
        date_range: shape::date_range(window),
        daily_sessions: shape::fill_daily_sessions(window, &rows),
    }))
}

/// `GET /tokens-usage`
pub async fn tokens_usage(
    State(state): State<AppState>,
    Query(params): Query<AgentQuery>,
) -> Result<Json<TokensUsageResponse>, ApiError> {
    let window = QueryWindow::last_days(params.days)?;
    let filter = params.filter();

    let rows = match state.store.daily_tokens(&filter, window).await {
        Ok(rows) => rows,
        Err(err) => {
            warn!(
                error = %err,
                agent_name = %filter.agent_name,
                agent_version = %filter.agent_version,
                start_date = %window.start_date(),
                end_date = %window.end_date(),
                "tokens usage query failed, returning zero-filled series"
            );
            Vec::new()
        }
    };

    Ok(Json(TokensUsageResponse {
        agent_name: filter.agent_name,
        agent_version: filter.agent_version,
        date_range: shape::date_range(window),
        daily_tokens: shape::fill_daily_tokens(window, &rows),
    }))
}

/// `GET /total-tokens`
pub async fn total_tokens(
    State(state): State<AppState>,
    Query(params): Query<AgentQuery>,
) -> Result<Json<TotalTokensResponse>, ApiError> {
    let window = QueryWindow::last_days(params.days)?;
    let filter = params.filter();

    let totals = match state.store.token_totals(&filter, window).await {
        Ok(totals) => totals,
        Err(err) => {
            warn!(
                error = %err,
                agent_name = %filter.agent_name,
                agent_version = %filter.agent_version,
                start_date = %window.start_date(),
                end_date = %window.end_date(),
                "token totals query failed, returning zero totals"
            );
            TokenTotals::ZERO
        }
    };

    Ok(Json(TotalTokensResponse {
        agent_name: filter.agent_name,
        agent_version: filter.agent_version,
        date_range: shape::date_range(window),
        total_prompt_tokens: totals.prompt_tokens,
        total_completion_tokens: totals.completion_tokens,
    }))
}

/// `GET /detailed-usage` — `days` restricted to {1, 2, 7, 15, 20}.
pub async fn detailed_usage(
    State(state): State<AppState>,
    Query(params): Query<AgentQuery>,
) -> Result<Json<DetailedUsageResponse>, ApiError> {
    let window = QueryWindow::last_days_restricted(params.days)?;
    let filter = params.filter();

    let rows = match state.store.usage_logs(&filter, window).await {
        Ok(rows) => rows,
        Err(err) => {
            warn!(
                error = %err,
                agent_name = %filter.agent_name,
                agent_version = %filter.agent_version,
                start_date = %window.start_date(),
                end_date = %window.end_date(),
                "detailed usage query failed, returning empty list"
            );
            Vec::new()
        }
    };

    let usage_logs = rows
        .into_iter()
        .map(|row| DetailedUsageLog {
            timestamp: row.timestamp,
            agent_name: row.agent_name.unwrap_or_else(|| filter.agent_name.clone()),
            total_tokens: row.total_tokens,
            prompt_tokens: row.prompt_tokens,
            completion_tokens: row.completion_tokens,
            duration_seconds: row.duration_seconds,
        })
        .collect();

    Ok(Json(DetailedUsageResponse {
        agent_name: filter.agent_name,
        agent_version: filter.agent_version,
        date_range: shape::date_range(window),
        usage_logs,
    }))
}

/// `GET /recentmessages` — `days` restricted to {1, 2, 7, 15, 20}.
pub async fn recent_messages(
    State(state): State<AppState>,
    Query(params): Query<AgentQuery>,
) -> Result<Json<RecentMessagesResponse>, ApiError> {
    let window = QueryWindow::last_days_restricted(params.days)?;
    let filter = params.filter();

    let rows = match state.store.recent_messages(&filter, window).await {
        Ok(rows) => rows,
        Err(err) => {
            warn!(
                error = %err,
                agent_name = %filter.agent_name,
                agent_version = %filter.agent_version,
                start_date = %window.start_date(),
                end_date = %window.end_date(),
                "recent messages query failed, returning empty list"
            );
            Vec::new()
        }
    };

    let messages = rows
        .into_iter()
        .map(|row| {
            let message = row.message.unwrap_or_default();
            RecentMessage {
                timestamp: row.timestamp,
                session_id: row.session_id.unwrap_or_default(),
                message_length: message.chars().count() as i64,
                agent_name: row.agent_name.unwrap_or_else(|| filter.agent_name.clone()),
                model_name: row.model_name.unwrap_or_default(),
                message,
            }
        })
        .collect();

    Ok(Json(RecentMessagesResponse {
        agent_name: filter.agent_name,
        agent_version: filter.agent_version,
        date_range: shape::date_range(window),
        messages,
    }))
}
