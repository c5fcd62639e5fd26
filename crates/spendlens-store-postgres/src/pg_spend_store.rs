//! PgSpendStore - SpendStore implementation for the LiteLLM PostgreSQL schema
//!
//! Reads `LiteLLM_SpendLogs`, the append-only table the LiteLLM proxy writes
//! one row per request/response into. Agent identity lives inside the
//! `proxy_server_request` jsonb payload at `metadata -> requester_metadata`.
//!
//! Every value — including the server-generated window bounds — is a bound
//! parameter. Window comparison is half-open: `startTime >= $3 AND
//! startTime < $4`.
//!
//! Recommended indexes:
//! - `CREATE INDEX ON "LiteLLM_SpendLogs" ("startTime");`
//! - `CREATE INDEX ON "LiteLLM_SpendLogs" ((proxy_server_request->'metadata'->'requester_metadata'->>'agent_name'));`
//! - `CREATE INDEX ON "LiteLLM_SpendLogs" ((proxy_server_request->'metadata'->'requester_metadata'->>'agent_version'));`

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::debug;

use crate::config::PgStoreConfig;
use spendlens_core::{
    spend_store::{
        AgentSummary, DailySessionRow, DailyTokenRow, MessageRow, TokenTotals, UsageLogRow,
    },
    AgentFilter, AgentMetadata, Error, QueryWindow, Result, SpendStore,
};

/// PostgreSQL-backed spend log store.
#[derive(Clone)]
pub struct PgSpendStore {
    pool: Arc<PgPool>,
}

impl PgSpendStore {
    /// Connect with default pool configuration.
    ///
    /// # Errors
    /// - `Error::Database` if the connection cannot be established
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::with_config(database_url, PgStoreConfig::default()).await
    }

    /// Connect with custom pool configuration.
    pub async fn with_config(database_url: &str, config: PgStoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .max_lifetime(Some(config.max_lifetime))
            .connect(database_url)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to PostgreSQL: {}", e)))?;

        debug!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "PostgreSQL spend store pool created"
        );

        Ok(Self::from_pool(pool))
    }

    /// Create from an existing pool (useful for testing).
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl SpendStore for PgSpendStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Connection check failed: {}", e)))?;
        Ok(())
    }

    async fn agent_summary(
        &self,
        filter: &AgentFilter,
        window: QueryWindow,
    ) -> Result<Option<AgentSummary>> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(DISTINCT proxy_server_request->'metadata'->'requester_metadata'->>'agent_session_id') AS total_sessions,
                COALESCE(SUM(
                    CASE
                        WHEN jsonb_typeof(response->'choices') = 'array'
                        THEN jsonb_array_length(response->'choices')
                        ELSE 0
                    END
                ), 0) AS total_messages,
                COALESCE(ROUND(
                    COUNT(*)::numeric / NULLIF(COUNT(DISTINCT DATE("startTime")), 0),
                    2
                ), 0)::float8 AS avg_daily_messages,
                COUNT(DISTINCT proxy_server_request->'metadata'->'requester_metadata'->>'agent_user_id') AS total_users
            FROM "LiteLLM_SpendLogs"
            WHERE proxy_server_request::text <> '{}'
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_name' = $1
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_version' = $2
              AND "startTime" >= $3
              AND "startTime" < $4
            "#,
        )
        .bind(&filter.agent_name)
        .bind(&filter.agent_version)
        .bind(window.start_bound())
        .bind(window.end_bound())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Agent summary query failed: {}", e)))?;

        let total_messages: i64 = row.try_get("total_messages").unwrap_or(0);
        if total_messages == 0 {
            return Ok(None);
        }

        Ok(Some(AgentSummary {
            total_sessions: row.try_get("total_sessions").unwrap_or(0),
            total_messages,
            avg_daily_messages: row.try_get("avg_daily_messages").unwrap_or(0.0),
            total_users: row.try_get("total_users").unwrap_or(0),
        }))
    }

    async fn daily_sessions(
        &self,
        filter: &AgentFilter,
        window: QueryWindow,
    ) -> Result<Vec<DailySessionRow>> {
        let rows = sqlx::query(
            r#"
            SELECT
                DATE("startTime") AS date,
                COUNT(DISTINCT proxy_server_request->'metadata'->'requester_metadata'->>'agent_session_id') AS sessions
            FROM "LiteLLM_SpendLogs"
            WHERE proxy_server_request::text <> '{}'
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_name' = $1
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_version' = $2
              AND "startTime" >= $3
              AND "startTime" < $4
            GROUP BY DATE("startTime")
            ORDER BY date ASC
            "#,
        )
        .bind(&filter.agent_name)
        .bind(&filter.agent_version)
        .bind(window.start_bound())
        .bind(window.end_bound())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Daily sessions query failed: {}", e)))?;

        let sessions = rows
            .into_iter()
            .filter_map(|row| {
                let date = row.try_get("date").ok()?;
                Some(DailySessionRow {
                    date,
                    sessions: row.try_get("sessions").unwrap_or(0),
                })
            })
            .collect();

        Ok(sessions)
    }

    async fn daily_tokens(
        &self,
        filter: &AgentFilter,
        window: QueryWindow,
    ) -> Result<Vec<DailyTokenRow>> {
        let rows = sqlx::query(
            r#"
            SELECT
                DATE("startTime") AS date,
                COALESCE(SUM(prompt_tokens), 0) AS prompt_tokens,
                COALESCE(SUM(completion_tokens), 0) AS completion_tokens
            FROM "LiteLLM_SpendLogs"
            WHERE proxy_server_request::text <> '{}'
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_name' = $1
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_version' = $2
              AND "startTime" >= $3
              AND "startTime" < $4
            GROUP BY DATE("startTime")
            ORDER BY date ASC
            "#,
        )
        .bind(&filter.agent_name)
        .bind(&filter.agent_version)
        .bind(window.start_bound())
        .bind(window.end_bound())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Daily tokens query failed: {}", e)))?;

        let tokens = rows
            .into_iter()
            .filter_map(|row| {
                let date = row.try_get("date").ok()?;
                Some(DailyTokenRow {
                    date,
                    prompt_tokens: row.try_get("prompt_tokens").unwrap_or(0),
                    completion_tokens: row.try_get("completion_tokens").unwrap_or(0),
                })
            })
            .collect();

        Ok(tokens)
    }

    async fn token_totals(
        &self,
        filter: &AgentFilter,
        window: QueryWindow,
    ) -> Result<TokenTotals> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(prompt_tokens), 0) AS total_prompt_tokens,
                COALESCE(SUM(completion_tokens), 0) AS total_completion_tokens
            FROM "LiteLLM_SpendLogs"
            WHERE proxy_server_request::text <> '{}'
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_name' = $1
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_version' = $2
              AND "startTime" >= $3
              AND "startTime" < $4
            "#,
        )
        .bind(&filter.agent_name)
        .bind(&filter.agent_version)
        .bind(window.start_bound())
        .bind(window.end_bound())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Token totals query failed: {}", e)))?;

        Ok(TokenTotals {
            prompt_tokens: row.try_get("total_prompt_tokens").unwrap_or(0),
            completion_tokens: row.try_get("total_completion_tokens").unwrap_or(0),
        })
    }

    async fn usage_logs(
        &self,
        filter: &AgentFilter,
        window: QueryWindow,
    ) -> Result<Vec<UsageLogRow>> {
        let rows = sqlx::query(
            r#"
            SELECT
                "startTime" AS timestamp,
                proxy_server_request->'metadata'->'requester_metadata'->>'agent_name' AS agent_name,
                COALESCE(total_tokens, 0)::bigint AS total_tokens,
                COALESCE(prompt_tokens, 0)::bigint AS prompt_tokens,
                COALESCE(completion_tokens, 0)::bigint AS completion_tokens,
                COALESCE(EXTRACT(EPOCH FROM ("endTime" - "startTime")), 0)::float8 AS duration_seconds
            FROM "LiteLLM_SpendLogs"
            WHERE proxy_server_request::text <> '{}'
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_name' = $1
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_version' = $2
              AND "startTime" >= $3
              AND "startTime" < $4
            ORDER BY "startTime" DESC
            "#,
        )
        .bind(&filter.agent_name)
        .bind(&filter.agent_version)
        .bind(window.start_bound())
        .bind(window.end_bound())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Detailed usage query failed: {}", e)))?;

        let logs = rows
            .into_iter()
            .filter_map(|row| {
                let timestamp = row.try_get("timestamp").ok()?;
                Some(UsageLogRow {
                    timestamp,
                    agent_name: row.try_get("agent_name").ok().flatten(),
                    total_tokens: row.try_get("total_tokens").unwrap_or(0),
                    prompt_tokens: row.try_get("prompt_tokens").unwrap_or(0),
                    completion_tokens: row.try_get("completion_tokens").unwrap_or(0),
                    duration_seconds: row.try_get("duration_seconds").unwrap_or(0.0),
                })
            })
            .collect();

        Ok(logs)
    }

    async fn recent_messages(
        &self,
        filter: &AgentFilter,
        window: QueryWindow,
    ) -> Result<Vec<MessageRow>> {
        let rows = sqlx::query(
            r#"
            SELECT
                "startTime" AS timestamp,
                proxy_server_request->'metadata'->'requester_metadata'->>'agent_session_id' AS session_id,
                proxy_server_request->'metadata'->'requester_metadata'->>'agent_name' AS agent_name,
                response->>'model' AS model_name,
                response->'choices'->0->'message'->>'content' AS message
            FROM "LiteLLM_SpendLogs"
            WHERE proxy_server_request::text <> '{}'
              AND response::text <> '{}'
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_name' = $1
              AND proxy_server_request->'metadata'->'requester_metadata'->>'agent_version' = $2
              AND "startTime" >= $3
              AND "startTime" < $4
            ORDER BY "startTime" DESC
            "#,
        )
        .bind(&filter.agent_name)
        .bind(&filter.agent_version)
        .bind(window.start_bound())
        .bind(window.end_bound())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Recent messages query failed: {}", e)))?;

        let messages = rows
            .into_iter()
            .filter_map(|row| {
                let timestamp = row.try_get("timestamp").ok()?;
                Some(MessageRow {
                    timestamp,
                    session_id: row.try_get("session_id").ok().flatten(),
                    agent_name: row.try_get("agent_name").ok().flatten(),
                    model_name: row.try_get("model_name").ok().flatten(),
                    message: row.try_get("message").ok().flatten(),
                })
            })
            .collect();

        Ok(messages)
    }

    async fn merge_request_metadata(
        &self,
        request_id: &str,
        metadata: &AgentMetadata,
    ) -> Result<()> {
        let patch = serde_json::to_value(metadata)?;

        // Server-side merge in one statement so concurrent updates to the
        // same row cannot lose keys.
        let result = sqlx::query(
            r#"
            UPDATE "LiteLLM_SpendLogs"
            SET messages = COALESCE(messages, '{}'::jsonb) || $2
            WHERE request_id = $1
            "#,
        )
        .bind(request_id)
        .bind(&patch)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Update messages failed: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(Error::RequestNotFound(request_id.to_string()));
        }

        Ok(())
    }
}
