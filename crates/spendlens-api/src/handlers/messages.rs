//! Metadata merge endpoint

use axum::{extract::State, Json};
use spendlens_core::Error;
use tracing::{error, info};

use crate::error::ApiError;
use crate::models::{UpdateMessagesRequest, UpdateMessagesResponse};
use crate::AppState;

/// `POST /update-messages` — merge the five agent metadata keys into the
/// `messages` document of one spend log row. 404 when the id is unknown.
pub async fn update_messages(
    State(state): State<AppState>,
    Json(request): Json<UpdateMessagesRequest>,
) -> Result<Json<UpdateMessagesResponse>, ApiError> {
    info!(request_id = %request.request_id, "updating messages metadata");

    state
        .store
        .merge_request_metadata(&request.request_id, &request.agent_metadata)
        .await
        .map_err(|err| match err {
            Error::RequestNotFound(id) => {
                ApiError::not_found(format!("Request ID {} not found", id))
            }
            other => {
                error!(
                    error = %other,
                    request_id = %request.request_id,
                    "failed to update messages"
                );
                ApiError::internal("Internal server error while updating messages")
            }
        })?;

    let message = format!(
        "Successfully updated messages column for request_id: {}",
        request.request_id
    );

    Ok(Json(UpdateMessagesResponse {
        status: "success".to_string(),
        request_id: request.request_id,
        message,
    }))
}
