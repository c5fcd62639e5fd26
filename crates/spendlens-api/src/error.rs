//! HTTP error mapping
//!
//! Every error response carries the `{detail, error_code}` body, with
//! `error_code` derived from the status (`HTTP_404`, `HTTP_422`, ...).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use spendlens_core::Error;

use crate::models::ErrorBody;

/// Error type returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail,
            error_code: format!("HTTP_{}", self.status.as_u16()),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidDays(_) => {
                Self::unprocessable("days parameter must be one of: 1, 2, 7, 15, 20")
            }
            Error::RequestNotFound(id) => Self::not_found(format!("Request ID {} not found", id)),
            Error::Database(_) => Self::internal("Internal server error"),
            _ => Self::internal("Internal server error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_tracks_status() {
        let err = ApiError::not_found("No data found");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_days_maps_to_422() {
        let err: ApiError = Error::InvalidDays(3).into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.detail.contains("1, 2, 7, 15, 20"));
    }

    #[test]
    fn request_not_found_mentions_the_id() {
        let err: ApiError = Error::RequestNotFound("abc".to_string()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.detail.contains("abc"));
    }
}
