use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use recordkeep_core::DomainError;
use recordkeep_infra::StoreError;

/// Every failure a handler can produce, with its HTTP mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 404 `{"error": "<Entity> not found"}`.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 400 with the client-facing validation message.
    #[error("{0}")]
    Validation(String),

    /// 400 for bodies that are not valid JSON for the endpoint.
    #[error("invalid JSON body: {0}")]
    InvalidBody(String),

    /// 500; details are logged, never sent to the client.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => ApiError::Validation(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(_) => json_error(StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Validation(_) | ApiError::InvalidBody(_) => {
                json_error(StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let resp = ApiError::NotFound("Item").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn domain_validation_keeps_message() {
        let err = ApiError::from(DomainError::validation("Name is required"));
        assert_eq!(err.to_string(), "Name is required");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_failures_map_to_500() {
        let err = ApiError::from(StoreError::Unavailable("connection pool closed".into()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
