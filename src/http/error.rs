//! Mapping of handler failures to HTTP responses.

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::http::request::X_CORRELATION_ID;
use crate::messages::MessageValidationError;
use crate::store::StoreError;

/// Body returned for a store failure. Never carries the cause.
pub const SERVER_ERROR_MESSAGE: &str = "Server error.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] MessageValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => {
                tracing::debug!(reason = %e, "Rejected message");
                let body = ErrorBody { error: e.to_string() };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Store(e) => {
                let correlation_id = Uuid::new_v4().to_string();
                tracing::error!(correlation_id = %correlation_id, error = %e, "Store operation failed");

                let body = ErrorBody {
                    error: SERVER_ERROR_MESSAGE.to_string(),
                };
                let mut response = (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
                if let Ok(value) = HeaderValue::from_str(&correlation_id) {
                    response.headers_mut().insert(X_CORRELATION_ID, value);
                }
                response
            }
        }
    }
}
