//! Message and liveness handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::messages::{Message, MessageText};

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageList {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoredMessage {
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// `GET /api/messages`
pub async fn list_messages(State(state): State<AppState>) -> Result<Json<MessageList>, ApiError> {
    let messages = state.gateway.list_recent().await?;
    Ok(Json(MessageList { messages }))
}

/// `POST /api/messages`
///
/// The body is parsed leniently: anything that is not an `application/json`
/// object with a string `message` is treated as an empty message.
pub async fn create_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<StoredMessage>), ApiError> {
    let body: Value = if is_json(&headers) {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    } else {
        Value::Null
    };
    let text = MessageText::from_body(&body)?;

    let timestamp = state.gateway.insert(text).await?;
    tracing::debug!(timestamp = %timestamp, "Stored message");

    Ok((
        StatusCode::CREATED,
        Json(StoredMessage {
            message: "Stored".to_string(),
            timestamp,
        }),
    ))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// `GET /health`
///
/// Liveness only; the store is not consulted.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}
