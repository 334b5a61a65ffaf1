use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub message: String, // Always "Stored"
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    messages: Vec<MessageEntry>,
}

#[derive(Debug, Serialize)]
struct NewMessage<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status. `error` is the server's `error` field, or the raw body.
    #[error("board returned {status}: {error}")]
    Api {
        status: StatusCode,
        error: String,
        correlation_id: Option<String>,
    },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            ClientError::Decode(_) => None,
        }
    }
}

pub struct BoardClient {
    client: Client,
    base_url: String,
}

impl BoardClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The most recent messages, newest first.
    pub async fn list_messages(&self) -> Result<Vec<MessageEntry>, ClientError> {
        let resp = self
            .client
            .get(format!("{}/api/messages", self.base_url))
            .send()
            .await?;
        let list: MessageList = decode(resp).await?;
        Ok(list.messages)
    }

    /// Store a message. The server trims and validates it.
    pub async fn post_message(&self, text: &str) -> Result<StoredMessage, ClientError> {
        let resp = self
            .client
            .post(format!("{}/api/messages", self.base_url))
            .json(&NewMessage { message: text })
            .send()
            .await?;
        decode(resp).await
    }

    /// Liveness probe.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    let correlation_id = resp
        .headers()
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = resp.text().await?;

    if !status.is_success() {
        let error = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) => text,
        };
        return Err(ClientError::Api {
            status,
            error,
            correlation_id,
        });
    }

    Ok(serde_json::from_str(&text)?)
}
