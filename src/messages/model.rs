//! Message entity and input validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Upper bound on trimmed message length, in UTF-16 code units.
pub const MAX_MESSAGE_CHARS: usize = 250;

/// How many messages a listing returns at most.
pub const RECENT_LIMIT: usize = 10;

/// A stored message as published to clients.
///
/// The store's sequence identifier is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Trimmed text.
    pub message: String,
    /// Server-side `DD:MM:YYYY HH:MM:SS` at insertion.
    pub timestamp: String,
}

/// Why a submitted message was rejected. The display text goes to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageValidationError {
    #[error("Message is required.")]
    Empty,

    #[error("Message must be 250 characters or fewer.")]
    TooLong { length: usize },
}

/// Message text that passed validation: trimmed, 1..=250 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// Length is measured in UTF-16 code units, so a character outside the
    /// Basic Multilingual Plane counts twice. A byte-order mark is trimmed
    /// like whitespace.
    pub fn parse(raw: &str) -> Result<Self, MessageValidationError> {
        let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
        if trimmed.is_empty() {
            return Err(MessageValidationError::Empty);
        }

        let length = trimmed.encode_utf16().count();
        if length > MAX_MESSAGE_CHARS {
            return Err(MessageValidationError::TooLong { length });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Validate the `message` field of a request body.
    ///
    /// A missing field or a non-string value counts as empty.
    pub fn from_body(body: &Value) -> Result<Self, MessageValidationError> {
        let raw = body.get("message").and_then(Value::as_str).unwrap_or("");
        Self::parse(raw)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
