//! Message domain: entity, validation, timestamps and the store gateway.

pub mod gateway;
pub mod model;
pub mod timestamp;

pub use gateway::MessageGateway;
pub use model::{Message, MessageText, MessageValidationError, MAX_MESSAGE_CHARS, RECENT_LIMIT};
pub use timestamp::format_timestamp;
