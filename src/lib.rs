//! Message board service library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod messages;
pub mod observability;
pub mod resilience;
pub mod store;

pub use config::BoardConfig;
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown};
pub use messages::{Message, MessageGateway};
