//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, per-request span)
//!     → handlers.rs (validate, call MessageGateway)
//!     → error.rs (400 with reason / 500 with correlation ID)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use request::{RequestIdExt, X_CORRELATION_ID, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
