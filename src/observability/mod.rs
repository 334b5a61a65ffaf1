//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → per-request spans carrying the request ID (http/request.rs)
//!
//! Consumers:
//!     → stdout, human-readable or JSON lines (logging.rs)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - Store failures are logged with a correlation ID that is also returned to the client

pub mod logging;
