//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Store connection at startup:
//!     → retries.rs (attempt, warn, wait, attempt again)
//!     → backoff.rs (how long to wait before the next attempt)
//!     → exhausted: last error handed back to the caller
//! ```
//!
//! # Design Decisions
//! - Attempts are bounded; worst-case startup delay is attempts × delay
//! - Fixed delay by default, exponential with jitter on request
//! - Waiting uses the Tokio timer so other tasks keep running

pub mod backoff;
pub mod retries;

pub use backoff::BackoffPolicy;
pub use retries::{retry, RetryError, RetryPolicy};
