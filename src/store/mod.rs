//! Backing store subsystem.
//!
//! # Data Flow
//! ```text
//! MessageGateway (messages/gateway.rs)
//!     → dyn MessageStore
//!         → mongo.rs  (MongoDB collection, `_id` order)
//!         → memory.rs (process-local Vec, counter order)
//! ```
//!
//! # Design Decisions
//! - One handle per process, created at startup and closed once at shutdown
//! - Newest-first is insertion order, never timestamp comparison
//! - No locking above the store: single-document inserts and read-only queries

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::messages::Message;

pub mod memory;
pub mod mongo;

pub use memory::InMemoryMessageStore;
pub use mongo::MongoMessageStore;

/// Errors from the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver-level failure (network, server selection, write error).
    #[error("document store error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Store could not serve the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Handle was already released.
    #[error("store connection is closed")]
    Closed,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A persisted collection of messages.
///
/// Implementations must list in reverse insertion order and must never
/// return the internal sequence identifier.
pub trait MessageStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Up to `limit` messages, newest first.
    fn recent(&self, limit: usize) -> BoxFuture<'_, StoreResult<Vec<Message>>>;

    /// Append one message.
    fn insert(&self, message: Message) -> BoxFuture<'_, StoreResult<()>>;

    /// Delete everything this store owns.
    fn wipe(&self) -> BoxFuture<'_, StoreResult<()>>;

    /// Release the connection. Later calls are no-ops.
    fn close(&self) -> BoxFuture<'_, StoreResult<()>>;
}
