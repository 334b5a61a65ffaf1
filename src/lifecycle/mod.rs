//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Connect store (with retries) → Bind listener → Serving
//!
//! Shutdown (startup.rs + shutdown.rs):
//!     close() → Stop accepting → Drain requests → [Wipe] → Release store → Closed
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → main calls Application::close()
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then store, then listener
//! - Ordered shutdown: stop accept, drain, wipe, disconnect
//! - Draining has a deadline; stragglers are aborted

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use shutdown::{Shutdown, ShutdownListener};
pub use startup::{Application, StartupError};
pub use state::LifecycleState;
