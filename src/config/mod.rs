//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional TOML file (loader.rs, --config)
//!     → .env file + environment variables (loader.rs)
//!     → validation.rs (semantic checks)
//!     → BoardConfig (validated, immutable)
//!     → handed to Application at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults except the store targets
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    BackoffKind, BoardConfig, FrontendConfig, LifecycleConfig, LimitsConfig, ListenerConfig,
    LogFormat, ObservabilityConfig, RetryConfig, StoreBackend, StoreConfig,
};
pub use validation::ValidationError;
