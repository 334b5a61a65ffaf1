//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Required store targets when the MongoDB backend is selected
//! - Validate value ranges (attempts >= 1, timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BoardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{BoardConfig, StoreBackend};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be {constraint}")]
    OutOfRange {
        field: &'static str,
        constraint: &'static str,
    },
}

pub fn validate_config(config: &BoardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.store.backend == StoreBackend::Mongodb {
        if config.store.uri.trim().is_empty() {
            errors.push(ValidationError::Missing("store.uri"));
        }
        if config.store.database.trim().is_empty() {
            errors.push(ValidationError::Missing("store.database"));
        }
        if config.store.collection.trim().is_empty() {
            errors.push(ValidationError::Missing("store.collection"));
        }
        if config.store.server_selection_timeout_ms == 0 {
            errors.push(ValidationError::OutOfRange {
                field: "store.server_selection_timeout_ms",
                constraint: "greater than 0",
            });
        }
    }

    if config.retry.max_attempts == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "retry.max_attempts",
            constraint: "at least 1",
        });
    }

    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "limits.request_timeout_secs",
            constraint: "greater than 0",
        });
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "limits.max_body_bytes",
            constraint: "greater than 0",
        });
    }

    if config.frontend.serve_static && config.frontend.static_dir.trim().is_empty() {
        errors.push(ValidationError::Missing("frontend.static_dir"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
