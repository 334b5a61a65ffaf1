//! Application lifecycle state machine.
//!
//! # State Transitions
//! ```text
//! Uninitialized → Connecting: process start
//! Connecting → Serving:       store connected, listener bound
//! Connecting → Failed:        connection attempts exhausted (or bind failed)
//! Serving → Draining:         close requested
//! Draining → Closed:          optional wipe done, store released
//! ```

use std::fmt;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Connecting,
    Serving,
    Draining,
    Closed,
    /// Startup failed; the process is expected to exit non-zero.
    Failed,
}

impl LifecycleState {
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Uninitialized, Connecting)
                | (Connecting, Serving)
                | (Connecting, Failed)
                | (Serving, Draining)
                | (Draining, Closed)
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Connecting => "connecting",
            LifecycleState::Serving => "serving",
            LifecycleState::Draining => "draining",
            LifecycleState::Closed => "closed",
            LifecycleState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid lifecycle transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

/// Shared, checked holder of the current state.
#[derive(Debug)]
pub struct StateCell {
    state: Mutex<LifecycleState>,
}

impl StateCell {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LifecycleState::Uninitialized),
        }
    }

    pub fn get(&self) -> LifecycleState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn transition(&self, next: LifecycleState) -> Result<(), InvalidTransition> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let from = *state;
        if !from.can_transition_to(next) {
            return Err(InvalidTransition { from, to: next });
        }
        tracing::debug!(from = %from, to = %next, "Lifecycle transition");
        *state = next;
        Ok(())
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}
