//! Typed HTTP client for the message board API.

pub mod client;

pub use client::{BoardClient, ClientError, HealthStatus, MessageEntry, StoredMessage};
