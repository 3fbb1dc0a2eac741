//! Error types
//!
//! Counter operations never fail. Errors only arise while building a counter
//! from configuration, or inside a store (where they are logged and dropped).

use thiserror::Error;

/// Errors raised while constructing a counter
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("Invalid counter configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Failed to parse counter configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl CounterError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        CounterError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Errors raised by a storage backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage is unavailable")]
    Unavailable,

    #[error("Storage write failed: {0}")]
    Write(String),
}
