//! Store-level errors.

use bcc_types::BccError;
use thiserror::Error;

/// Errors surfaced by the external graph store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the call timed out; transient
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A node's property payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A node carried properties that do not match its label
    #[error("Invalid node '{key}': {reason}")]
    InvalidNode { key: String, reason: String },
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<StoreError> for BccError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(msg) => BccError::Store(msg),
            StoreError::Serialization(msg) => BccError::Store(msg),
            StoreError::InvalidNode { key, reason } => {
                BccError::Store(format!("invalid node '{}': {}", key, reason))
            }
        }
    }
}
