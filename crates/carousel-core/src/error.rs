//! Error types for the carousel edges.
//!
//! The engine itself never fails on user input: invalid interactions are
//! silent no-ops. These errors cover parsing external text, configuration and
//! session lookup.

use thiserror::Error;
use uuid::Uuid;

/// Top-level carousel error type.
#[derive(Debug, Error)]
pub enum CarouselError {
    /// No carousel session exists for the identifier.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// An interaction does not apply in the current state. The runtime
    /// treats it as a no-op.
    #[error("interaction ignored: {0}")]
    Ignored(String),

    /// Input was structurally valid but semantically rejected.
    #[error("validation error: {0}")]
    Validation(String),

    /// A configuration value is missing or out of range.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Document or card-set text could not be parsed at all.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CarouselError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
