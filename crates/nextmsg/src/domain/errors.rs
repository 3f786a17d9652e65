//! Domain Errors
//!
//! Error types for rewrite and fan-out operations.

use thiserror::Error;

use crate::domain::value_objects::Relationship;

/// Errors from a single rewrite (one relationship)
#[derive(Debug, Error)]
pub enum RewriteError {
    /// Caller input is incomplete or unknown; never reaches the model
    #[error("{0}")]
    Validation(String),

    /// A required credential or setting is absent
    #[error("{key} is not configured")]
    Configuration { key: String },

    #[error("No response from AI")]
    EmptyResponse,

    /// Payload violated the variant contract. `reason` stays server-side.
    #[error("Invalid response format")]
    MalformedResponse { reason: String },

    #[error("External service error: {0}")]
    Service(String),
}

impl RewriteError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn configuration(key: impl Into<String>) -> Self {
        Self::Configuration { key: key.into() }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Whether the caller is at fault (4xx) rather than the server (5xx)
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Batch failure: one relationship failed, so the whole fan-out did
#[derive(Debug, Error)]
pub enum FanOutError {
    #[error("Failed to generate message for {relationship}")]
    Relationship {
        relationship: Relationship,
        #[source]
        source: RewriteError,
    },

    /// A rewrite task panicked or was cancelled by the runtime
    #[error("Rewrite task did not finish: {reason}")]
    TaskFailed { reason: String },
}
