//! Error types for cardoon-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the scheduler, the combat resolver and their collaborators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Malformed input, rejected before any state is mutated.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced card, user, level or enemy does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A computed value left its valid bounds. Indicates a programming defect.
    #[error("inconsistent state: {0}")]
    InconsistentState(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::InconsistentState(msg.into())
    }
}
