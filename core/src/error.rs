//! Engine error types

use thiserror::Error;

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors raised inside `invoke`/`update` calls.
///
/// There is no recovery policy at this level: every combinator
/// propagates the failure unmodified to the original caller. The only
/// softening is opt-in at the leaf (`Extract` with a default policy,
/// `Gather`/`Pluck` yielding `Null` for absent keys).
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("missing key '{0}'")]
    MissingKey(String),

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    /// Failure inside a leaf tool outside the engine's own vocabulary.
    #[error("{0}")]
    Leaf(String),
}

impl ToolError {
    pub fn leaf(message: impl Into<String>) -> Self {
        ToolError::Leaf(message.into())
    }

    /// Check if this error is a missing-key lookup.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, ToolError::MissingKey(_))
    }
}
