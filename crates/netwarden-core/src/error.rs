//! Error type for the core view-model layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A backend call failed. Network trouble, timeouts, and backend
    /// rejections all land here; callers that care can probe
    /// [`is_transient`](Self::is_transient).
    #[error(transparent)]
    Backend(#[from] netwarden_api::Error),

    /// A mutation was asked of a rule the backend no longer knows.
    #[error("rule not found: {id}")]
    RuleNotFound { id: String },

    /// Input rejected before it ever reached the backend.
    #[error("invalid rule pattern: {reason}")]
    InvalidPattern { reason: String },
}

impl CoreError {
    /// Whether retrying the same call later could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Backend(err) => err.is_transient(),
            Self::RuleNotFound { .. } | Self::InvalidPattern { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
