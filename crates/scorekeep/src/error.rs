//! Unified error type for Scorekeep.

use scorekeep_session::SessionError;
use scorekeep_store::StoreError;

/// Top-level error that wraps the crate-specific errors.
///
/// Everything a [`ScorekeeperHandle`](crate::ScorekeeperHandle) returns
/// fails with this one type; `#[from]` lets `?` lift sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum ScorekeepError {
    /// A session-level error (dependencies, auth, form validation).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A store-level error (unreachable, no data, bad record).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The event loop has stopped and can't take requests.
    #[error("scorekeeper is not running")]
    Unavailable,
}

impl ScorekeepError {
    /// The text to show the player for a classified auth failure.
    pub fn auth_message(&self) -> Option<&str> {
        match self {
            Self::Session(SessionError::Auth { message, .. }) => Some(message),
            _ => None,
        }
    }
}
