//! Error types for the store layer.

use scorekeep_model::{DocPath, ModelError};

/// Errors that can occur while reading or writing scores.
///
/// None of these are fatal: the failed request is logged and dropped,
/// and the next request starts from scratch.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store didn't complete the request (offline, refused, ...).
    #[error("document store request did not complete: {0}")]
    NotCompleted(String),

    /// The path holds no data, so there is nothing to render.
    #[error("no data at {0}")]
    NoData(DocPath),

    /// A stored score couldn't be read as a non-negative integer.
    #[error("value at {path} is not a valid score: {raw}")]
    InvalidScore { path: DocPath, raw: String },

    /// The configuration can't produce a leaderboard.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),

    /// A configured name or a user id can't be used as a document key.
    #[error(transparent)]
    Path(#[from] ModelError),
}
