//! Error types for the model layer.
//!
//! Each crate in Scorekeep defines its own error enum. A `ModelError`
//! always means a value was malformed before it ever reached a provider.

/// Errors raised while building model values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A document key was empty.
    #[error("document key must not be empty")]
    EmptyKey,

    /// A document key contained a character the store reserves for
    /// its own syntax (`/ . # $ [ ]`).
    ///
    /// `#[error("...")]` can reference named fields directly, so this
    /// prints as: `invalid character '#' in document key "a#b"`.
    #[error("invalid character {found:?} in document key {key:?}")]
    InvalidKey { key: String, found: char },
}
