//! Error types for the session layer.

use scorekeep_model::{DependencyStatus, ProviderError};

use crate::{AuthFailure, Operation};

/// Errors that can occur while managing a player's session.
///
/// Only [`SessionError::DependencyUnavailable`] is fatal, and only at
/// startup. Everything else ends the current request and leaves the
/// manager ready for the player to try again.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The identity provider's runtime dependencies are not present.
    #[error("could not resolve all identity provider dependencies: {0}")]
    DependencyUnavailable(DependencyStatus),

    /// The identity provider refused a request.
    ///
    /// `message` is the classified, player-facing text (for example
    /// "Login Failed! Because Wrong Password"); `source` keeps the raw
    /// provider error for logs.
    #[error("{message}")]
    Auth {
        operation: Operation,
        failure: AuthFailure,
        message: String,
        #[source]
        source: ProviderError,
    },

    /// A registration form failed local checks. No provider call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Local registration checks, run before anything is sent to the provider.
///
/// The checks short-circuit in declaration order: an empty name is
/// reported even if the passwords also differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The display name field is empty.
    #[error("User Name is empty")]
    EmptyName,

    /// The email field is empty.
    #[error("email field is empty")]
    EmptyEmail,

    /// The password and its confirmation differ.
    #[error("Password does not match")]
    PasswordMismatch,
}
