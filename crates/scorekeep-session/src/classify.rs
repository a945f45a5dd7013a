//! Mapping provider failure codes to player-facing messages.
//!
//! Every account flow reports failures the same way: the provider's
//! [`AuthErrorCode`] is narrowed to an [`AuthFailure`] that the flow
//! knows how to explain, and anything else collapses to
//! [`AuthFailure::Other`]. The message for `Other` is always the bare
//! generic text, e.g. `"Login Failed"`, with nothing appended.
//!
//! | operation      | explained failures                                      |
//! |----------------|---------------------------------------------------------|
//! | Login          | InvalidEmail, WrongPassword, MissingEmail, MissingPassword |
//! | Registration   | same as Login                                            |
//! | ProfileUpdate  | same as Login                                            |
//! | PasswordReset  | UserNotFound, InvalidEmail                               |
//! | SignOut        | none                                                     |

use std::fmt;

use scorekeep_model::AuthErrorCode;

/// The account flow a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Registration,
    ProfileUpdate,
    PasswordReset,
    SignOut,
}

impl Operation {
    /// The message shown when the failure has no specific explanation.
    pub fn generic_message(self) -> &'static str {
        match self {
            Self::Login => "Login Failed",
            Self::Registration => "Registration Failed",
            Self::ProfileUpdate => "Profile update Failed",
            Self::PasswordReset => "Failed to send password reset email",
            Self::SignOut => "Sign out Failed",
        }
    }

    /// Returns `true` if this flow has a specific message for `failure`.
    pub fn explains(self, failure: AuthFailure) -> bool {
        use AuthFailure::*;
        match self {
            Self::Login | Self::Registration | Self::ProfileUpdate => matches!(
                failure,
                InvalidEmail | WrongPassword | MissingEmail | MissingPassword
            ),
            Self::PasswordReset => matches!(failure, UserNotFound | InvalidEmail),
            Self::SignOut => false,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Registration => "registration",
            Self::ProfileUpdate => "profile update",
            Self::PasswordReset => "password reset",
            Self::SignOut => "sign out",
        };
        f.write_str(name)
    }
}

/// The closed set of reasons a flow can explain to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthFailure {
    InvalidEmail,
    WrongPassword,
    MissingEmail,
    MissingPassword,
    UserNotFound,
    Other,
}

/// Narrows a provider code to a failure the given flow can explain.
///
/// Total: every code maps to something, and codes the flow has no
/// message for become [`AuthFailure::Other`].
pub fn classify(operation: Operation, code: AuthErrorCode) -> AuthFailure {
    let failure = match code {
        AuthErrorCode::InvalidEmail => AuthFailure::InvalidEmail,
        AuthErrorCode::WrongPassword => AuthFailure::WrongPassword,
        AuthErrorCode::MissingEmail => AuthFailure::MissingEmail,
        AuthErrorCode::MissingPassword => AuthFailure::MissingPassword,
        AuthErrorCode::UserNotFound => AuthFailure::UserNotFound,
        _ => AuthFailure::Other,
    };

    if operation.explains(failure) {
        failure
    } else {
        AuthFailure::Other
    }
}

/// Renders the player-facing message for a classified failure.
///
/// Explained failures read `"<generic>! Because <reason>"`; everything
/// else is exactly the generic message.
pub fn failure_message(operation: Operation, failure: AuthFailure) -> String {
    match reason(operation, failure) {
        Some(reason) => {
            format!("{}! Because {reason}", operation.generic_message())
        }
        None => operation.generic_message().to_string(),
    }
}

fn reason(operation: Operation, failure: AuthFailure) -> Option<&'static str> {
    if !operation.explains(failure) {
        return None;
    }
    let text = match failure {
        // The reset screen words this one differently.
        AuthFailure::InvalidEmail if operation == Operation::PasswordReset => {
            "Invalid email"
        }
        AuthFailure::InvalidEmail => "Email is invalid",
        AuthFailure::WrongPassword => "Wrong Password",
        AuthFailure::MissingEmail => "Email is missing",
        AuthFailure::MissingPassword => "Password is missing",
        AuthFailure::UserNotFound => "User not found",
        AuthFailure::Other => return None,
    };
    Some(text)
}
