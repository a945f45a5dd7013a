//! Identity types returned by the identity provider.
//!
//! Everything here crosses the provider boundary: user ids and profiles
//! coming back from a sign-in, the dependency check performed at startup,
//! and the coded failures the provider reports when a request is refused.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// The provider's opaque identifier for an account.
///
/// This is a newtype wrapper around `String`: the provider decides the
/// format (hosted providers typically issue 28-character alphanumeric
/// ids), and we never look inside it. Wrapping it means a user id can't
/// be confused with an email or a display name in function signatures.
///
/// `#[serde(transparent)]` serializes a `UserId("abc")` as just `"abc"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Returns the id as a string slice, e.g. to use it as a document key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// An authenticated account as reported by the identity provider.
///
/// Returned by sign-in and account creation, and carried by auth-state
/// notifications. `display_name` is `None` until a profile update sets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The provider-issued account id.
    pub user_id: UserId,

    /// The email address the account was created with.
    pub email: String,

    /// The public name shown on screen, if one was ever set.
    pub display_name: Option<String>,
}

impl Identity {
    /// Returns the display name, or an empty string when none is set.
    pub fn display_name_or_default(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// DependencyStatus
// ---------------------------------------------------------------------------

/// Result of checking the identity provider's runtime dependencies.
///
/// Only [`DependencyStatus::Available`] lets the component start. Every
/// other status is fatal for initialization: it is logged and the
/// component stays non-functional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyStatus {
    /// Everything the provider needs is present.
    Available,
    /// A required service is disabled on this device.
    Disabled,
    /// A required service is installed but invalid.
    Invalid,
    /// A required service is missing.
    Missing,
    /// The process lacks permission to use a required service.
    PermissionDenied,
    /// A required service is being updated right now.
    Updating,
    /// A required service must be updated before use.
    UpdateRequired,
    /// Any other unrecoverable condition.
    Other,
}

impl DependencyStatus {
    /// Returns `true` if the provider can be used.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for DependencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Available => "Available",
            Self::Disabled => "UnavailableDisabled",
            Self::Invalid => "UnavailableInvalid",
            Self::Missing => "UnavailableMissing",
            Self::PermissionDenied => "UnavailablePermission",
            Self::Updating => "UnavailableUpdating",
            Self::UpdateRequired => "UnavailableUpdaterequired",
            Self::Other => "UnavailableOther",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// AuthErrorCode / ProviderError
// ---------------------------------------------------------------------------

/// The fixed enumeration of failure codes an identity provider reports.
///
/// The session layer only gives special treatment to a handful of these
/// (see its classification table). The rest exist because real providers
/// return them, and they must all degrade to a generic message rather
/// than being lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthErrorCode {
    /// Unspecified provider failure.
    Failure,
    /// The email address is malformed.
    InvalidEmail,
    /// The password does not match the account.
    WrongPassword,
    /// No email address was supplied.
    MissingEmail,
    /// No password was supplied.
    MissingPassword,
    /// No account exists for the given email.
    UserNotFound,
    /// An account already exists for the given email.
    EmailAlreadyInUse,
    /// The password is rejected as too weak.
    WeakPassword,
    /// The account has been disabled by an administrator.
    UserDisabled,
    /// The provider is throttling this client.
    TooManyRequests,
    /// The request never reached the provider.
    NetworkRequestFailed,
    /// The operation needs a fresh sign-in first.
    RequiresRecentLogin,
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The Debug name is already the canonical code name.
        write!(f, "{self:?}")
    }
}

/// A coded failure reported by the identity provider.
///
/// `code` drives classification; `message` is the provider's own
/// free-form text and is only ever logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    /// The machine-readable failure code.
    pub code: AuthErrorCode,
    /// Provider-supplied detail, for logs.
    pub message: String,
}

impl ProviderError {
    /// Creates a provider error from a code and a detail message.
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_serializes_transparently() {
        let id = UserId::from("u-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"u-1\"");
    }

    #[test]
    fn test_user_id_display_is_raw_id() {
        assert_eq!(UserId::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_display_name_or_default_without_name_is_empty() {
        let identity = Identity {
            user_id: UserId::from("u"),
            email: "a@b.c".into(),
            display_name: None,
        };
        assert_eq!(identity.display_name_or_default(), "");
    }

    #[test]
    fn test_dependency_status_only_available_is_available() {
        assert!(DependencyStatus::Available.is_available());
        assert!(!DependencyStatus::Missing.is_available());
        assert!(!DependencyStatus::UpdateRequired.is_available());
    }

    #[test]
    fn test_dependency_status_display_uses_provider_names() {
        assert_eq!(
            DependencyStatus::PermissionDenied.to_string(),
            "UnavailablePermission"
        );
    }

    #[test]
    fn test_provider_error_display_includes_code_and_message() {
        let err = ProviderError::new(AuthErrorCode::WrongPassword, "nope");
        assert_eq!(err.to_string(), "WrongPassword: nope");
    }
}
