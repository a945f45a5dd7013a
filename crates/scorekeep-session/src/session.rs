//! Session types: what the component remembers about the signed-in player.

use scorekeep_model::{Identity, UserId};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for the session layer.
///
/// `#[serde(default)]` lets a partial config fill the missing fields
/// from [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// The screen to navigate to after a successful login.
    ///
    /// Default: `"7"`, the game's main menu scene.
    pub post_login_scene: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            post_login_scene: "7".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The locally cached view of who is signed in.
///
/// There is exactly one of these per [`SessionManager`](crate::SessionManager).
/// It starts signed out, is filled in by a successful login or
/// registration (or by a provider notification), and is cleared on
/// sign-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// The signed-in account, or `None` when nobody is signed in.
    pub user_id: Option<UserId>,

    /// The account's display name. Empty when signed out or when the
    /// account has no name yet.
    pub display_name: String,
}

impl Session {
    /// A session with nobody signed in.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// A session for the given provider identity.
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            user_id: Some(identity.user_id.clone()),
            display_name: identity.display_name_or_default().to_string(),
        }
    }

    /// Returns `true` if someone is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// A request to move the player to another screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The destination scene.
    pub scene: String,
}

// ---------------------------------------------------------------------------
// RegistrationForm
// ---------------------------------------------------------------------------

/// The four fields of the registration screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Runs the local checks, stopping at the first one that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.email.is_empty() {
            return Err(ValidationError::EmptyEmail);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}
