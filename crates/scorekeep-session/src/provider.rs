//! The identity provider seam.
//!
//! Scorekeep doesn't implement authentication itself. Credentials are
//! checked, accounts created, and reset emails sent by an external
//! identity provider. This module defines the [`IdentityProvider`] trait
//! that such a provider is wrapped in, so the session layer can be
//! driven by a hosted service in production, by
//! [`MemoryIdentityProvider`](crate::MemoryIdentityProvider) in
//! development, and by a hand-written mock in tests.

use std::future::Future;
use std::sync::Arc;

use scorekeep_model::{DependencyStatus, Identity, ProviderError};
use tokio::sync::watch;

/// Capability interface to an external identity provider.
///
/// # Trait bounds
///
/// - `Send + Sync` → the provider is shared with the event loop task,
///   which Tokio may run on any worker thread.
/// - `'static` → it owns its state and lives as long as the component.
///
/// Every request method returns a future that resolves once the
/// provider has answered. There is no timeout: a request that never
/// completes leaves the calling flow pending.
///
/// # Example
///
/// ```rust
/// use scorekeep_model::{
///     AuthErrorCode, DependencyStatus, Identity, ProviderError, UserId,
/// };
/// use scorekeep_session::IdentityProvider;
/// use tokio::sync::watch;
///
/// /// Accepts exactly one hard-coded account. Never use outside a demo.
/// struct SingleUser {
///     state: watch::Sender<Option<Identity>>,
/// }
///
/// impl IdentityProvider for SingleUser {
///     async fn check_dependencies(&self) -> DependencyStatus {
///         DependencyStatus::Available
///     }
///
///     async fn sign_in(
///         &self,
///         email: &str,
///         password: &str,
///     ) -> Result<Identity, ProviderError> {
///         if email != "demo@example.com" || password != "secret" {
///             return Err(ProviderError::new(
///                 AuthErrorCode::WrongPassword,
///                 "bad credentials",
///             ));
///         }
///         let identity = Identity {
///             user_id: UserId::from("demo"),
///             email: email.to_string(),
///             display_name: Some("Demo".into()),
///         };
///         self.state.send_replace(Some(identity.clone()));
///         Ok(identity)
///     }
///
///     async fn create_account(
///         &self,
///         _email: &str,
///         _password: &str,
///     ) -> Result<Identity, ProviderError> {
///         Err(ProviderError::new(AuthErrorCode::Failure, "closed"))
///     }
///
///     async fn update_profile(
///         &self,
///         _identity: &Identity,
///         _display_name: &str,
///     ) -> Result<(), ProviderError> {
///         Ok(())
///     }
///
///     async fn delete_account(
///         &self,
///         _identity: &Identity,
///     ) -> Result<(), ProviderError> {
///         Ok(())
///     }
///
///     async fn send_password_reset(
///         &self,
///         _email: &str,
///     ) -> Result<(), ProviderError> {
///         Ok(())
///     }
///
///     async fn sign_out(&self) -> Result<(), ProviderError> {
///         self.state.send_replace(None);
///         Ok(())
///     }
///
///     fn auth_state(&self) -> watch::Receiver<Option<Identity>> {
///         self.state.subscribe()
///     }
/// }
/// ```
pub trait IdentityProvider: Send + Sync + 'static {
    /// Verifies the provider's runtime dependencies are present.
    ///
    /// Called once, before anything else. Any status other than
    /// [`DependencyStatus::Available`] aborts initialization.
    fn check_dependencies(
        &self,
    ) -> impl Future<Output = DependencyStatus> + Send;

    /// Signs in with an email and password.
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send;

    /// Creates a new account. On success the provider also signs it in.
    fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send;

    /// Sets the display name on an existing account.
    fn update_profile(
        &self,
        identity: &Identity,
        display_name: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Permanently deletes an account.
    fn delete_account(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Asks the provider to email a password-reset link.
    fn send_password_reset(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Signs the current account out.
    fn sign_out(
        &self,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Subscribes to auth-state notifications.
    ///
    /// The channel always holds the provider's current identity (`None`
    /// when signed out) and is marked changed whenever that identity
    /// changes, including changes the provider makes on its own.
    fn auth_state(&self) -> watch::Receiver<Option<Identity>>;
}

/// Sharing a provider behind an `Arc` keeps it usable as a provider.
///
/// Tests rely on this: they hand an `Arc<Mock>` to the session manager
/// and keep a clone to inspect what the manager asked for.
impl<T: IdentityProvider> IdentityProvider for Arc<T> {
    fn check_dependencies(
        &self,
    ) -> impl Future<Output = DependencyStatus> + Send {
        (**self).check_dependencies()
    }

    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send {
        (**self).sign_in(email, password)
    }

    fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send {
        (**self).create_account(email, password)
    }

    fn update_profile(
        &self,
        identity: &Identity,
        display_name: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send {
        (**self).update_profile(identity, display_name)
    }

    fn delete_account(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send {
        (**self).delete_account(identity)
    }

    fn send_password_reset(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send {
        (**self).send_password_reset(email)
    }

    fn sign_out(
        &self,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send {
        (**self).sign_out()
    }

    fn auth_state(&self) -> watch::Receiver<Option<Identity>> {
        (**self).auth_state()
    }
}

/// Stream of auth-state notifications, returned by
/// [`SessionManager::initialize`](crate::SessionManager::initialize).
///
/// Kept separate from the manager so an event loop can wait on it in a
/// `tokio::select!` while still holding `&mut SessionManager` in the
/// other branches.
#[derive(Debug)]
pub struct AuthStateChanges {
    receiver: watch::Receiver<Option<Identity>>,
}

impl AuthStateChanges {
    pub(crate) fn new(receiver: watch::Receiver<Option<Identity>>) -> Self {
        Self { receiver }
    }

    /// Waits for the provider's identity to change and returns the new one.
    ///
    /// Returns `None` once the provider has dropped its side of the
    /// channel; no further notifications will arrive after that.
    pub async fn next(&mut self) -> Option<Option<Identity>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}
