//! The session manager: drives every account flow against the provider.
//!
//! It is responsible for:
//! - Checking the provider's dependencies and subscribing to its
//!   auth-state notifications at startup
//! - Keeping the cached [`Session`] in step with the provider
//! - Login, registration, password reset and sign-out
//! - Classifying and logging every provider failure
//!
//! # Concurrency note
//!
//! `SessionManager` takes `&mut self` for every flow and has no internal
//! locking. It is owned by a single task (the `scorekeep` event loop),
//! which runs one flow at a time; that ordering is what keeps the cached
//! session consistent with the provider.

use scorekeep_model::{Identity, ProviderError, UserId};

use crate::{
    AuthStateChanges, IdentityProvider, Navigation, Operation,
    RegistrationForm, Session, SessionConfig, SessionError, classify,
    failure_message,
};

/// What an auth-state notification changed.
///
/// Both fields are set when one account replaces another without a
/// sign-out in between.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthTransition {
    /// The account that is no longer signed in.
    pub signed_out: Option<UserId>,
    /// The account that is now signed in.
    pub signed_in: Option<UserId>,
}

impl AuthTransition {
    /// Returns `true` if the notification changed nothing.
    pub fn is_empty(&self) -> bool {
        self.signed_out.is_none() && self.signed_in.is_none()
    }
}

/// Owns the player's session and the connection to the identity provider.
///
/// ## Lifecycle
///
/// ```text
/// initialize() ──→ [signed out] ──login()/register()──→ [signed in]
///                        ↑                                  │
///                        └──────────── sign_out() ──────────┘
/// ```
///
/// Provider notifications ([`on_auth_state_changed`](Self::on_auth_state_changed))
/// can move between the two states at any time.
pub struct SessionManager<P: IdentityProvider> {
    provider: P,
    session: Session,
    config: SessionConfig,
}

impl<P: IdentityProvider> SessionManager<P> {
    /// Binds to the provider and starts listening for auth-state changes.
    ///
    /// Returns the manager together with the notification stream; feed
    /// each item of the stream back into
    /// [`on_auth_state_changed`](Self::on_auth_state_changed).
    ///
    /// # Errors
    /// [`SessionError::DependencyUnavailable`] if the provider's
    /// dependency check reports anything but `Available`. This is logged
    /// and the component should stay non-functional.
    pub async fn initialize(
        provider: P,
        config: SessionConfig,
    ) -> Result<(Self, AuthStateChanges), SessionError> {
        let status = provider.check_dependencies().await;
        if !status.is_available() {
            tracing::error!(
                %status,
                "could not resolve all identity provider dependencies"
            );
            return Err(SessionError::DependencyUnavailable(status));
        }

        let mut receiver = provider.auth_state();
        let current = receiver.borrow_and_update().clone();

        let mut manager = Self {
            provider,
            session: Session::signed_out(),
            config,
        };
        // Apply whatever the provider already knows (e.g. a persisted
        // sign-in from a previous run).
        manager.on_auth_state_changed(current);

        tracing::info!("session manager initialized");
        Ok((manager, AuthStateChanges::new(receiver)))
    }

    /// Reconciles the cached session with the provider's current identity.
    ///
    /// Does nothing when the provider reports the account that is already
    /// cached. Otherwise logs the sign-out of the old account and/or the
    /// sign-in of the new one and replaces the session.
    pub fn on_auth_state_changed(
        &mut self,
        identity: Option<Identity>,
    ) -> AuthTransition {
        let incoming = identity.as_ref().map(|i| &i.user_id);
        if incoming == self.session.user_id.as_ref() {
            return AuthTransition::default();
        }

        let mut transition = AuthTransition::default();

        if let Some(previous) = self.session.user_id.take() {
            tracing::info!(user_id = %previous, "signed out");
            transition.signed_out = Some(previous);
        }

        self.session = match identity {
            Some(identity) => {
                tracing::info!(user_id = %identity.user_id, "signed in");
                transition.signed_in = Some(identity.user_id.clone());
                Session::from_identity(&identity)
            }
            None => Session::signed_out(),
        };

        transition
    }

    /// Signs in with an email and password.
    ///
    /// On success the session is updated and the caller is told where to
    /// navigate next.
    ///
    /// # Errors
    /// [`SessionError::Auth`] with the failure classified under
    /// [`Operation::Login`].
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Navigation, SessionError> {
        let identity = self
            .provider
            .sign_in(email, password)
            .await
            .map_err(|e| classified(Operation::Login, e))?;

        self.session = Session::from_identity(&identity);
        tracing::info!(
            user_id = %identity.user_id,
            "{} You Are Successfully Logged In",
            identity.display_name_or_default()
        );

        Ok(Navigation {
            scene: self.config.post_login_scene.clone(),
        })
    }

    /// Creates an account and sets its display name.
    ///
    /// The form is checked locally first; nothing is sent to the provider
    /// if any check fails. If the account is created but the display name
    /// can't be set, the new account is deleted again so no nameless
    /// account is left behind.
    ///
    /// # Errors
    /// - [`SessionError::Validation`]: a local check failed
    /// - [`SessionError::Auth`] under [`Operation::Registration`]: the
    ///   provider refused to create the account
    /// - [`SessionError::Auth`] under [`Operation::ProfileUpdate`]: the
    ///   display name couldn't be set (the account has been deleted)
    pub async fn register(
        &mut self,
        form: &RegistrationForm,
    ) -> Result<Identity, SessionError> {
        if let Err(e) = form.validate() {
            tracing::error!(error = %e, "registration rejected");
            return Err(e.into());
        }

        let identity = self
            .provider
            .create_account(&form.email, &form.password)
            .await
            .map_err(|e| classified(Operation::Registration, e))?;

        if let Err(source) =
            self.provider.update_profile(&identity, &form.name).await
        {
            self.discard_account(&identity).await;
            return Err(classified(Operation::ProfileUpdate, source));
        }

        let identity = Identity {
            display_name: Some(form.name.clone()),
            ..identity
        };
        self.session = Session::from_identity(&identity);
        tracing::info!(
            user_id = %identity.user_id,
            "Registration Successful Welcome {}",
            form.name
        );

        Ok(identity)
    }

    /// Asks the provider to send a password-reset email.
    ///
    /// # Errors
    /// [`SessionError::Auth`] under [`Operation::PasswordReset`].
    pub async fn change_password(
        &mut self,
        email: &str,
    ) -> Result<(), SessionError> {
        self.provider
            .send_password_reset(email)
            .await
            .map_err(|e| classified(Operation::PasswordReset, e))?;

        tracing::info!("password reset email sent successfully");
        Ok(())
    }

    /// Signs the current account out and clears the session.
    ///
    /// Returns the account that was signed out, if there was one.
    ///
    /// # Errors
    /// [`SessionError::Auth`] under [`Operation::SignOut`]; the session
    /// is left as it was.
    pub async fn sign_out(&mut self) -> Result<Option<UserId>, SessionError> {
        self.provider
            .sign_out()
            .await
            .map_err(|e| classified(Operation::SignOut, e))?;

        let previous = self.session.user_id.take();
        self.session = Session::signed_out();
        if let Some(user_id) = &previous {
            tracing::info!(%user_id, "signed out");
        }
        Ok(previous)
    }

    /// The current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The provider this manager is bound to.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Compensating action after a failed profile update.
    async fn discard_account(&mut self, identity: &Identity) {
        match self.provider.delete_account(identity).await {
            Ok(()) => tracing::info!(
                user_id = %identity.user_id,
                "deleted account after failed profile update"
            ),
            Err(e) => tracing::warn!(
                user_id = %identity.user_id,
                error = %e,
                "could not delete account after failed profile update"
            ),
        }

        if self.session.user_id.as_ref() == Some(&identity.user_id) {
            self.session = Session::signed_out();
        }
    }
}

/// Logs a provider failure and wraps it with its classified message.
fn classified(operation: Operation, source: ProviderError) -> SessionError {
    tracing::error!(%operation, error = %source, "identity provider request failed");

    let failure = classify(operation, source.code);
    let message = failure_message(operation, failure);
    tracing::warn!(%operation, "{message}");

    SessionError::Auth {
        operation,
        failure,
        message,
        source,
    }
}

// =========================================================================
// Tests
// =========================================================================
