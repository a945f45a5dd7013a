//! An in-process identity provider for development, demos and tests.
//!
//! [`MemoryIdentityProvider`] keeps accounts in a `HashMap` and behaves
//! like a hosted email/password provider closely enough to exercise every
//! flow in the session layer: it validates inputs, issues random user ids,
//! signs new accounts in, emits auth-state notifications, and can be told
//! to fail specific calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rand::Rng;
use rand::distr::Alphanumeric;
use scorekeep_model::{
    AuthErrorCode, DependencyStatus, Identity, ProviderError, UserId,
};
use tokio::sync::watch;

use crate::IdentityProvider;

/// Length of generated user ids, matching what hosted providers issue.
const USER_ID_LEN: usize = 28;

/// Passwords shorter than this are rejected as weak.
const MIN_PASSWORD_LEN: usize = 6;

/// Names the provider calls that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderCall {
    SignIn,
    CreateAccount,
    UpdateProfile,
    DeleteAccount,
    SendPasswordReset,
    SignOut,
}

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    email: String,
    password: String,
    display_name: Option<String>,
}

impl Account {
    fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

#[derive(Default)]
struct Accounts {
    /// Keyed by email; emails are unique per provider.
    by_email: HashMap<String, Account>,
    /// One-shot failures, consumed by the next matching call.
    faults: HashMap<ProviderCall, AuthErrorCode>,
    /// Addresses a reset email was "sent" to, oldest first.
    reset_outbox: Vec<String>,
}

struct Inner {
    status: DependencyStatus,
    accounts: Mutex<Accounts>,
    current: watch::Sender<Option<Identity>>,
}

/// Email/password identity provider that lives entirely in memory.
///
/// Cloning is cheap and every clone shares the same accounts, so a test
/// can keep one clone to inspect state while the session manager owns
/// another.
#[derive(Clone)]
pub struct MemoryIdentityProvider {
    inner: Arc<Inner>,
}

impl MemoryIdentityProvider {
    /// Creates an empty provider whose dependency check succeeds.
    pub fn new() -> Self {
        Self::with_status(DependencyStatus::Available)
    }

    /// Creates an empty provider that reports `status` from
    /// [`check_dependencies`](IdentityProvider::check_dependencies).
    pub fn with_status(status: DependencyStatus) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                status,
                accounts: Mutex::new(Accounts::default()),
                current,
            }),
        }
    }

    /// Makes the next `call` fail with `code`.
    pub fn fail_next(&self, call: ProviderCall, code: AuthErrorCode) {
        self.accounts().faults.insert(call, code);
    }

    /// Returns the stored identity for `email`, if an account exists.
    pub fn account(&self, email: &str) -> Option<Identity> {
        self.accounts().by_email.get(email).map(Account::identity)
    }

    /// Number of accounts currently registered.
    pub fn account_count(&self) -> usize {
        self.accounts().by_email.len()
    }

    /// Every address a password-reset email was sent to, oldest first.
    pub fn password_resets_sent(&self) -> Vec<String> {
        self.accounts().reset_outbox.clone()
    }

    /// The provider's own view of who is signed in.
    pub fn current_user(&self) -> Option<Identity> {
        self.inner.current.borrow().clone()
    }

    fn accounts(&self) -> MutexGuard<'_, Accounts> {
        // A panic while holding the lock can't leave `Accounts` half
        // updated, so a poisoned lock is still safe to use.
        self.inner
            .accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_current(&self, identity: Option<Identity>) {
        self.inner.current.send_replace(identity);
    }

    fn is_current(&self, user_id: &UserId) -> bool {
        self.inner
            .current
            .borrow()
            .as_ref()
            .is_some_and(|current| &current.user_id == user_id)
    }
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    async fn check_dependencies(&self) -> DependencyStatus {
        self.inner.status
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        let identity = {
            let mut accounts = self.accounts();
            take_fault(&mut accounts, ProviderCall::SignIn)?;
            check_email(email)?;
            if password.is_empty() {
                return Err(error(AuthErrorCode::MissingPassword));
            }

            let account = accounts
                .by_email
                .get(email)
                .ok_or_else(|| error(AuthErrorCode::UserNotFound))?;
            if account.password != password {
                return Err(error(AuthErrorCode::WrongPassword));
            }
            account.identity()
        };

        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        let identity = {
            let mut accounts = self.accounts();
            take_fault(&mut accounts, ProviderCall::CreateAccount)?;
            check_email(email)?;
            if password.is_empty() {
                return Err(error(AuthErrorCode::MissingPassword));
            }
            if password.len() < MIN_PASSWORD_LEN {
                return Err(error(AuthErrorCode::WeakPassword));
            }
            if accounts.by_email.contains_key(email) {
                return Err(error(AuthErrorCode::EmailAlreadyInUse));
            }

            let account = Account {
                user_id: generate_user_id(),
                email: email.to_string(),
                password: password.to_string(),
                display_name: None,
            };
            let identity = account.identity();
            accounts.by_email.insert(email.to_string(), account);
            identity
        };

        // Hosted providers sign a freshly created account in.
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn update_profile(
        &self,
        identity: &Identity,
        display_name: &str,
    ) -> Result<(), ProviderError> {
        let updated = {
            let mut accounts = self.accounts();
            take_fault(&mut accounts, ProviderCall::UpdateProfile)?;
            let account = accounts
                .by_email
                .values_mut()
                .find(|a| a.user_id == identity.user_id)
                .ok_or_else(|| error(AuthErrorCode::UserNotFound))?;
            account.display_name = Some(display_name.to_string());
            account.identity()
        };

        if self.is_current(&updated.user_id) {
            self.set_current(Some(updated));
        }
        Ok(())
    }

    async fn delete_account(
        &self,
        identity: &Identity,
    ) -> Result<(), ProviderError> {
        {
            let mut accounts = self.accounts();
            take_fault(&mut accounts, ProviderCall::DeleteAccount)?;
            let before = accounts.by_email.len();
            accounts
                .by_email
                .retain(|_, account| account.user_id != identity.user_id);
            if accounts.by_email.len() == before {
                return Err(error(AuthErrorCode::UserNotFound));
            }
        }

        if self.is_current(&identity.user_id) {
            self.set_current(None);
        }
        Ok(())
    }

    async fn send_password_reset(
        &self,
        email: &str,
    ) -> Result<(), ProviderError> {
        let mut accounts = self.accounts();
        take_fault(&mut accounts, ProviderCall::SendPasswordReset)?;
        check_email(email)?;
        if !accounts.by_email.contains_key(email) {
            return Err(error(AuthErrorCode::UserNotFound));
        }
        accounts.reset_outbox.push(email.to_string());
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        take_fault(&mut self.accounts(), ProviderCall::SignOut)?;
        self.set_current(None);
        Ok(())
    }

    fn auth_state(&self) -> watch::Receiver<Option<Identity>> {
        self.inner.current.subscribe()
    }
}

fn take_fault(
    accounts: &mut Accounts,
    call: ProviderCall,
) -> Result<(), ProviderError> {
    match accounts.faults.remove(&call) {
        Some(code) => Err(ProviderError::new(code, format!("{call:?} failed"))),
        None => Ok(()),
    }
}

fn check_email(email: &str) -> Result<(), ProviderError> {
    if email.is_empty() {
        return Err(error(AuthErrorCode::MissingEmail));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            Ok(())
        }
        _ => Err(error(AuthErrorCode::InvalidEmail)),
    }
}

fn error(code: AuthErrorCode) -> ProviderError {
    ProviderError::new(code, format!("{code}"))
}

/// Generates a random alphanumeric user id.
fn generate_user_id() -> UserId {
    let id: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(USER_ID_LEN)
        .map(char::from)
        .collect();
    UserId(id)
}
