//! Player session management for Scorekeep.
//!
//! This crate owns everything between the login screen and the
//! identity provider:
//!
//! 1. **Provider seam**: the [`IdentityProvider`] trait a real or
//!    in-memory provider implements.
//! 2. **Session tracking**: [`SessionManager`] caches who is signed in
//!    and reacts to the provider's auth-state notifications.
//! 3. **Account flows**: login, registration (with a compensating
//!    delete when the profile can't be set), password reset, sign-out.
//! 4. **Error classification**: mapping provider codes to the short
//!    human-readable reasons shown to players ([`classify`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Event loop (scorekeep)  ← drives the manager, turns results into UI events
//!     ↕
//! Session Layer (this crate)  ← identity, auth flows, classification
//!     ↕
//! Model (scorekeep-model)  ← Identity, ProviderError, AuthErrorCode
//! ```

#![allow(async_fn_in_trait)]

mod classify;
mod error;
mod manager;
#[cfg(feature = "memory")]
mod memory;
mod provider;
mod session;

pub use classify::{AuthFailure, Operation, classify, failure_message};
pub use error::{SessionError, ValidationError};
pub use manager::{AuthTransition, SessionManager};
#[cfg(feature = "memory")]
pub use memory::{MemoryIdentityProvider, ProviderCall};
pub use provider::{AuthStateChanges, IdentityProvider};
pub use session::{Navigation, RegistrationForm, Session, SessionConfig};
