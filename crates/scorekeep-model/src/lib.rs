//! Shared vocabulary for Scorekeep.
//!
//! This crate defines the types that both providers speak:
//!
//! - **Identity** ([`UserId`], [`Identity`], [`DependencyStatus`]): what
//!   the identity provider hands back after a sign-in or registration.
//! - **Provider failures** ([`AuthErrorCode`], [`ProviderError`]): the
//!   fixed set of coded failures an identity provider can report.
//! - **Documents** ([`DocPath`], [`Query`], [`QueryEntry`]): how records
//!   in the hierarchical document store are addressed and queried.
//!
//! # Architecture
//!
//! The model layer sits underneath both adapters. It knows nothing about
//! sessions or leaderboards, only about the shapes that cross the
//! provider boundary.
//!
//! ```text
//! Session Manager ─┐
//!                  ├─→ Model (this crate)
//! Score Store ─────┘
//! ```

mod document;
mod error;
mod identity;

pub use document::{DocPath, Query, QueryEntry};
pub use error::ModelError;
pub use identity::{
    AuthErrorCode, DependencyStatus, Identity, ProviderError, UserId,
};
