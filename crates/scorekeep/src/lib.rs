//! # Scorekeep
//!
//! Player sessions and a persistent leaderboard for small games.
//!
//! Scorekeep sits between a game's UI and two external services: an
//! identity provider (email/password accounts) and a hierarchical
//! document store (one score record per player). The game implements or
//! picks an [`IdentityProvider`] and a [`DocumentStore`]; Scorekeep runs
//! the login, registration and password-reset flows, keeps each player's
//! best score, and renders the leaderboard.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scorekeep::prelude::*;
//!
//! # async fn run() -> Result<(), ScorekeepError> {
//! let (keeper, mut events) = Scorekeeper::builder()
//!     .start(MemoryIdentityProvider::new(), MemoryDocumentStore::new())
//!     .await?;
//!
//! keeper.login("ana@example.com", "hunter22").await?;
//! keeper.submit_score(30).await?;
//! keeper.top_scores().await?;
//!
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod actor;
mod config;
mod error;
mod events;
mod keeper;

pub use config::ScorekeepConfig;
pub use error::ScorekeepError;
pub use events::UiEvent;
pub use keeper::{Scorekeeper, ScorekeeperBuilder, ScorekeeperHandle};

pub use scorekeep_model::{Identity, UserId};
pub use scorekeep_session::{
    IdentityProvider, Navigation, RegistrationForm, Session, SessionConfig, SessionError,
};
pub use scorekeep_store::{DocumentStore, LeaderboardView, ScoreUpdate, StoreConfig, StoreError};

/// Everything a game needs to wire Scorekeep up.
pub mod prelude {
    pub use crate::{
        DocumentStore, IdentityProvider, LeaderboardView, RegistrationForm, ScoreUpdate,
        ScorekeepConfig, ScorekeepError, Scorekeeper, ScorekeeperHandle, Session,
        SessionConfig, StoreConfig, UiEvent, UserId,
    };

    #[cfg(feature = "memory")]
    pub use scorekeep_session::MemoryIdentityProvider;
    #[cfg(feature = "memory")]
    pub use scorekeep_store::MemoryDocumentStore;
}
