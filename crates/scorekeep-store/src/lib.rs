//! Leaderboard and high-score storage for Scorekeep.
//!
//! Scores live in a hierarchical document store, one record per player
//! under a fixed collection:
//!
//! ```text
//! Puntos/
//!   <user_id>/
//!     Puntaje: 30
//! ```
//!
//! # Key types
//!
//! - [`DocumentStore`]: the trait a real or in-memory store implements
//! - [`ScoreStore`]: reads the top scores and raises a player's best
//! - [`LeaderboardView`]: the top-N projection, rendered as `"7, 12, 30"`
//! - [`StoreConfig`]: collection and field names, leaderboard size
//! - [`MemoryDocumentStore`]: in-process store (`memory` feature)

#![allow(async_fn_in_trait)]

mod backend;
mod config;
mod error;
mod leaderboard;
#[cfg(feature = "memory")]
mod memory;
mod scores;

pub use backend::DocumentStore;
pub use config::StoreConfig;
pub use error::StoreError;
pub use leaderboard::{LeaderboardView, extract_scores_from_raw, read_score};
#[cfg(feature = "memory")]
pub use memory::{MemoryDocumentStore, StoreCall};
pub use scores::{ScoreStore, ScoreUpdate};
