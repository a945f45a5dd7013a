//! Events the UI observes.

use scorekeep_model::UserId;

/// Something the UI should react to.
///
/// Sent on the unbounded channel returned by
/// [`ScorekeeperBuilder::start`](crate::ScorekeeperBuilder::start), in
/// the order the event loop produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Load the named scene (after a successful login).
    Navigate { scene: String },

    /// New text for the leaderboard label, e.g. `"7, 12, 30"`.
    ScoreText(String),

    /// A player is now signed in.
    SignedIn(UserId),

    /// A player is no longer signed in.
    SignedOut(UserId),
}
