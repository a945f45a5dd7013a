//! Store configuration.

use scorekeep_model::{DocPath, ModelError, Query, UserId};
use serde::{Deserialize, Serialize};

/// Where scores live and how many make the leaderboard.
///
/// The defaults match the game's existing data: records under `Puntos`,
/// each with its score in `Puntaje`, and a three-entry leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Top-level collection holding one record per player.
    pub collection: String,

    /// Field inside each record that holds the score. Used both to
    /// order the leaderboard query and to read the value back.
    pub score_field: String,

    /// How many of the highest scores the leaderboard shows.
    pub leaderboard_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: "Puntos".to_string(),
            score_field: "Puntaje".to_string(),
            leaderboard_size: 3,
        }
    }
}

impl StoreConfig {
    /// Path of the score collection.
    pub fn collection_path(&self) -> Result<DocPath, ModelError> {
        DocPath::root().child(&self.collection)
    }

    /// Path of one player's score: `<collection>/<user_id>/<score_field>`.
    pub fn score_path(&self, user_id: &UserId) -> Result<DocPath, ModelError> {
        self.collection_path()?
            .child(user_id.as_str())?
            .child(&self.score_field)
    }

    /// The leaderboard query: ordered by score, last N.
    pub fn leaderboard_query(&self) -> Query {
        Query::order_by_child(&self.score_field)
            .limit_to_last(self.leaderboard_size)
    }
}
