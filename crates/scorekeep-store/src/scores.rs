//! Score store: the leaderboard read and the high-score write.

use scorekeep_model::DocPath;
use scorekeep_session::Session;
use serde_json::Value;

use crate::{
    DocumentStore, LeaderboardView, StoreConfig, StoreError, read_score,
};

/// What [`ScoreStore::update_score`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreUpdate {
    /// Nobody is signed in; the store was not touched.
    NotSignedIn,

    /// The stored score was at least as high; nothing was written.
    Kept { current: u64 },

    /// The new score beat the stored one and was written.
    Raised { previous: u64, score: u64 },
}

/// Reads the leaderboard and records personal bests.
///
/// Wraps any [`DocumentStore`]. Holds no cache: every call goes to the
/// store.
pub struct ScoreStore<D: DocumentStore> {
    store: D,
    config: StoreConfig,
    /// Resolved once so a bad collection name fails at construction.
    collection: DocPath,
}

impl<D: DocumentStore> ScoreStore<D> {
    /// Creates a score store over `store`.
    ///
    /// # Errors
    /// - [`StoreError::Path`]: the configured collection or score field
    ///   can't be used as a document key
    /// - [`StoreError::InvalidConfig`]: `leaderboard_size` is 0
    pub fn new(store: D, config: StoreConfig) -> Result<Self, StoreError> {
        if config.leaderboard_size == 0 {
            return Err(StoreError::InvalidConfig(
                "leaderboard_size must be at least 1".to_string(),
            ));
        }
        let collection = config.collection_path()?;
        // Validate the field name now rather than on the first write.
        collection.child(&config.score_field)?;

        Ok(Self {
            store,
            config,
            collection,
        })
    }

    /// Fetches the highest scores, smallest first.
    ///
    /// # Errors
    /// - [`StoreError::NoData`]: the collection is empty; there is
    ///   nothing to render
    /// - anything the underlying store reports
    pub async fn top_scores(&self) -> Result<LeaderboardView, StoreError> {
        let query = self.config.leaderboard_query();

        let entries = match self.store.query(&self.collection, &query).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(
                    path = %self.collection,
                    error = %e,
                    "leaderboard query failed"
                );
                return Err(e);
            }
        };

        if entries.is_empty() {
            tracing::info!(path = %self.collection, "snapshot does not exist");
            return Err(StoreError::NoData(self.collection.clone()));
        }

        let view = LeaderboardView::from_entries(&entries, &self.config.score_field);
        tracing::info!(
            entries = entries.len(),
            scores = %view,
            "leaderboard loaded"
        );
        Ok(view)
    }

    /// Records `new_score` as the player's best if it beats the stored one.
    ///
    /// Reads the current score (missing counts as 0) and writes only when
    /// `new_score` is strictly greater. The read and the write are two
    /// separate round-trips with no transaction between them: callers
    /// that submit concurrently for the same player must serialize their
    /// calls, or a lower score can land last.
    ///
    /// # Errors
    /// - [`StoreError::InvalidScore`]: the stored value isn't a score
    /// - [`StoreError::Path`]: the user id can't be used as a key
    /// - anything the underlying store reports
    pub async fn update_score(
        &self,
        session: &Session,
        new_score: u64,
    ) -> Result<ScoreUpdate, StoreError> {
        let Some(user_id) = session.user_id.as_ref() else {
            tracing::debug!("score not submitted: nobody is signed in");
            return Ok(ScoreUpdate::NotSignedIn);
        };

        let path = self.config.score_path(user_id)?;

        let current = match self.store.get(&path).await? {
            None | Some(Value::Null) => 0,
            Some(value) => read_score(&value).ok_or_else(|| {
                StoreError::InvalidScore {
                    path: path.clone(),
                    raw: value.to_string(),
                }
            })?,
        };

        if new_score <= current {
            tracing::debug!(%user_id, current, new_score, "score kept");
            return Ok(ScoreUpdate::Kept { current });
        }

        self.store.set(&path, Value::from(new_score)).await?;
        tracing::info!(%user_id, previous = current, score = new_score, "high score raised");

        Ok(ScoreUpdate::Raised {
            previous: current,
            score: new_score,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The wrapped document store.
    pub fn backend(&self) -> &D {
        &self.store
    }
}
