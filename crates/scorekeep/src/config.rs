//! Top-level configuration.

use scorekeep_session::SessionConfig;
use scorekeep_store::StoreConfig;
use serde::{Deserialize, Serialize};

/// Everything a [`Scorekeeper`](crate::ScorekeeperBuilder) needs to know.
///
/// Each section fills its missing fields from its own [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorekeepConfig {
    pub session: SessionConfig,
    pub store: StoreConfig,

    /// How many requests may queue up before handle calls wait.
    ///
    /// Default: 32. Zero is treated as 1.
    pub command_buffer: usize,
}

impl Default for ScorekeepConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            store: StoreConfig::default(),
            command_buffer: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sections() {
        let config = ScorekeepConfig::default();
        assert_eq!(config.session.post_login_scene, "7");
        assert_eq!(config.store.collection, "Puntos");
        assert_eq!(config.command_buffer, 32);
    }

    #[test]
    fn test_nested_partial_config_fills_defaults() {
        let config: ScorekeepConfig = serde_json::from_str(
            r#"{ "store": { "leaderboard_size": 10 }, "command_buffer": 4 }"#,
        )
        .unwrap();

        assert_eq!(config.store.leaderboard_size, 10);
        assert_eq!(config.store.score_field, "Puntaje");
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.command_buffer, 4);
    }
}
