//! Integration tests for the score store over the in-memory backend.

use std::sync::Arc;

use scorekeep_model::{DocPath, Query, QueryEntry, UserId};
use scorekeep_session::Session;
use scorekeep_store::{
    DocumentStore, MemoryDocumentStore, ScoreStore, ScoreUpdate, StoreCall, StoreConfig,
    StoreError,
};
use serde_json::{Value, json};
use tokio::sync::Barrier;

// =========================================================================
// Helpers
// =========================================================================

fn signed_in(user: &str) -> Session {
    Session {
        user_id: Some(UserId::from(user)),
        display_name: user.to_string(),
    }
}

fn seeded(scores: &[(&str, Value)]) -> MemoryDocumentStore {
    let records: serde_json::Map<String, Value> = scores
        .iter()
        .map(|(user, score)| (user.to_string(), json!({ "Puntaje": score })))
        .collect();
    MemoryDocumentStore::with_root(json!({ "Puntos": records }))
}

fn score_store(backend: MemoryDocumentStore) -> ScoreStore<MemoryDocumentStore> {
    ScoreStore::new(backend, StoreConfig::default()).unwrap()
}

fn stored(backend: &MemoryDocumentStore, user: &str) -> Value {
    backend.snapshot()["Puntos"][user]["Puntaje"].clone()
}

// =========================================================================
// Leaderboard
// =========================================================================

#[tokio::test]
async fn test_top_scores_returns_highest_three_ascending() {
    let backend = seeded(&[
        ("a", json!(5)),
        ("b", json!(12)),
        ("c", json!(7)),
        ("d", json!(30)),
        ("e", json!(1)),
    ]);
    let scores = score_store(backend);

    let view = scores.top_scores().await.unwrap();

    assert_eq!(view.scores(), &[7, 12, 30]);
    assert_eq!(view.to_string(), "7, 12, 30");
}

#[tokio::test]
async fn test_top_scores_with_fewer_records_than_limit() {
    let scores = score_store(seeded(&[("solo", json!(42))]));

    let view = scores.top_scores().await.unwrap();

    assert_eq!(view.to_string(), "42");
}

#[tokio::test]
async fn test_top_scores_empty_collection_is_no_data() {
    let scores = score_store(MemoryDocumentStore::new());

    let result = scores.top_scores().await;

    assert!(matches!(result, Err(StoreError::NoData(path)) if path.to_string() == "Puntos"));
}

#[tokio::test]
async fn test_top_scores_respects_leaderboard_size() {
    let backend = seeded(&[("a", json!(1)), ("b", json!(2)), ("c", json!(3))]);
    let config = StoreConfig {
        leaderboard_size: 2,
        ..StoreConfig::default()
    };
    let scores = ScoreStore::new(backend, config).unwrap();

    let view = scores.top_scores().await.unwrap();

    assert_eq!(view.scores(), &[2, 3]);
}

#[tokio::test]
async fn test_top_scores_propagates_store_failure() {
    let backend = seeded(&[("a", json!(1))]);
    backend.fail_next(StoreCall::Query, "offline");
    let scores = score_store(backend);

    let result = scores.top_scores().await;

    assert!(matches!(result, Err(StoreError::NotCompleted(_))));
}

// =========================================================================
// High-score updates
// =========================================================================

#[tokio::test]
async fn test_update_score_first_score_is_written() {
    let backend = MemoryDocumentStore::new();
    let scores = score_store(backend.clone());

    let outcome = scores.update_score(&signed_in("p1"), 10).await.unwrap();

    assert_eq!(outcome, ScoreUpdate::Raised { previous: 0, score: 10 });
    assert_eq!(stored(&backend, "p1"), json!(10));
}

#[tokio::test]
async fn test_update_score_higher_score_replaces() {
    let backend = seeded(&[("p1", json!(10))]);
    let scores = score_store(backend.clone());

    let outcome = scores.update_score(&signed_in("p1"), 25).await.unwrap();

    assert_eq!(outcome, ScoreUpdate::Raised { previous: 10, score: 25 });
    assert_eq!(stored(&backend, "p1"), json!(25));
}

#[tokio::test]
async fn test_update_score_equal_score_does_not_write() {
    let backend = seeded(&[("p1", json!(10))]);
    let scores = score_store(backend.clone());

    let outcome = scores.update_score(&signed_in("p1"), 10).await.unwrap();

    assert_eq!(outcome, ScoreUpdate::Kept { current: 10 });
    assert_eq!(backend.write_count(), 0);
}

#[tokio::test]
async fn test_update_score_lower_score_is_kept() {
    let backend = seeded(&[("p1", json!(10))]);
    let scores = score_store(backend.clone());

    let outcome = scores.update_score(&signed_in("p1"), 3).await.unwrap();

    assert_eq!(outcome, ScoreUpdate::Kept { current: 10 });
    assert_eq!(stored(&backend, "p1"), json!(10));
}

#[tokio::test]
async fn test_update_score_zero_on_empty_record_is_kept() {
    let backend = MemoryDocumentStore::new();
    let scores = score_store(backend.clone());

    let outcome = scores.update_score(&signed_in("p1"), 0).await.unwrap();

    assert_eq!(outcome, ScoreUpdate::Kept { current: 0 });
    assert_eq!(backend.write_count(), 0);
}

#[tokio::test]
async fn test_update_score_not_signed_in_touches_nothing() {
    let backend = seeded(&[("p1", json!(10))]);
    backend.fail_next(StoreCall::Get, "must not be called");
    let scores = score_store(backend.clone());

    let outcome = scores.update_score(&Session::signed_out(), 99).await.unwrap();

    assert_eq!(outcome, ScoreUpdate::NotSignedIn);
    assert_eq!(backend.write_count(), 0);
}

#[tokio::test]
async fn test_update_score_reads_numeric_string() {
    let backend = seeded(&[("p1", json!("15"))]);
    let scores = score_store(backend.clone());

    let outcome = scores.update_score(&signed_in("p1"), 20).await.unwrap();

    assert_eq!(outcome, ScoreUpdate::Raised { previous: 15, score: 20 });
}

#[tokio::test]
async fn test_update_score_invalid_stored_value() {
    let backend = seeded(&[("p1", json!("lots"))]);
    let scores = score_store(backend.clone());

    let result = scores.update_score(&signed_in("p1"), 20).await;

    match result {
        Err(StoreError::InvalidScore { path, raw }) => {
            assert_eq!(path.to_string(), "Puntos/p1/Puntaje");
            assert_eq!(raw, "\"lots\"");
        }
        other => panic!("expected InvalidScore, got {other:?}"),
    }
    assert_eq!(backend.write_count(), 0);
}

#[tokio::test]
async fn test_update_score_write_failure_propagates() {
    let backend = MemoryDocumentStore::new();
    backend.fail_next(StoreCall::Set, "permission denied");
    let scores = score_store(backend.clone());

    let result = scores.update_score(&signed_in("p1"), 5).await;

    assert!(matches!(result, Err(StoreError::NotCompleted(r)) if r == "permission denied"));
}

#[tokio::test]
async fn test_update_score_unusable_user_id() {
    let scores = score_store(MemoryDocumentStore::new());

    let result = scores.update_score(&signed_in("bad/id"), 5).await;

    assert!(matches!(result, Err(StoreError::Path(_))));
}

#[test]
fn test_new_rejects_unusable_collection() {
    let config = StoreConfig {
        collection: "Pun.tos".to_string(),
        ..StoreConfig::default()
    };

    let result = ScoreStore::new(MemoryDocumentStore::new(), config);

    assert!(matches!(result, Err(StoreError::Path(_))));
}

#[test]
fn test_new_rejects_empty_leaderboard() {
    let backend = seeded(&[("a", json!(1)), ("b", json!(2))]);
    let config = StoreConfig {
        leaderboard_size: 0,
        ..StoreConfig::default()
    };

    let result = ScoreStore::new(backend, config);

    assert!(matches!(result, Err(StoreError::InvalidConfig(_))));
}

// =========================================================================
// Concurrent writers
// =========================================================================

/// Holds every `get` until `parties` readers have arrived, so concurrent
/// updates all see the same stored score before any of them writes.
struct GatedStore {
    inner: MemoryDocumentStore,
    gate: Barrier,
}

impl DocumentStore for GatedStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Value>, StoreError> {
        let value = self.inner.get(path).await?;
        self.gate.wait().await;
        Ok(value)
    }

    async fn query(&self, path: &DocPath, query: &Query) -> Result<Vec<QueryEntry>, StoreError> {
        self.inner.query(path, query).await
    }

    async fn set(&self, path: &DocPath, value: Value) -> Result<(), StoreError> {
        self.inner.set(path, value).await
    }
}

#[tokio::test]
async fn test_concurrent_updates_from_two_clients_both_write() {
    // Two independent clients share a store but not a serializer. The
    // read and the write aren't atomic, so both see 0 and both write.
    // Which score survives depends only on which write lands last.
    let inner = MemoryDocumentStore::new();
    let shared = Arc::new(GatedStore {
        inner: inner.clone(),
        gate: Barrier::new(2),
    });
    let client_a = ScoreStore::new(Arc::clone(&shared), StoreConfig::default()).unwrap();
    let client_b = ScoreStore::new(Arc::clone(&shared), StoreConfig::default()).unwrap();
    let player = signed_in("p1");

    let (a, b) = tokio::join!(
        client_a.update_score(&player, 50),
        client_b.update_score(&player, 20),
    );

    assert_eq!(a.unwrap(), ScoreUpdate::Raised { previous: 0, score: 50 });
    assert_eq!(b.unwrap(), ScoreUpdate::Raised { previous: 0, score: 20 });
    assert_eq!(inner.write_count(), 2);
    let survivor = stored(&inner, "p1");
    assert!(survivor == json!(50) || survivor == json!(20));
}
