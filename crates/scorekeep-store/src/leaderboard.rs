//! The leaderboard projection and score decoding.
//!
//! A leaderboard is never stored. It is recomputed from a store query on
//! every request: the query returns the highest records smallest-first,
//! and [`LeaderboardView`] keeps that order exactly.

use std::fmt;

use scorekeep_model::QueryEntry;
use serde_json::Value;

/// The top-N scores, in the order the store returned them (ascending).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardView {
    scores: Vec<u64>,
}

impl LeaderboardView {
    /// Builds a view from query results, reading `score_field` from each
    /// entry.
    ///
    /// Entries without a readable score are skipped (and logged); the
    /// rest keep their relative order.
    pub fn from_entries(entries: &[QueryEntry], score_field: &str) -> Self {
        let scores = entries
            .iter()
            .filter_map(|entry| {
                let score = entry.value.get(score_field).and_then(read_score);
                if score.is_none() {
                    tracing::warn!(
                        key = %entry.key,
                        field = score_field,
                        "leaderboard entry has no readable score; skipped"
                    );
                }
                score
            })
            .collect();
        Self { scores }
    }

    /// The scores, smallest first.
    pub fn scores(&self) -> &[u64] {
        &self.scores
    }

    /// How many scores made the board.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns `true` when no entry had a readable score.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Renders as the label text: scores joined by `", "`.
impl fmt::Display for LeaderboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, score) in self.scores.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{score}")?;
        }
        Ok(())
    }
}

/// Reads a stored score.
///
/// Accepts a non-negative integer, an integral float (`12.0`), or a
/// string holding a non-negative integer (`"12"`), since older clients
/// wrote scores as text. Anything else is `None`.
pub fn read_score(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pulls scores out of a raw JSON dump by text search.
///
/// For data exported in the legacy layout, where every record serializes
/// as `{"<score_field>":<n>}` and the field name's casing is exact.
/// Splits on `"<score_field>":`, drops the text before the first match,
/// and parses each fragment up to the next `}` or `,`. Fragments that
/// don't parse are skipped. Prefer [`LeaderboardView::from_entries`] for
/// anything that came from a query.
pub fn extract_scores_from_raw(raw: &str, score_field: &str) -> Vec<u64> {
    let marker = format!("\"{score_field}\":");
    raw.split(marker.as_str())
        .skip(1)
        .filter_map(|fragment| {
            let leading = fragment
                .split(['}', ','])
                .find(|part| !part.is_empty())?;
            match leading.trim().parse() {
                Ok(score) => Some(score),
                Err(_) => {
                    tracing::warn!(fragment = leading, "unparseable score fragment");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entry(key: &str, value: Value) -> QueryEntry {
        QueryEntry {
            key: key.to_string(),
            value,
        }
    }

    #[test]
    fn test_from_entries_preserves_store_order() {
        let entries = vec![
            entry("c", json!({ "Puntaje": 7 })),
            entry("a", json!({ "Puntaje": 12 })),
            entry("b", json!({ "Puntaje": 30 })),
        ];

        let view = LeaderboardView::from_entries(&entries, "Puntaje");

        assert_eq!(view.scores(), &[7, 12, 30]);
        assert_eq!(view.to_string(), "7, 12, 30");
    }

    #[test]
    fn test_from_entries_skips_unreadable_scores() {
        let entries = vec![
            entry("a", json!({ "Puntaje": 5 })),
            entry("b", json!({ "puntaje": 9 })),
            entry("c", json!({ "Puntaje": "x" })),
            entry("d", json!({ "Puntaje": 11 })),
        ];

        let view = LeaderboardView::from_entries(&entries, "Puntaje");

        assert_eq!(view.scores(), &[5, 11]);
    }

    #[test]
    fn test_display_empty_view_is_empty_string() {
        assert_eq!(LeaderboardView::default().to_string(), "");
    }

    #[test]
    fn test_display_single_score_has_no_separator() {
        let view = LeaderboardView { scores: vec![42] };
        assert_eq!(view.to_string(), "42");
    }

    #[test]
    fn test_read_score_accepts_numbers_and_numeric_strings() {
        assert_eq!(read_score(&json!(30)), Some(30));
        assert_eq!(read_score(&json!(12.0)), Some(12));
        assert_eq!(read_score(&json!(" 8 ")), Some(8));
    }

    #[test]
    fn test_read_score_rejects_negative_fractional_and_other() {
        assert_eq!(read_score(&json!(-1)), None);
        assert_eq!(read_score(&json!(1.5)), None);
        assert_eq!(read_score(&json!("abc")), None);
        assert_eq!(read_score(&json!(null)), None);
        assert_eq!(read_score(&json!({ "Puntaje": 1 })), None);
    }

    #[test]
    fn test_read_score_rejects_floats_past_u64_range() {
        assert_eq!(read_score(&json!(18446744073709551616.0)), None);
        assert_eq!(read_score(&json!(1e30)), None);
    }

    #[test]
    fn test_extract_scores_from_raw_legacy_layout() {
        let raw = r#"{"u1":{"Puntaje":7},"u2":{"Puntaje":12},"u3":{"Puntaje":30}}"#;

        assert_eq!(extract_scores_from_raw(raw, "Puntaje"), vec![7, 12, 30]);
    }

    #[test]
    fn test_extract_scores_from_raw_with_trailing_fields() {
        let raw = r#"{"u1":{"Puntaje":4,"name":"ana"}}"#;

        assert_eq!(extract_scores_from_raw(raw, "Puntaje"), vec![4]);
    }

    #[test]
    fn test_extract_scores_from_raw_casing_mismatch_finds_nothing() {
        // The text search is case-sensitive, unlike a structured read
        // with the right field name.
        let raw = r#"{"u1":{"puntaje":7}}"#;

        assert!(extract_scores_from_raw(raw, "Puntaje").is_empty());
    }

    #[test]
    fn test_extract_scores_from_raw_skips_garbage_fragments() {
        let raw = r#"{"a":{"Puntaje":"oops"},"b":{"Puntaje":3}}"#;

        assert_eq!(extract_scores_from_raw(raw, "Puntaje"), vec![3]);
    }
}
