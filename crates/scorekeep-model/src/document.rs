//! Addressing and querying the hierarchical document store.
//!
//! The store is a tree of JSON values. A record is reached by walking a
//! path of keys from the root, e.g. `Puntos/<user_id>/Puntaje`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ModelError;

/// Characters the store reserves for its own path and query syntax.
const RESERVED: [char; 6] = ['/', '.', '#', '$', '[', ']'];

// ---------------------------------------------------------------------------
// DocPath
// ---------------------------------------------------------------------------

/// A validated path into the document store.
///
/// Paths are built one key at a time with [`DocPath::child`], so every
/// segment is checked when it is added and a `DocPath` in hand is always
/// well-formed.
///
/// ```rust
/// use scorekeep_model::DocPath;
///
/// let path = DocPath::root().child("Puntos")?.child("u-1")?;
/// assert_eq!(path.to_string(), "Puntos/u-1");
/// # Ok::<(), scorekeep_model::ModelError>(())
/// ```
///
/// Serializes as its slash-joined string, and deserializing goes through
/// [`DocPath::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocPath {
    segments: Vec<String>,
}

impl DocPath {
    /// The root of the store.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a slash-separated path. Leading and trailing slashes are
    /// ignored; empty segments in the middle are rejected.
    pub fn parse(path: &str) -> Result<Self, ModelError> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        trimmed
            .split('/')
            .try_fold(Self::root(), |acc, key| acc.child(key))
    }

    /// Returns a new path one level below this one.
    ///
    /// # Errors
    /// [`ModelError::EmptyKey`] or [`ModelError::InvalidKey`] if `key`
    /// can't be used as a store key.
    pub fn child(&self, key: &str) -> Result<Self, ModelError> {
        validate_key(key)?;
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Ok(Self { segments })
    }

    /// The keys that make up this path, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        f.write_str(&self.segments.join("/"))
    }
}

impl TryFrom<String> for DocPath {
    type Error = ModelError;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        Self::parse(&path)
    }
}

impl From<DocPath> for String {
    fn from(path: DocPath) -> Self {
        path.to_string()
    }
}

/// Checks that `key` is usable as a single path segment.
pub(crate) fn validate_key(key: &str) -> Result<(), ModelError> {
    if key.is_empty() {
        return Err(ModelError::EmptyKey);
    }
    if let Some(found) = key.chars().find(|c| RESERVED.contains(c)) {
        return Err(ModelError::InvalidKey {
            key: key.to_string(),
            found,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// An ordered, limited read of the children under a path.
///
/// Mirrors the store's `orderByChild(...).limitToLast(n)` query: children
/// are sorted ascending by the named field and only the last `n` are
/// returned, so the result holds the `n` largest values, smallest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// The field inside each child to sort by.
    pub order_by_child: String,
    /// How many children to keep from the end of the sorted list.
    pub limit_to_last: usize,
}

impl Query {
    /// Starts a query ordered by `field`, with no effective limit.
    pub fn order_by_child(field: impl Into<String>) -> Self {
        Self {
            order_by_child: field.into(),
            limit_to_last: usize::MAX,
        }
    }

    /// Keeps only the last `n` children of the ordered result.
    pub fn limit_to_last(mut self, n: usize) -> Self {
        self.limit_to_last = n;
        self
    }
}

/// One child returned by a [`Query`], in query order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEntry {
    /// The child's key under the queried path (e.g. a user id).
    pub key: String,
    /// The child's full value.
    pub value: Value,
}
