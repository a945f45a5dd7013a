//! An in-process document store for development, demos and tests.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use scorekeep_model::{DocPath, Query, QueryEntry};
use serde_json::{Map, Value};

use crate::{DocumentStore, StoreError};

/// Names the store calls that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCall {
    Get,
    Query,
    Set,
}

#[derive(Default)]
struct Tree {
    root: Value,
    writes: usize,
    faults: HashMap<StoreCall, String>,
}

/// A JSON tree held in memory, with the store's query ordering.
///
/// Clones share the same tree.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    tree: Arc<Mutex<Tree>>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose whole tree is `root`.
    pub fn with_root(root: Value) -> Self {
        let store = Self::new();
        store.lock().root = root;
        store
    }

    /// A copy of the whole tree.
    pub fn snapshot(&self) -> Value {
        self.lock().root.clone()
    }

    /// How many `set` calls have succeeded.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Makes the next `call` fail with [`StoreError::NotCompleted`].
    pub fn fail_next(&self, call: StoreCall, reason: impl Into<String>) {
        self.lock().faults.insert(call, reason.into());
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        self.tree
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Value>, StoreError> {
        let mut tree = self.lock();
        take_fault(&mut tree, StoreCall::Get)?;
        Ok(node(&tree.root, path)
            .filter(|value| !value.is_null())
            .cloned())
    }

    async fn query(
        &self,
        path: &DocPath,
        query: &Query,
    ) -> Result<Vec<QueryEntry>, StoreError> {
        let mut tree = self.lock();
        take_fault(&mut tree, StoreCall::Query)?;

        let Some(Value::Object(children)) = node(&tree.root, path) else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<(&String, &Value)> = children.iter().collect();
        entries.sort_by(|(ka, va), (kb, vb)| {
            let a = SortKey::of(va.get(&query.order_by_child));
            let b = SortKey::of(vb.get(&query.order_by_child));
            a.compare(&b).then_with(|| ka.cmp(kb))
        });

        let skip = entries.len().saturating_sub(query.limit_to_last);
        Ok(entries
            .into_iter()
            .skip(skip)
            .map(|(key, value)| QueryEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    async fn set(&self, path: &DocPath, value: Value) -> Result<(), StoreError> {
        let mut tree = self.lock();
        take_fault(&mut tree, StoreCall::Set)?;
        set_at(&mut tree.root, path.segments(), value);
        tree.writes += 1;
        Ok(())
    }
}

fn take_fault(tree: &mut Tree, call: StoreCall) -> Result<(), StoreError> {
    match tree.faults.remove(&call) {
        Some(reason) => Err(StoreError::NotCompleted(reason)),
        None => Ok(()),
    }
}

fn node<'a>(root: &'a Value, path: &DocPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, key| node.get(key.as_str()))
}

/// Writes `value` at `segments` below `node`. Writing `null` removes the
/// key, matching the hosted store.
fn set_at(node: &mut Value, segments: &[String], value: Value) {
    let Some((key, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        if rest.is_empty() && value.is_null() {
            map.remove(key);
            return;
        }
        let child = map.entry(key.clone()).or_insert(Value::Null);
        set_at(child, rest, value);
    }
}

/// Ordering of child values: missing/null, then booleans (false first),
/// then numbers ascending, then strings, then objects and arrays.
enum SortKey<'a> {
    Null,
    Bool(bool),
    Number(f64),
    Text(&'a str),
    Nested,
}

impl<'a> SortKey<'a> {
    fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Null,
            Some(Value::Bool(b)) => Self::Bool(*b),
            Some(Value::Number(n)) => Self::Number(n.as_f64().unwrap_or(0.0)),
            Some(Value::String(s)) => Self::Text(s),
            Some(Value::Array(_) | Value::Object(_)) => Self::Nested,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Number(_) => 2,
            Self::Text(_) => 3,
            Self::Nested => 4,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn path(p: &str) -> DocPath {
        DocPath::parse(p).unwrap()
    }

    #[tokio::test]
    async fn test_set_then_get_creates_parents() {
        let store = MemoryDocumentStore::new();

        store.set(&path("Puntos/u1/Puntaje"), json!(12)).await.unwrap();

        assert_eq!(store.get(&path("Puntos/u1/Puntaje")).await.unwrap(), Some(json!(12)));
        assert_eq!(store.snapshot(), json!({ "Puntos": { "u1": { "Puntaje": 12 } } }));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_path_is_none() {
        let store = MemoryDocumentStore::new();

        assert_eq!(store.get(&path("nope/here")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_null_removes_key() {
        let store = MemoryDocumentStore::with_root(json!({ "a": { "b": 1, "c": 2 } }));

        store.set(&path("a/b"), Value::Null).await.unwrap();

        assert_eq!(store.snapshot(), json!({ "a": { "c": 2 } }));
    }

    #[tokio::test]
    async fn test_query_orders_by_child_and_limits_to_last() {
        let store = MemoryDocumentStore::with_root(json!({
            "Puntos": {
                "a": { "Puntaje": 5 },
                "b": { "Puntaje": 12 },
                "c": { "Puntaje": 7 },
                "d": { "Puntaje": 30 },
                "e": { "Puntaje": 1 },
            }
        }));
        let query = Query::order_by_child("Puntaje").limit_to_last(3);

        let entries = store.query(&path("Puntos"), &query).await.unwrap();

        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "b", "d"]);
    }

    #[tokio::test]
    async fn test_query_missing_field_sorts_first() {
        let store = MemoryDocumentStore::with_root(json!({
            "x": { "a": { "s": 1 }, "b": {}, "c": { "s": "text" } }
        }));

        let entries = store
            .query(&path("x"), &Query::order_by_child("s"))
            .await
            .unwrap();

        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_query_on_leaf_is_empty() {
        let store = MemoryDocumentStore::with_root(json!({ "x": 3 }));

        let entries = store
            .query(&path("x"), &Query::order_by_child("s"))
            .await
            .unwrap();

        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_fail_next_returns_not_completed_once() {
        let store = MemoryDocumentStore::new();
        store.fail_next(StoreCall::Set, "offline");

        let first = store.set(&path("a"), json!(1)).await;
        let second = store.set(&path("a"), json!(1)).await;

        assert!(matches!(first, Err(StoreError::NotCompleted(r)) if r == "offline"));
        assert!(second.is_ok());
        assert_eq!(store.write_count(), 1);
    }
}
