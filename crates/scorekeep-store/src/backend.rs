//! The document store seam.

use std::future::Future;
use std::sync::Arc;

use scorekeep_model::{DocPath, Query, QueryEntry};
use serde_json::Value;

use crate::StoreError;

/// Capability interface to an external hierarchical JSON store.
///
/// Paths address nodes in one big JSON tree. A path with no data reads
/// as `None`. Failures to reach the store surface as
/// [`StoreError::NotCompleted`].
pub trait DocumentStore: Send + Sync + 'static {
    /// Reads the value at `path`.
    fn get(
        &self,
        path: &DocPath,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Reads the children of `path`, sorted ascending by
    /// `query.order_by_child` and truncated to the last
    /// `query.limit_to_last` entries.
    ///
    /// Children missing the ordering field sort before all others. An
    /// empty `Vec` means the path holds no children.
    fn query(
        &self,
        path: &DocPath,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<QueryEntry>, StoreError>> + Send;

    /// Overwrites the value at `path`, creating parents as needed.
    fn set(
        &self,
        path: &DocPath,
        value: Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<T: DocumentStore> DocumentStore for Arc<T> {
    fn get(
        &self,
        path: &DocPath,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send {
        (**self).get(path)
    }

    fn query(
        &self,
        path: &DocPath,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<QueryEntry>, StoreError>> + Send {
        (**self).query(path, query)
    }

    fn set(
        &self,
        path: &DocPath,
        value: Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).set(path, value)
    }
}
