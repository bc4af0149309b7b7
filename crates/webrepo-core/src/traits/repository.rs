//! Generic repository traits for remote collection access.

use std::fmt::{Debug, Display};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::result::ClientResult;
use crate::types::pagination::Page;

/// Generic CRUD and paging repository contract over a remote collection.
///
/// This trait is defined with two independent generic type parameters so
/// that each entity can have a strongly typed repository over any key
/// type. Every operation accepts a caller-supplied cancellation token that
/// aborts the in-flight request at the first checked suspension point.
///
/// A not-found answer from the remote is a domain outcome, not an error,
/// for existence checks (`false`), paging past the end (an empty
/// [`Page`]), and deletions (`None`). Retrieval by id is intentionally
/// strict: a missing entity surfaces as a remote-failure error.
#[async_trait]
pub trait EntityRepository<T, K>: Send + Sync
where
    T: Serialize + DeserializeOwned + Debug + Send + Sync + 'static,
    K: Display + Send + Sync + 'static,
{
    /// Check whether an entity with the given key exists remotely.
    async fn exists_by_id(&self, id: &K, cancel: &CancellationToken) -> ClientResult<bool>;

    /// Check whether the given entity exists remotely, matched by value.
    async fn exists(&self, item: &T, cancel: &CancellationToken) -> ClientResult<bool>;

    /// Count total entities in the remote collection.
    async fn count(&self, cancel: &CancellationToken) -> ClientResult<u64>;

    /// Fetch the full collection.
    async fn get_all(&self, cancel: &CancellationToken) -> ClientResult<Vec<T>>;

    /// Fetch a bounded slice of the collection. The remote interprets the
    /// slice semantics; no client-side clamping is applied.
    async fn get_range(
        &self,
        skip: u64,
        count: u64,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<T>>;

    /// Fetch one page of the collection. Paging past the end yields an
    /// empty page, not an error.
    async fn get_page(
        &self,
        page_index: u64,
        page_size: u64,
        cancel: &CancellationToken,
    ) -> ClientResult<Page<T>>;

    /// Fetch an entity by its key. A missing entity is an error.
    async fn get_by_id(&self, id: &K, cancel: &CancellationToken) -> ClientResult<T>;

    /// Create an entity and return the remote's echo, which may carry a
    /// server-assigned key.
    async fn add(&self, item: &T, cancel: &CancellationToken) -> ClientResult<T>;

    /// Update an entity and return the remote's echo.
    async fn update(&self, item: &T, cancel: &CancellationToken) -> ClientResult<T>;

    /// Delete an entity matched by value. Returns `None` if it was already
    /// absent.
    async fn delete(&self, item: &T, cancel: &CancellationToken) -> ClientResult<Option<T>>;

    /// Delete an entity by its key. Returns `None` if it was already
    /// absent.
    async fn delete_by_id(&self, id: &K, cancel: &CancellationToken)
    -> ClientResult<Option<T>>;
}

/// Repository contract for entities that also expose a unique
/// human-readable name as an alternate lookup and deletion key.
///
/// The per-operation not-found policy mirrors the key-addressed
/// operations: existence degrades to `false`, deletion to `None`, and
/// retrieval by name stays strict.
#[async_trait]
pub trait NamedEntityRepository<T, K>: EntityRepository<T, K>
where
    T: Serialize + DeserializeOwned + Debug + Send + Sync + 'static,
    K: Display + Send + Sync + 'static,
{
    /// Check whether an entity with the given name exists remotely.
    async fn exists_by_name(&self, name: &str, cancel: &CancellationToken)
    -> ClientResult<bool>;

    /// Fetch an entity by its name. A missing entity is an error.
    async fn get_by_name(&self, name: &str, cancel: &CancellationToken) -> ClientResult<T>;

    /// Delete an entity by its name. Returns `None` if it was already
    /// absent.
    async fn delete_by_name(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<Option<T>>;
}
