//! Name-addressed repository composed over the key-addressed one.

use std::fmt::{Debug, Display};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use webrepo_core::config::EndpointConfig;
use webrepo_core::result::ClientResult;
use webrepo_core::traits::observer::Observer;
use webrepo_core::traits::repository::{EntityRepository, NamedEntityRepository};
use webrepo_core::types::pagination::Page;

use crate::repository::WebRepository;

/// Repository for entities that also expose a unique human-readable name.
///
/// Composes a [`WebRepository`] rather than extending it: all key-addressed
/// operations delegate to the contained repository, and the name-addressed
/// ones share its request helpers and not-found policy.
pub struct WebNamedRepository<T, K = i64> {
    inner: WebRepository<T, K>,
}

impl<T, K> Clone for WebNamedRepository<T, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, K> WebNamedRepository<T, K> {
    /// Create a repository over `base_url` using the given HTTP client.
    pub fn new(http: Client, base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            inner: WebRepository::new(http, base_url)?,
        })
    }

    /// Create a repository from endpoint settings.
    pub fn from_config(config: &EndpointConfig) -> ClientResult<Self> {
        Ok(Self {
            inner: WebRepository::from_config(config)?,
        })
    }

    /// Replace the observer the repository reports events to.
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.inner = self.inner.with_observer(observer);
        self
    }
}

#[async_trait]
impl<T, K> EntityRepository<T, K> for WebNamedRepository<T, K>
where
    T: Serialize + DeserializeOwned + Debug + Send + Sync + 'static,
    K: Display + Send + Sync + 'static,
{
    async fn exists_by_id(&self, id: &K, cancel: &CancellationToken) -> ClientResult<bool> {
        self.inner.exists_by_id(id, cancel).await
    }

    async fn exists(&self, item: &T, cancel: &CancellationToken) -> ClientResult<bool> {
        self.inner.exists(item, cancel).await
    }

    async fn count(&self, cancel: &CancellationToken) -> ClientResult<u64> {
        self.inner.count(cancel).await
    }

    async fn get_all(&self, cancel: &CancellationToken) -> ClientResult<Vec<T>> {
        self.inner.get_all(cancel).await
    }

    async fn get_range(
        &self,
        skip: u64,
        count: u64,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<T>> {
        self.inner.get_range(skip, count, cancel).await
    }

    async fn get_page(
        &self,
        page_index: u64,
        page_size: u64,
        cancel: &CancellationToken,
    ) -> ClientResult<Page<T>> {
        self.inner.get_page(page_index, page_size, cancel).await
    }

    async fn get_by_id(&self, id: &K, cancel: &CancellationToken) -> ClientResult<T> {
        self.inner.get_by_id(id, cancel).await
    }

    async fn add(&self, item: &T, cancel: &CancellationToken) -> ClientResult<T> {
        self.inner.add(item, cancel).await
    }

    async fn update(&self, item: &T, cancel: &CancellationToken) -> ClientResult<T> {
        self.inner.update(item, cancel).await
    }

    async fn delete(&self, item: &T, cancel: &CancellationToken) -> ClientResult<Option<T>> {
        self.inner.delete(item, cancel).await
    }

    async fn delete_by_id(
        &self,
        id: &K,
        cancel: &CancellationToken,
    ) -> ClientResult<Option<T>> {
        self.inner.delete_by_id(id, cancel).await
    }
}

#[async_trait]
impl<T, K> NamedEntityRepository<T, K> for WebNamedRepository<T, K>
where
    T: Serialize + DeserializeOwned + Debug + Send + Sync + 'static,
    K: Display + Send + Sync + 'static,
{
    async fn exists_by_name(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<bool> {
        self.inner.probe_get(&format!("exist/name/{name}"), cancel).await
    }

    async fn get_by_name(&self, name: &str, cancel: &CancellationToken) -> ClientResult<T> {
        self.inner.get_json(&format!("name/{name}"), cancel).await
    }

    async fn delete_by_name(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<Option<T>> {
        self.inner
            .delete_at(&format!("name/{name}"), None, &format!("name:{name}"), cancel)
            .await
    }
}
