//! HTTP-backed entity repository.

use std::fmt::{Debug, Display};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use webrepo_core::config::EndpointConfig;
use webrepo_core::error::{ClientError, ErrorKind};
use webrepo_core::result::ClientResult;
use webrepo_core::traits::observer::Observer;
use webrepo_core::traits::repository::EntityRepository;
use webrepo_core::types::pagination::Page;

use crate::http::{build_http_client, normalize_base_url};
use crate::observer::TracingObserver;

/// Repository over one remote collection, addressed by entity key.
///
/// A stateless facade bound at construction to a connection-reusing
/// [`Client`], a base endpoint, and an observer. It owns no mutable state
/// beyond these references, caches nothing across calls, and is cheap to
/// clone and safe to share between any number of concurrent callers. The
/// key type defaults to `i64`.
pub struct WebRepository<T, K = i64> {
    http: Client,
    base: Url,
    observer: Arc<dyn Observer>,
    _entity: PhantomData<fn() -> (T, K)>,
}

impl<T, K> Clone for WebRepository<T, K> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base: self.base.clone(),
            observer: Arc::clone(&self.observer),
            _entity: PhantomData,
        }
    }
}

impl<T, K> std::fmt::Debug for WebRepository<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebRepository")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl<T, K> WebRepository<T, K> {
    /// Create a repository over `base_url` using the given HTTP client and
    /// the default [`TracingObserver`].
    pub fn new(http: Client, base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            http,
            base: normalize_base_url(base_url)?,
            observer: Arc::new(TracingObserver),
            _entity: PhantomData,
        })
    }

    /// Create a repository from endpoint settings, building the HTTP
    /// client from them.
    pub fn from_config(config: &EndpointConfig) -> ClientResult<Self> {
        Ok(Self {
            http: build_http_client(config)?,
            base: normalize_base_url(&config.base_url)?,
            observer: Arc::new(TracingObserver),
            _entity: PhantomData,
        })
    }

    /// Replace the observer the repository reports events to.
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        self.base.join(path).map_err(|e| {
            ClientError::with_source(
                ErrorKind::Configuration,
                format!("invalid request path '{path}'"),
                e,
            )
        })
    }
}

impl<T, K> WebRepository<T, K>
where
    T: Serialize + DeserializeOwned + Debug + Send + Sync + 'static,
    K: Display + Send + Sync + 'static,
{
    async fn send(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> ClientResult<Response> {
        race(cancel, async {
            request.send().await.map_err(|e| {
                ClientError::with_source(ErrorKind::Transport, "failed to send request", e)
            })
        })
        .await
    }

    async fn read_json<O: DeserializeOwned>(
        response: Response,
        cancel: &CancellationToken,
    ) -> ClientResult<O> {
        race(cancel, async {
            response.json::<O>().await.map_err(|e| {
                ClientError::with_source(ErrorKind::Decode, "failed to decode response body", e)
            })
        })
        .await
    }

    /// GET a JSON value from a relative path, escalating any non-success
    /// status.
    pub(crate) async fn get_json<O: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<O> {
        let url = self.url(path)?;
        let response = self.send(self.http.get(url), cancel).await?;
        let response = ensure_success(response)?;
        Self::read_json(response, cancel).await
    }

    /// GET an existence probe at a relative path.
    pub(crate) async fn probe_get(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<bool> {
        let url = self.url(path)?;
        self.probe(self.http.get(url), cancel).await
    }

    /// Existence probe: true only on a successful, non-not-found status.
    /// Other failure statuses degrade to `false`; send-level failures
    /// still surface as transport errors.
    async fn probe(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> ClientResult<bool> {
        let response = self.send(request, cancel).await?;
        let status = response.status();
        Ok(status != StatusCode::NOT_FOUND && status.is_success())
    }

    /// DELETE at a relative path, tolerating not-found as `None`.
    pub(crate) async fn delete_at(
        &self,
        path: &str,
        body: Option<&T>,
        subject: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<Option<T>> {
        self.observer.info(&format!("delete {subject}"));
        let url = self.url(path)?;
        let mut request = self.http.delete(url);
        if let Some(item) = body {
            request = request.json(item);
        }
        let response = self.send(request, cancel).await?;
        if response.status() == StatusCode::NOT_FOUND {
            self.observer.info(&format!("delete {subject} - item not exist"));
            return Ok(None);
        }
        let response = self.escalate(response, "delete")?;
        let result: T = Self::read_json(response, cancel).await?;
        self.observer
            .info(&format!("delete {subject} complete, received {result:?}"));
        Ok(Some(result))
    }

    /// Submit an entity body and decode the remote's echo, requiring a
    /// success status.
    async fn send_entity(
        &self,
        request: RequestBuilder,
        item: &T,
        verb: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<T> {
        self.observer.info(&format!("{verb} {item:?}"));
        let response = self.send(request.json(item), cancel).await?;
        let response = self.escalate(response, verb)?;
        let result: T = Self::read_json(response, cancel).await?;
        self.observer
            .info(&format!("{verb} {item:?} complete, received {result:?}"));
        Ok(result)
    }

    fn escalate(&self, response: Response, context: &str) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            self.observer
                .warn(&format!("{context} failed with status {status}"));
            Err(remote_error(status))
        }
    }
}

#[async_trait]
impl<T, K> EntityRepository<T, K> for WebRepository<T, K>
where
    T: Serialize + DeserializeOwned + Debug + Send + Sync + 'static,
    K: Display + Send + Sync + 'static,
{
    async fn exists_by_id(&self, id: &K, cancel: &CancellationToken) -> ClientResult<bool> {
        self.probe_get(&format!("exist/id/{id}"), cancel).await
    }

    async fn exists(&self, item: &T, cancel: &CancellationToken) -> ClientResult<bool> {
        let url = self.url("exist")?;
        self.probe(self.http.post(url).json(item), cancel).await
    }

    async fn count(&self, cancel: &CancellationToken) -> ClientResult<u64> {
        self.get_json("count", cancel).await
    }

    async fn get_all(&self, cancel: &CancellationToken) -> ClientResult<Vec<T>> {
        self.get_json("", cancel).await
    }

    async fn get_range(
        &self,
        skip: u64,
        count: u64,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<T>> {
        self.get_json(&format!("items[{skip}:{count}]"), cancel).await
    }

    async fn get_page(
        &self,
        page_index: u64,
        page_size: u64,
        cancel: &CancellationToken,
    ) -> ClientResult<Page<T>> {
        let url = self.url(&format!("page[{page_index}/{page_size}]"))?;
        // Decide from the status line before reading the body.
        let response = self.send(self.http.get(url), cancel).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Page::empty(page_index, page_size));
        }
        let response = ensure_success(response)?;
        Self::read_json(response, cancel).await
    }

    async fn get_by_id(&self, id: &K, cancel: &CancellationToken) -> ClientResult<T> {
        self.get_json(&id.to_string(), cancel).await
    }

    async fn add(&self, item: &T, cancel: &CancellationToken) -> ClientResult<T> {
        let url = self.url("")?;
        self.send_entity(self.http.post(url), item, "add", cancel).await
    }

    async fn update(&self, item: &T, cancel: &CancellationToken) -> ClientResult<T> {
        let url = self.url("")?;
        self.send_entity(self.http.put(url), item, "update", cancel).await
    }

    async fn delete(&self, item: &T, cancel: &CancellationToken) -> ClientResult<Option<T>> {
        self.delete_at("", Some(item), &format!("{item:?}"), cancel).await
    }

    async fn delete_by_id(
        &self,
        id: &K,
        cancel: &CancellationToken,
    ) -> ClientResult<Option<T>> {
        self.delete_at(&id.to_string(), None, &format!("id:{id}"), cancel).await
    }
}

fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(remote_error(status))
    }
}

fn remote_error(status: StatusCode) -> ClientError {
    ClientError::remote(status.as_u16(), format!("unexpected HTTP status {status}"))
}

/// Race a request step against the caller's cancellation signal. The
/// in-flight response is released by drop on the cancelled path.
async fn race<F, O>(cancel: &CancellationToken, fut: F) -> ClientResult<O>
where
    F: Future<Output = ClientResult<O>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClientError::cancelled()),
        out = fut => out,
    }
}
