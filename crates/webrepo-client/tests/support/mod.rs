//! Shared test helpers: an in-process REST server implementing the
//! collection convention over an in-memory store, plus a recording
//! observer.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use webrepo_core::traits::observer::Observer;

/// Entity used by the integration tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub grade: u32,
}

/// Id the server answers with a 500 on existence probes.
pub const FAILING_ID: i64 = 666;
/// Id the server parks for 30 seconds before answering.
pub const SLOW_ID: i64 = 999;

/// Shared in-memory store backing the test server.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    items: BTreeMap<i64, Employee>,
    next_id: i64,
}

impl Store {
    /// Store seeded with employees `emp-1 ..= emp-n`, ids `1..=n`.
    pub fn seeded(n: i64) -> Self {
        let store = Self::default();
        {
            let mut inner = store.inner.lock().unwrap();
            for i in 1..=n {
                inner.items.insert(
                    i,
                    Employee {
                        id: i,
                        name: format!("emp-{i}"),
                        grade: (i % 5) as u32,
                    },
                );
            }
            inner.next_id = n;
        }
        store
    }

    pub fn get(&self, id: i64) -> Option<Employee> {
        self.inner.lock().unwrap().items.get(&id).cloned()
    }

    pub fn find_by_name(&self, name: &str) -> Option<Employee> {
        let inner = self.inner.lock().unwrap();
        inner.items.values().find(|e| e.name == name).cloned()
    }

    pub fn all(&self) -> Vec<Employee> {
        self.inner.lock().unwrap().items.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    fn put(&self, employee: Employee) {
        self.inner.lock().unwrap().items.insert(employee.id, employee);
    }

    fn remove(&self, id: i64) -> Option<Employee> {
        self.inner.lock().unwrap().items.remove(&id)
    }

    fn remove_by_name(&self, name: &str) -> Option<Employee> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.items.values().find(|e| e.name == name).map(|e| e.id)?;
        inner.items.remove(&id)
    }

    fn assign_id(&self) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        inner.next_id
    }
}

/// Bind to port 0, serve the convention, return the base URL.
pub async fn start_server(store: Store) -> String {
    let app = Router::new().fallback(handle).with_state(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

async fn handle(State(store): State<Store>, req: Request) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().trim_start_matches('/').to_string();
    let bytes = to_bytes(req.into_body(), 1 << 20).await.unwrap_or_default();

    match method {
        Method::GET => handle_get(&store, &path).await,
        Method::POST => handle_post(&store, &path, &bytes),
        Method::PUT => handle_put(&store, &path, &bytes),
        Method::DELETE => handle_delete(&store, &path, &bytes),
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn handle_get(store: &Store, path: &str) -> Response {
    if path.is_empty() {
        return Json(store.all()).into_response();
    }
    if path == "count" {
        return Json(store.len()).into_response();
    }
    if let Some(raw) = path.strip_prefix("exist/id/") {
        return match raw.parse::<i64>() {
            Ok(FAILING_ID) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            Ok(id) if store.get(id).is_some() => StatusCode::OK.into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        };
    }
    if let Some(name) = path.strip_prefix("exist/name/") {
        return if store.find_by_name(name).is_some() {
            StatusCode::OK.into_response()
        } else {
            StatusCode::NOT_FOUND.into_response()
        };
    }
    if let Some(name) = path.strip_prefix("name/") {
        return match store.find_by_name(name) {
            Some(e) => Json(e).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        };
    }
    if let Some((skip, count)) = parse_range(path) {
        let items: Vec<Employee> = store.all().into_iter().skip(skip).take(count).collect();
        return Json(items).into_response();
    }
    if let Some((page, size)) = parse_page(path) {
        return page_response(store, page, size);
    }
    match path.parse::<i64>() {
        Ok(SLOW_ID) => {
            // Keeps the request in flight so a cancellation can fire first.
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::NOT_FOUND.into_response()
        }
        Ok(id) => match store.get(id) {
            Some(e) => Json(e).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

fn handle_post(store: &Store, path: &str, bytes: &[u8]) -> Response {
    match path {
        "exist" => match serde_json::from_slice::<Employee>(bytes) {
            Ok(e) if store.get(e.id).is_some() => StatusCode::OK.into_response(),
            Ok(_) => StatusCode::NOT_FOUND.into_response(),
            Err(_) => StatusCode::BAD_REQUEST.into_response(),
        },
        "" => match serde_json::from_slice::<Employee>(bytes) {
            Ok(mut e) => {
                if e.id == 0 {
                    e.id = store.assign_id();
                }
                store.put(e.clone());
                Json(e).into_response()
            }
            Err(_) => StatusCode::BAD_REQUEST.into_response(),
        },
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn handle_put(store: &Store, path: &str, bytes: &[u8]) -> Response {
    if !path.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }
    match serde_json::from_slice::<Employee>(bytes) {
        Ok(e) if store.get(e.id).is_some() => {
            store.put(e.clone());
            Json(e).into_response()
        }
        Ok(_) => StatusCode::NOT_FOUND.into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

fn handle_delete(store: &Store, path: &str, bytes: &[u8]) -> Response {
    if path.is_empty() {
        return match serde_json::from_slice::<Employee>(bytes) {
            Ok(e) => match store.remove(e.id) {
                Some(removed) => Json(removed).into_response(),
                None => StatusCode::NOT_FOUND.into_response(),
            },
            Err(_) => StatusCode::BAD_REQUEST.into_response(),
        };
    }
    if let Some(name) = path.strip_prefix("name/") {
        return match store.remove_by_name(name) {
            Some(removed) => Json(removed).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        };
    }
    match path.parse::<i64>() {
        Ok(id) => match store.remove(id) {
            Some(removed) => Json(removed).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

fn page_response(store: &Store, page: u64, size: u64) -> Response {
    let all = store.all();
    let total = all.len() as u64;
    let offset = page.saturating_mul(size);
    if size == 0 || offset >= total {
        return StatusCode::NOT_FOUND.into_response();
    }
    let items: Vec<Employee> = all
        .into_iter()
        .skip(offset as usize)
        .take(size as usize)
        .collect();
    let items_count = items.len();
    Json(json!({
        "items": items,
        "itemsCount": items_count,
        "totalCount": total,
        "pageIndex": page,
        "pageSize": size,
        // Deliberately wrong; the client must recompute it.
        "totalPagesCount": 9999,
    }))
    .into_response()
}

fn parse_range(path: &str) -> Option<(usize, usize)> {
    let inner = path.strip_prefix("items[")?.strip_suffix(']')?;
    let (skip, count) = inner.split_once(':')?;
    Some((skip.parse().ok()?, count.parse().ok()?))
}

fn parse_page(path: &str) -> Option<(u64, u64)> {
    let inner = path.strip_prefix("page[")?.strip_suffix(']')?;
    let (page, size) = inner.split_once('/')?;
    Some((page.parse().ok()?, size.parse().ok()?))
}

/// Observer that records every event for later assertions.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingObserver {
    pub fn contains(&self, needle: &str) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .any(|(_, m)| m.contains(needle))
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == "warn")
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn info(&self, message: &str) {
        self.events.lock().unwrap().push(("info", message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.events.lock().unwrap().push(("warn", message.to_string()));
    }
}
