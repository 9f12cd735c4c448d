//! In-process mock backends for tests.
//!
//! Each mock is a real axum server on `127.0.0.1:0` that speaks the backend
//! `/fetch`, `/query` and `/set` contract and records every request it sees.

use crate::cluster::types::Backend;
use crate::fanout::protocol::{Encoded, FetchItem, QueryItem, SetRequest, SetResponse};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode, header::CONTENT_TYPE};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Keys whose data starts with this prefix are reported in `keys_failed`.
pub const FAIL_PREFIX: &str = "fail";

pub struct MockState {
    pub name: String,
    pub status: StatusCode,
    pub hits: AtomicUsize,
    pub requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub fn backend(&self) -> Backend {
        Backend::new(self.addr.ip().to_string(), self.addr.port())
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// The value this backend returns for `key` on `/fetch`.
    pub fn value_for(&self, key: &Encoded) -> Encoded {
        Encoded::text(format!("{}@{}", key.data, self.state.name))
    }
}

fn record(state: &MockState, method: &str, path: &str, headers: &HeaderMap, body: &Bytes) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.to_string(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });
}

async fn fetch_all(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Vec<FetchItem>>) {
    record(&state, "GET", "/fetch", &headers, &body);
    let key = Encoded::text(format!("all@{}", state.name));
    (
        state.status,
        Json(vec![FetchItem {
            key,
            value: Some(Encoded::text(state.name.clone())),
        }]),
    )
}

async fn fetch(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Vec<FetchItem>>) {
    record(&state, "POST", "/fetch", &headers, &body);
    let keys: Vec<Encoded> = serde_json::from_slice(&body).unwrap_or_default();
    let items = keys
        .into_iter()
        .map(|key| FetchItem {
            value: Some(Encoded::text(format!("{}@{}", key.data, state.name))),
            key,
        })
        .collect();
    (state.status, Json(items))
}

async fn query(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Vec<QueryItem>>) {
    record(&state, "POST", "/query", &headers, &body);
    let keys: Vec<Encoded> = serde_json::from_slice(&body).unwrap_or_default();
    let items = keys
        .into_iter()
        .map(|key| QueryItem { key, value: true })
        .collect();
    (state.status, Json(items))
}

async fn set(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<SetResponse>) {
    record(&state, "PUT", "/set", &headers, &body);
    let pairs: Vec<SetRequest> = serde_json::from_slice(&body).unwrap_or_default();
    let mut reply = SetResponse::default();
    for pair in pairs {
        if pair.key.data.starts_with(FAIL_PREFIX) {
            reply.keys_failed.push(pair.key);
        } else {
            reply.keys_added += 1;
        }
    }
    (state.status, Json(reply))
}

/// Starts a well-behaved backend replying with `status` on every endpoint.
pub async fn spawn_backend(name: &str, status: u16) -> MockBackend {
    let state = Arc::new(MockState {
        name: name.to_string(),
        status: StatusCode::from_u16(status).unwrap(),
        hits: AtomicUsize::new(0),
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/fetch", get(fetch_all).post(fetch))
        .route("/query", post(query))
        .route("/set", put(set))
        .layer(DefaultBodyLimit::disable())
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend { addr, state }
}

/// Starts a backend that answers every request with a fixed status and body.
pub async fn spawn_raw_backend(status: u16, body: &'static str) -> MockBackend {
    let state = Arc::new(MockState {
        name: "raw".to_string(),
        status: StatusCode::from_u16(status).unwrap(),
        hits: AtomicUsize::new(0),
        requests: Mutex::new(Vec::new()),
    });

    let handler_state = state.clone();
    let app = Router::new().fallback(move |headers: HeaderMap, req_body: Bytes| {
        let state = handler_state.clone();
        async move {
            record(&state, "ANY", "*", &headers, &req_body);
            (state.status, body)
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend { addr, state }
}

/// Address nothing listens on; connecting to it is refused.
pub async fn dead_backend() -> Backend {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Backend::new(addr.ip().to_string(), addr.port())
}
