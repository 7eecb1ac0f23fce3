//! In-process stand-in for the BugHerd API.
//!
//! [`MockServer`] binds an `axum` app to an ephemeral local port, serves
//! canned responses keyed by request path, and records every request so tests
//! can assert on the exact path, query string and `Authorization` header.
//!
//! ```ignore
//! let server = MockServer::start().await;
//! server.respond_json("/projects.json", json!({ "projects": [] }));
//! let client = BugherdClient::new(server.config("key"))?;
//! ```

use crate::config::{ApiKeySource, Config};
use axum::Router;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode, Uri};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request received by the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Path plus query string, e.g. `/projects/1/tasks.json?status=doing`.
    pub path_and_query: String,
    /// Raw `Authorization` header, if sent.
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: StatusCode,
    body: String,
}

#[derive(Debug, Default)]
struct MockState {
    /// Responses per path. The last one in each queue is sticky.
    routes: HashMap<String, VecDeque<CannedResponse>>,
    requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<MockState>>;

/// A local HTTP server impersonating the BugHerd API.
///
/// The server task is aborted when this value is dropped.
pub struct MockServer {
    addr: SocketAddr,
    state: SharedState,
    task: JoinHandle<()>,
}

impl MockServer {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = SharedState::default();
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock BugHerd server");
        let addr = listener
            .local_addr()
            .expect("Mock server has no local address");

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock BugHerd server stopped");
            }
        });

        Self { addr, state, task }
    }

    /// Base URL to point a client at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration targeting this server with a fixed API key.
    #[must_use]
    pub fn config(&self, api_key: &str) -> Config {
        Config::new(self.base_url()).with_api_key(ApiKeySource::Fixed(api_key.to_string()))
    }

    /// Queue a response for `path`.
    ///
    /// Responses for a path are served in the order they were queued; the
    /// last one keeps being served once the others are used up.
    pub fn respond(&self, path: &str, status: u16, body: impl Into<String>) {
        let status = StatusCode::from_u16(status).expect("Invalid status code for mock");
        self.lock()
            .routes
            .entry(path.to_string())
            .or_default()
            .push_back(CannedResponse {
                status,
                body: body.into(),
            });
    }

    /// Queue a `200 OK` JSON response for `path`.
    pub fn respond_json(&self, path: &str, body: &serde_json::Value) {
        self.respond(path, 200, body.to_string());
    }

    /// All requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(
    State(state): State<SharedState>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);

    state.requests.push(RecordedRequest {
        path_and_query: uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), ToString::to_string),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let canned = match state.routes.get_mut(uri.path()) {
        Some(queue) if queue.len() > 1 => queue.pop_front(),
        Some(queue) => queue.front().cloned(),
        None => None,
    };

    match canned {
        Some(resp) => (resp.status, resp.body),
        None => (
            StatusCode::NOT_FOUND,
            format!("no mock response for {}", uri.path()),
        ),
    }
}
