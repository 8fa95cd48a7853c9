use anyhow::Context as _;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse as _, Response};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Any request whose path contains this id gets a 404.
pub const MISSING_ID: &str = "00000000-0000-0000-0000-000000000000";

/// One request as seen by the mock API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path relative to the API root, e.g. `/csvs/<id>/rows`.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    /// Parsed JSON body; `None` when the request had no body.
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    csvs: Mutex<HashMap<String, String>>,
    next_id: AtomicU64,
}

/// In-process stand-in for the RestCSV API, served under `/api`.
///
/// Records every request. `POST /csvs` stores the CSV text and `GET /csvs/{id}` returns it for
/// stored ids, so store/show round trips can be checked. Everything else echoes the request
/// back as JSON.
pub struct MockApi {
    base_url: String,
    state: Arc<MockState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockApi {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn() -> anyhow::Result<Self> {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind mock api")?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            base_url: format!("http://{addr}/api"),
            state,
            shutdown: Some(shutdown_tx),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Return and clear the recorded requests.
    pub fn take_requests(&self) -> Vec<RecordedRequest> {
        std::mem::take(&mut *self.state.requests.lock())
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    let body = if body.is_empty() {
        None
    } else {
        Some(
            serde_json::from_slice(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned())),
        )
    };

    let recorded = RecordedRequest {
        method: method.to_string(),
        path,
        query: uri.query().map(str::to_string),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body,
    };
    state.requests.lock().push(recorded.clone());

    respond(&state, &recorded)
}

fn respond(state: &MockState, req: &RecordedRequest) -> Response {
    let segments: Vec<&str> = req.path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.contains(&MISSING_ID) {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "message": "No query results for model." })),
        )
            .into_response();
    }

    match (req.method.as_str(), segments.as_slice()) {
        ("POST", ["csvs"]) => {
            let Some(csv) = req
                .body
                .as_ref()
                .and_then(|b| b.get("csv"))
                .and_then(Value::as_str)
            else {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    axum::Json(json!({ "message": "The csv field is required." })),
                )
                    .into_response();
            };
            let n = state.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            let id = format!("00000000-0000-4000-8000-{n:012}");
            state.csvs.lock().insert(id.clone(), csv.to_string());
            (
                StatusCode::CREATED,
                axum::Json(json!({ "id": id, "csv": csv })),
            )
                .into_response()
        }
        ("GET", ["csvs", id]) if state.csvs.lock().contains_key(*id) => {
            let csv = state.csvs.lock().get(*id).cloned();
            axum::Json(json!({ "id": id, "csv": csv })).into_response()
        }
        _ => axum::Json(json!({
            "method": req.method,
            "path": req.path,
            "query": req.query,
            "body": req.body,
        }))
        .into_response(),
    }
}
