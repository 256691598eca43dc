//! Mock object storage API for integration tests

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::json;
use tokio_util::sync::CancellationToken;

/// One object write as the storage API saw it
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub path: String,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub upsert: Option<String>,
    pub apikey: Option<String>,
    pub body: Vec<u8>,
}

pub struct MockStorage {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockStorageState>,
}

struct MockStorageState {
    /// Answer object writes with 409 Duplicate
    reject_uploads: bool,
    bucket_count: AtomicU32,
    objects: Mutex<Vec<StoredObject>>,
}

impl MockStorage {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(false).await
    }

    /// Start a storage API that refuses every object write
    pub async fn start_rejecting() -> anyhow::Result<Self> {
        Self::start_inner(true).await
    }

    async fn start_inner(reject_uploads: bool) -> anyhow::Result<Self> {
        let state = Arc::new(MockStorageState {
            reject_uploads,
            bucket_count: AtomicU32::new(0),
            objects: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/storage/v1/bucket", routing::post(handle_bucket))
            .route("/storage/v1/object/{bucket}/{*path}", routing::post(handle_object))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn bucket_count(&self) -> u32 {
        self.state.bucket_count.load(Ordering::Relaxed)
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.state.objects.lock().unwrap().clone()
    }
}

impl Drop for MockStorage {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

async fn handle_bucket(State(state): State<Arc<MockStorageState>>) -> Response {
    // Bucket already exists after the first call, like the real API
    if state.bucket_count.fetch_add(1, Ordering::Relaxed) == 0 {
        Json(json!({ "name": "voicedu-audios" })).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "statusCode": "409", "error": "Duplicate", "message": "The resource already exists" })),
        )
            .into_response()
    }
}

async fn handle_object(
    State(state): State<Arc<MockStorageState>>,
    Path((bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if state.reject_uploads {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "statusCode": "409", "error": "Duplicate", "message": "The resource already exists" })),
        )
            .into_response();
    }

    let key = format!("{bucket}/{path}");

    state.objects.lock().unwrap().push(StoredObject {
        bucket,
        path,
        content_type: header(&headers, "content-type"),
        cache_control: header(&headers, "cache-control"),
        upsert: header(&headers, "x-upsert"),
        apikey: header(&headers, "apikey"),
        body: body.to_vec(),
    });

    Json(json!({ "Key": key })).into_response()
}
