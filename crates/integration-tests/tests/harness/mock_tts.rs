//! Mock TTS provider for integration tests
//!
//! Serves the synchronous synthesis endpoint, a voice listing and a hosted
//! audio file, counting every call.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Bytes served at `/files/clip.mp3`
pub const HOSTED_AUDIO: &[u8] = &[0x49, 0x44, 0x33, 0x04, 0x00, 0x00];

/// How the synthesis endpoint answers
#[derive(Clone)]
pub enum SpeakReply {
    /// 200 with `{ "audio": <value> }`
    Inline(String),
    /// 200 with `{ "url": "<mock>/files/clip.mp3" }`
    HostedUrl,
    /// 200 with an arbitrary JSON body
    Json(Value),
    /// Given status with a text body
    Status(u16, String),
}

/// How the voice listing answers
#[derive(Clone)]
pub enum VoicesReply {
    Listing(Value),
    Status(u16),
}

pub struct MockTts {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockTtsState>,
}

struct MockTtsState {
    speak_reply: SpeakReply,
    voices_reply: VoicesReply,
    speak_count: AtomicU32,
    voices_count: AtomicU32,
    audio_count: AtomicU32,
    last_authorization: Mutex<Option<String>>,
    last_speak_body: Mutex<Option<Value>>,
    audio_authorization: Mutex<Option<String>>,
    base_url: Mutex<String>,
}

impl MockTts {
    /// Start a provider answering synthesis with `reply`
    pub async fn start(reply: SpeakReply) -> anyhow::Result<Self> {
        Self::start_inner(reply, VoicesReply::Listing(json!([]))).await
    }

    /// Start a provider whose voice listing answers with `reply`
    pub async fn start_with_voices(reply: VoicesReply) -> anyhow::Result<Self> {
        Self::start_inner(SpeakReply::Status(500, "unused".to_owned()), reply).await
    }

    async fn start_inner(speak_reply: SpeakReply, voices_reply: VoicesReply) -> anyhow::Result<Self> {
        let state = Arc::new(MockTtsState {
            speak_reply,
            voices_reply,
            speak_count: AtomicU32::new(0),
            voices_count: AtomicU32::new(0),
            audio_count: AtomicU32::new(0),
            last_authorization: Mutex::new(None),
            last_speak_body: Mutex::new(None),
            audio_authorization: Mutex::new(None),
            base_url: Mutex::new(String::new()),
        });

        let app = Router::new()
            .route("/speak-synchronous", routing::post(handle_speak))
            .route("/voices", routing::get(handle_voices))
            .route("/files/clip.mp3", routing::get(handle_audio))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        *state.base_url.lock().unwrap() = format!("http://{addr}");

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

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn speak_count(&self) -> u32 {
        self.state.speak_count.load(Ordering::Relaxed)
    }

    pub fn voices_count(&self) -> u32 {
        self.state.voices_count.load(Ordering::Relaxed)
    }

    pub fn audio_count(&self) -> u32 {
        self.state.audio_count.load(Ordering::Relaxed)
    }

    /// `Authorization` header of the most recent synthesis or listing call
    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }

    pub fn last_speak_body(&self) -> Option<Value> {
        self.state.last_speak_body.lock().unwrap().clone()
    }

    /// `Authorization` header seen by the hosted audio route
    pub fn audio_authorization(&self) -> Option<String> {
        self.state.audio_authorization.lock().unwrap().clone()
    }
}

impl Drop for MockTts {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

async fn handle_speak(State(state): State<Arc<MockTtsState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.speak_count.fetch_add(1, Ordering::Relaxed);
    *state.last_authorization.lock().unwrap() = authorization(&headers);
    *state.last_speak_body.lock().unwrap() = Some(body);

    match &state.speak_reply {
        SpeakReply::Inline(audio) => Json(json!({ "audio": audio })).into_response(),
        SpeakReply::HostedUrl => {
            let url = format!("{}/files/clip.mp3", state.base_url.lock().unwrap());
            Json(json!({ "url": url })).into_response()
        }
        SpeakReply::Json(body) => Json(body.clone()).into_response(),
        SpeakReply::Status(status, text) => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, text.clone()).into_response()
        }
    }
}

async fn handle_voices(State(state): State<Arc<MockTtsState>>, headers: HeaderMap) -> Response {
    state.voices_count.fetch_add(1, Ordering::Relaxed);
    *state.last_authorization.lock().unwrap() = authorization(&headers);

    match &state.voices_reply {
        VoicesReply::Listing(listing) => Json(listing.clone()).into_response(),
        VoicesReply::Status(status) => StatusCode::from_u16(*status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
    }
}

async fn handle_audio(State(state): State<Arc<MockTtsState>>, headers: HeaderMap) -> Response {
    state.audio_count.fetch_add(1, Ordering::Relaxed);
    *state.audio_authorization.lock().unwrap() = authorization(&headers);

    ([("content-type", "audio/mpeg")], HOSTED_AUDIO).into_response()
}
