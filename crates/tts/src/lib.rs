#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod auth;
mod error;
mod http_client;
mod proxy;
mod server;
mod types;
mod voices;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::{get, post},
};
use voicedu_core::{ExtractPayload, PayloadRejection, method_not_allowed};

pub use auth::{Credentials, ProviderAuth};
pub use error::{Result, TtsError};
pub use proxy::SynthesisProxy;
pub use server::{Server, TtsServerBuilder};
pub use types::{AudioFormat, SynthesisRequest, SynthesisResult, Voice, VoiceQuery};
pub use voices::VoiceCatalog;

/// Build the TTS server from configuration
pub fn build_server(config: &voicedu_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TtsServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize TTS server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for TTS
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/api/tts", post(synthesize).fallback(method_not_allowed))
        .route("/api/voices", get(list_voices).fallback(method_not_allowed))
}

/// Handle speech synthesis requests
async fn synthesize(
    State(server): State<Arc<Server>>,
    payload: std::result::Result<ExtractPayload<SynthesisRequest>, PayloadRejection>,
) -> Result<Json<SynthesisResult>> {
    let ExtractPayload(request) = payload?;

    tracing::debug!("TTS handler called for voice: {:?}", request.voice_id);

    let result = server.proxy.synthesize(&request).await?;

    Ok(Json(result))
}

/// Handle voice listing requests
///
/// Filters are read from raw pairs so a repeated key keeps its first value.
async fn list_voices(
    State(server): State<Arc<Server>>,
    pairs: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Voice>>> {
    let Query(pairs) = pairs?;
    let query = VoiceQuery::from_pairs(pairs);

    let voices = server.catalog.list(&query).await?;

    Ok(Json(voices))
}
