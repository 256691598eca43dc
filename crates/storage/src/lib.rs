#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod client;
mod error;
mod upload;

use std::sync::Arc;

use axum::{Extension, Json, Router, extract::State, routing::post};
use voicedu_core::{BodyLimit, ExtractPayload, PayloadRejection, method_not_allowed};

pub use client::StorageClient;
pub use error::{Result, StorageError};
pub use upload::{UploadRequest, UploadResponse, Uploader, decode_payload, sanitize_filename};

/// Build the upload service from configuration
pub fn build_server(config: &voicedu_config::Config) -> anyhow::Result<Arc<Uploader>> {
    let uploader = Uploader::new(&config.storage).map_err(|e| anyhow::anyhow!("Failed to initialize storage: {e}"))?;

    tracing::debug!("Uploads go to bucket '{}'", config.storage.bucket);

    Ok(Arc::new(uploader))
}

/// Create the endpoint router for uploads
///
/// The route carries its own body limit, sized for base64 audio.
pub fn endpoint_router(max_upload_bytes: usize) -> Router<Arc<Uploader>> {
    Router::new().route(
        "/api/upload",
        post(upload)
            .fallback(method_not_allowed)
            .layer(Extension(BodyLimit(max_upload_bytes))),
    )
}

async fn upload(
    State(uploader): State<Arc<Uploader>>,
    payload: std::result::Result<ExtractPayload<UploadRequest>, PayloadRejection>,
) -> Result<Json<UploadResponse>> {
    let ExtractPayload(request) = payload?;

    tracing::debug!("Upload handler called for file: {:?}", request.filename);

    let response = uploader.upload(request).await?;

    tracing::debug!("Upload stored at {}", response.path);

    Ok(Json(response))
}
