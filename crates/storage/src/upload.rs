use std::sync::OnceLock;

use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use voicedu_config::StorageConfig;

use crate::{
    client::StorageClient,
    error::{Result, StorageError},
};

/// Longest stored file name, after sanitizing
const MAX_NAME_LEN: usize = 80;

/// Standard alphabet; padding optional on input
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Upload request as sent by browser clients
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Raw base64 or a `data:` URL
    pub file_base64: Option<String>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    /// Opaque client data echoed back in the response
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub public_url: String,
    pub path: String,
    pub metadata: Option<Value>,
    pub content_type: String,
}

/// Stores uploaded audio in the configured public bucket
pub struct Uploader {
    /// `None` when the deployment has no storage URL or key
    client: Option<StorageClient>,
    bucket: String,
}

impl Uploader {
    pub fn new(config: &StorageConfig) -> anyhow::Result<Self> {
        let project_url = config.project_url()?;
        let service_key = config
            .service_key
            .clone()
            .filter(|key| !secrecy::ExposeSecret::expose_secret(key).trim().is_empty());

        let client = match (project_url, service_key) {
            (Some(url), Some(key)) => Some(
                StorageClient::new(&url, key, config.cache_max_age, config.request_timeout()?)
                    .map_err(|e| anyhow::anyhow!("Failed to build storage client: {e}"))?,
            ),
            _ => {
                tracing::warn!("No storage credentials configured, uploads will fail");
                None
            }
        };

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
        })
    }

    pub async fn upload(&self, request: UploadRequest) -> Result<UploadResponse> {
        let (Some(file_base64), Some(filename)) = (
            request.file_base64.filter(|v| !v.is_empty()),
            request.filename.filter(|v| !v.is_empty()),
        ) else {
            return Err(StorageError::BadRequest("Missing fileBase64 or filename".to_string()));
        };

        let client = self.client.as_ref().ok_or(StorageError::MissingCredentials)?;

        if let Err(e) = client.create_bucket(&self.bucket).await {
            tracing::debug!("Bucket creation skipped: {e}");
        }

        let bytes = decode_payload(&file_base64)?;
        let safe_name = sanitize_filename(&filename);
        let path = format!("{}-{safe_name}", jiff::Timestamp::now().as_millisecond());
        let content_type = request
            .content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| default_content_type(&safe_name).to_string());

        tracing::debug!("Uploading {} bytes to {}/{path} as {content_type}", bytes.len(), self.bucket);

        client.upload_object(&self.bucket, &path, bytes, &content_type).await?;

        Ok(UploadResponse {
            public_url: client.public_url(&self.bucket, &path),
            path,
            metadata: request.metadata,
            content_type,
        })
    }
}

/// Decode raw base64 or the data part of a `data:` URL
pub fn decode_payload(raw: &str) -> Result<Vec<u8>> {
    let encoded = raw.rsplit_once("base64,").map_or(raw, |(_, data)| data).trim();

    let bytes = LENIENT_BASE64
        .decode(encoded)
        .map_err(|e| StorageError::BadRequest(format!("Invalid base64 payload: {e}")))?;

    if bytes.is_empty() {
        return Err(StorageError::BadRequest("Empty file payload".to_string()));
    }

    Ok(bytes)
}

/// Replace runs of unsafe characters with `_` and cap the length
pub fn sanitize_filename(filename: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();

    let unsafe_runs = UNSAFE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9._-]+").expect("must be valid regex"));

    unsafe_runs.replace_all(filename, "_").chars().take(MAX_NAME_LEN).collect()
}

fn default_content_type(safe_name: &str) -> &'static str {
    if safe_name.to_lowercase().ends_with(".wav") {
        "audio/wav"
    } else {
        "audio/mpeg"
    }
}
