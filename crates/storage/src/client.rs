use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::error::{Result, StorageError};

/// Minimal client for a Supabase-style storage REST API
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    /// Project URL without a trailing slash
    base: String,
    service_key: SecretString,
    cache_max_age: u64,
    timeout: Duration,
}

impl StorageClient {
    pub fn new(project_url: &Url, service_key: SecretString, cache_max_age: u64, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base: project_url.as_str().trim_end_matches('/').to_string(),
            service_key,
            cache_max_age,
            timeout,
        })
    }

    /// Create a public bucket
    ///
    /// POST `/storage/v1/bucket`
    pub async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let body = serde_json::json!({ "id": bucket, "name": bucket, "public": true });

        let response = self
            .authorized(self.http.post(format!("{}/storage/v1/bucket", self.base)))
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StorageError::UploadFailed(provider_message(response).await))
        }
    }

    /// Write an object, refusing to overwrite an existing one
    ///
    /// POST `/storage/v1/object/:bucket/:path`
    pub async fn upload_object(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let response = self
            .authorized(self.http.post(format!("{}/storage/v1/object/{bucket}/{path}", self.base)))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(
                reqwest::header::CACHE_CONTROL,
                format!("max-age={}, immutable", self.cache_max_age),
            )
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = provider_message(response).await;
        tracing::error!("Storage upload rejected ({status}): {message}");

        Err(StorageError::UploadFailed(message))
    }

    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let key = self.service_key.expose_secret();

        builder
            .timeout(self.timeout)
            .bearer_auth(key)
            .header("apikey", key)
    }
}

/// Human-readable failure text from a storage API error response
async fn provider_message(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let from_json = serde_json::from_str::<Value>(&text).ok().and_then(|body| {
        ["message", "error"]
            .iter()
            .find_map(|key| body.get(key).and_then(Value::as_str).map(str::to_string))
    });

    match from_json {
        Some(message) if !message.is_empty() => message,
        _ if !text.trim().is_empty() => text,
        _ => format!("storage API returned {status}"),
    }
}
