use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;
use voicedu_config::TtsConfig;

use crate::{
    auth::{Credentials, ProviderAuth},
    error::{Result, TtsError},
    http_client::http_client,
    types::{SynthesisRequest, SynthesisResult},
};

/// Speaking rate sent with every synthesis call
const PACE: f64 = 1.0;

#[derive(serde::Serialize)]
struct SpeakRequest<'a> {
    speech: &'a str,
    voice: &'a str,
    pace: f64,
}

/// Proxy in front of the provider's synchronous synthesis endpoint
///
/// One call per request, plus at most one audio download when the provider
/// answers with a URL instead of inline audio. Holds no per-request state.
pub struct SynthesisProxy {
    client: Client,
    endpoint: Url,
    credentials: Credentials,
    request_timeout: Duration,
    audio_fetch_timeout: Duration,
    max_audio_bytes: usize,
    audio_fields: Vec<String>,
    url_field: String,
}

impl SynthesisProxy {
    pub fn new(config: &TtsConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client(),
            endpoint: config.endpoint(&config.synthesis_path)?,
            credentials: Credentials::from_config(config),
            request_timeout: config.request_timeout()?,
            audio_fetch_timeout: config.audio_fetch_timeout()?,
            max_audio_bytes: config.max_audio_bytes,
            audio_fields: config
                .audio_fields
                .iter()
                .filter(|field| !field.trim().is_empty())
                .cloned()
                .collect(),
            url_field: config.url_field.clone(),
        })
    }

    /// Synthesize `request` into base64 audio
    ///
    /// Validation and credential checks run before any network traffic.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult> {
        let (text, voice) = request.required_fields()?;
        let auth = self.credentials.resolve()?;

        tracing::debug!(
            "TTS synthesis request: voice={voice}, text_len={}, format={:?}",
            text.len(),
            request.requested_format(),
        );

        let body = self.speak(&auth, text, voice).await?;
        let audio_base64 = self.normalize(&body).await?;

        tracing::debug!("TTS synthesis complete, {} base64 chars", audio_base64.len());

        Ok(SynthesisResult {
            audio_base64,
            mime_type: request.audio_format().mime_type(),
        })
    }

    /// Issue the synthesis call and interpret its status
    async fn speak(&self, auth: &ProviderAuth<'_>, text: &str, voice: &str) -> Result<Value> {
        let body = SpeakRequest {
            speech: text,
            voice,
            pace: PACE,
        };

        let response = auth
            .apply(self.client.post(self.endpoint.clone()))
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("TTS provider request failed: {e}");

                if e.is_timeout() {
                    TtsError::ProviderError(format!(
                        "request timed out after {}s",
                        self.request_timeout.as_secs_f64()
                    ))
                } else {
                    TtsError::internal(e.to_string())
                }
            })?;

        let status = response.status();

        if matches!(status, StatusCode::NOT_FOUND | StatusCode::NOT_IMPLEMENTED) {
            tracing::warn!("TTS provider has no synchronous endpoint ({status})");
            return Err(TtsError::ProviderUnavailable {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("TTS provider API error ({status}): {error_text}");

            return Err(TtsError::ProviderError(error_text));
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read TTS provider response body: {e}");
            TtsError::internal(e.to_string())
        })?;

        serde_json::from_slice(&bytes)
            .map_err(|e| TtsError::internal(format!("Failed to parse TTS provider response: {e}")))
    }

    /// Reduce a successful provider body to base64 audio
    ///
    /// Inline audio wins over a URL; inline values are returned untouched.
    async fn normalize(&self, body: &Value) -> Result<String> {
        if let Some(audio) = self.inline_audio(body) {
            return Ok(audio.to_string());
        }

        if let Some(url) = non_empty_str(body, &self.url_field) {
            let audio = self.fetch_audio(url).await?;
            return Ok(STANDARD.encode(audio));
        }

        tracing::error!("TTS provider response carried neither inline audio nor an audio URL");

        Err(TtsError::NoAudioProduced)
    }

    fn inline_audio<'a>(&self, body: &'a Value) -> Option<&'a str> {
        self.audio_fields.iter().find_map(|field| non_empty_str(body, field))
    }

    /// Download provider-hosted audio, bounded in time and size
    async fn fetch_audio(&self, raw_url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(raw_url)
            .map_err(|e| TtsError::ProviderError(format!("invalid audio URL '{raw_url}': {e}")))?;

        tracing::debug!("Fetching TTS audio from provider URL");

        let mut response = self
            .client
            .get(url)
            .timeout(self.audio_fetch_timeout)
            .send()
            .await
            .map_err(|e| self.fetch_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("TTS audio download failed ({status})");
            return Err(TtsError::ProviderError(format!("audio download failed with status {status}")));
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_audio_bytes as u64)
        {
            return Err(self.too_large());
        }

        let mut audio = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.fetch_error(&e))? {
            if audio.len() + chunk.len() > self.max_audio_bytes {
                return Err(self.too_large());
            }
            audio.extend_from_slice(&chunk);
        }

        tracing::debug!("TTS audio download complete, {} bytes", audio.len());

        Ok(audio)
    }

    fn fetch_error(&self, error: &reqwest::Error) -> TtsError {
        tracing::error!("TTS audio download failed: {error}");

        if error.is_timeout() {
            TtsError::ProviderError(format!(
                "audio download timed out after {}s",
                self.audio_fetch_timeout.as_secs_f64()
            ))
        } else {
            TtsError::internal(error.to_string())
        }
    }

    fn too_large(&self) -> TtsError {
        tracing::error!("TTS audio exceeds {} bytes", self.max_audio_bytes);
        TtsError::ProviderError(format!("audio exceeds the {} byte limit", self.max_audio_bytes))
    }
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field).and_then(Value::as_str).filter(|value| !value.is_empty())
}
