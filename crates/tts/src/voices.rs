use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;
use voicedu_config::TtsConfig;

use crate::{
    auth::Credentials,
    error::{Result, TtsError},
    http_client::http_client,
    types::{Voice, VoiceQuery},
};

/// Provider voice listing, normalized and filtered for the UI
pub struct VoiceCatalog {
    client: Client,
    endpoint: Url,
    credentials: Credentials,
    request_timeout: Duration,
    languages: Vec<String>,
    limit: usize,
}

impl VoiceCatalog {
    pub fn new(config: &TtsConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client(),
            endpoint: config.endpoint(&config.voices_path)?,
            credentials: Credentials::from_config(config),
            request_timeout: config.request_timeout()?,
            languages: config.voices.languages.iter().map(|l| l.to_lowercase()).collect(),
            limit: config.voices.limit,
        })
    }

    /// List voices matching `query`
    ///
    /// A failing provider yields the built-in sample voices instead of an error.
    pub async fn list(&self, query: &VoiceQuery) -> Result<Vec<Voice>> {
        let auth = self.credentials.resolve()?;

        let response = auth
            .apply(self.client.get(self.endpoint.clone()))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Voice listing request failed: {e}");
                TtsError::internal(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Voice listing failed ({status}), serving sample voices");
            return Ok(sample_voices());
        }

        let body: Value = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse voice listing: {e}");
            TtsError::internal(e.to_string())
        })?;

        let Value::Array(records) = body else {
            return Err(TtsError::internal("Voice listing is not an array"));
        };

        let voices = self.select(records.iter().map(normalize_voice), query);

        tracing::debug!("Voice listing: {} of {} voices selected", voices.len(), records.len());

        Ok(voices)
    }

    fn select(&self, voices: impl Iterator<Item = Voice>, query: &VoiceQuery) -> Vec<Voice> {
        let language = lowered(query.language.as_deref());
        let tag = lowered(query.tag.as_deref());
        let state = lowered(query.state.as_deref());

        voices
            .filter(|v| language.as_ref().is_none_or(|l| v.language.contains(l.as_str())))
            .filter(|v| tag.as_ref().is_none_or(|t| v.tags.iter().any(|vt| vt.contains(t.as_str()))))
            .filter(|v| state.as_ref().is_none_or(|s| v.state.contains(s.as_str())))
            .filter(|v| self.languages.iter().any(|l| v.language.contains(l.as_str())))
            .take(self.limit)
            .collect()
    }
}

fn lowered(filter: Option<&str>) -> Option<String> {
    filter.filter(|f| !f.is_empty()).map(str::to_lowercase)
}

/// First of `keys` holding a non-empty string or a number
fn first_text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn normalize_voice(record: &Value) -> Voice {
    let tags = match record.get("tags").or_else(|| record.get("category")) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.to_lowercase(),
                other => other.to_string().to_lowercase(),
            })
            .collect(),
        Some(Value::String(tag)) if !tag.is_empty() => vec![tag.to_lowercase()],
        _ => Vec::new(),
    };

    Voice {
        id: first_text(record, &["uuid", "id", "voice_id", "name"]),
        name: first_text(record, &["name", "display_name"]).unwrap_or_else(|| "Unknown".to_string()),
        language: first_text(record, &["language", "lang"])
            .unwrap_or_default()
            .to_lowercase(),
        sample_url: first_text(record, &["preview_url", "sample"]),
        tags,
        state: first_text(record, &["state"]).map_or_else(|| "ready".to_string(), |s| s.to_lowercase()),
    }
}

fn sample_voices() -> Vec<Voice> {
    let voice = |id: &str, name: &str, language: &str, tag: &str| Voice {
        id: Some(id.to_string()),
        name: name.to_string(),
        language: language.to_string(),
        sample_url: Some(String::new()),
        tags: vec![tag.to_string()],
        state: "ready".to_string(),
    };

    vec![
        voice("es_female_1", "ES Femenina", "spanish", "celebrity"),
        voice("en_male_1", "EN Male", "english", "narration"),
    ]
}
