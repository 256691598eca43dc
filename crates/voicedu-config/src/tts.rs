use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.uberduck.ai";

/// Upstream TTS provider configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtsConfig {
    /// Provider base URL
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Path of the synchronous synthesis endpoint
    #[serde(default = "default_synthesis_path")]
    pub synthesis_path: String,
    /// Path of the voice listing endpoint
    #[serde(default = "default_voices_path")]
    pub voices_path: String,
    /// Credential key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Credential secret, only needed for basic authentication
    #[serde(default)]
    pub api_secret: Option<SecretString>,
    /// How credentials are encoded into the `Authorization` header
    #[serde(default)]
    pub auth: AuthScheme,
    /// Timeout for calls to the provider API (e.g. "60s")
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
    /// Timeout for fetching audio from a provider-returned URL
    #[serde(default = "default_audio_fetch_timeout")]
    pub audio_fetch_timeout: String,
    /// Upper bound on audio downloaded from a provider-returned URL
    #[serde(default = "default_max_audio_bytes")]
    pub max_audio_bytes: usize,
    /// Response fields that may carry inline base64 audio, in priority order
    #[serde(default = "default_audio_fields")]
    pub audio_fields: Vec<String>,
    /// Response field that may carry a downloadable audio URL
    #[serde(default = "default_url_field")]
    pub url_field: String,
    /// Voice catalog settings
    #[serde(default)]
    pub voices: VoicesConfig,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            synthesis_path: default_synthesis_path(),
            voices_path: default_voices_path(),
            api_key: None,
            api_secret: None,
            auth: AuthScheme::default(),
            request_timeout: default_request_timeout(),
            audio_fetch_timeout: default_audio_fetch_timeout(),
            max_audio_bytes: default_max_audio_bytes(),
            audio_fields: default_audio_fields(),
            url_field: default_url_field(),
            voices: VoicesConfig::default(),
        }
    }
}

impl TtsConfig {
    /// Absolute URL of a provider endpoint, e.g. `synthesis_path` appended to `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the combined URL does not parse
    pub fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        let raw = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| anyhow::anyhow!("invalid TTS endpoint '{raw}': {e}"))
    }

    /// Parsed provider call timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string is invalid
    pub fn request_timeout(&self) -> anyhow::Result<Duration> {
        parse_duration("tts.request_timeout", &self.request_timeout)
    }

    /// Parsed audio download timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string is invalid
    pub fn audio_fetch_timeout(&self) -> anyhow::Result<Duration> {
        parse_duration("tts.audio_fetch_timeout", &self.audio_fetch_timeout)
    }
}

/// Authentication strategy for the TTS provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Basic base64(key:secret)`, both parts required
    Basic,
    /// `Bearer key`, secret ignored
    Bearer,
    /// Basic when a secret is configured, bearer otherwise
    #[default]
    Auto,
}

/// Voice catalog filtering settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoicesConfig {
    /// Only voices whose language contains one of these are returned
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Maximum number of voices returned
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            limit: default_limit(),
        }
    }
}

pub(crate) fn parse_duration(field: &str, value: &str) -> anyhow::Result<Duration> {
    duration_str::parse(value).map_err(|e| anyhow::anyhow!("invalid duration for {field} '{value}': {e}"))
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL must parse")
}

fn default_synthesis_path() -> String {
    "/speak-synchronous".to_string()
}

fn default_voices_path() -> String {
    "/voices".to_string()
}

fn default_request_timeout() -> String {
    "60s".to_string()
}

fn default_audio_fetch_timeout() -> String {
    "30s".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_audio_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_audio_fields() -> Vec<String> {
    vec!["audio".to_string(), "audio_base64".to_string()]
}

fn default_url_field() -> String {
    "url".to_string()
}

fn default_languages() -> Vec<String> {
    vec!["english".to_string(), "spanish".to_string()]
}

#[allow(clippy::missing_const_for_fn)]
fn default_limit() -> usize {
    120
}
