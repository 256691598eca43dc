use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Object storage configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Storage project URL (e.g. `https://<project>.supabase.co`)
    #[serde(default)]
    pub url: Option<String>,
    /// Service role key used for bucket and object writes
    #[serde(default)]
    pub service_key: Option<SecretString>,
    /// Public bucket uploads are written to
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// `Cache-Control` max-age applied to uploaded objects, in seconds
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age: u64,
    /// Upload request body limit in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Timeout for calls to the storage API
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            bucket: default_bucket(),
            cache_max_age: default_cache_max_age(),
            max_upload_bytes: default_max_upload_bytes(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl StorageConfig {
    /// Storage project URL, if one is configured
    ///
    /// Blank values (an unset variable expanded with an empty default) count as missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not a valid URL
    pub fn project_url(&self) -> anyhow::Result<Option<Url>> {
        match self.url.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Url::parse(raw)
                .map(Some)
                .map_err(|e| anyhow::anyhow!("invalid storage.url '{raw}': {e}")),
        }
    }

    /// Parsed storage call timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string is invalid
    pub fn request_timeout(&self) -> anyhow::Result<Duration> {
        crate::tts::parse_duration("storage.request_timeout", &self.request_timeout)
    }
}

fn default_bucket() -> String {
    "voicedu-audios".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_cache_max_age() -> u64 {
    31_536_000
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_upload_bytes() -> usize {
    32 * 1024 * 1024
}

fn default_request_timeout() -> String {
    "60s".to_string()
}
