//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use secrecy::SecretString;
use voicedu_config::{AuthScheme, Config, CorsConfig, HealthConfig, ServerConfig, StorageConfig, TtsConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal defaults: no credentials, health enabled
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                    cors: None,
                },
                tts: TtsConfig::default(),
                storage: StorageConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Point the TTS provider at a mock with key and secret set
    pub fn with_tts_provider(mut self, base_url: &str) -> Self {
        self.config.tts.base_url = base_url.parse().expect("valid URL");
        self.config.tts.api_key = Some(SecretString::from("test-key"));
        self.config.tts.api_secret = Some(SecretString::from("test-secret"));
        self
    }

    /// Point the TTS provider at a mock without any credentials
    pub fn with_tts_provider_without_credentials(mut self, base_url: &str) -> Self {
        self.config.tts.base_url = base_url.parse().expect("valid URL");
        self
    }

    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.config.tts.auth = scheme;
        self
    }

    pub fn with_max_audio_bytes(mut self, limit: usize) -> Self {
        self.config.tts.max_audio_bytes = limit;
        self
    }

    pub fn with_voice_limit(mut self, limit: usize) -> Self {
        self.config.tts.voices.limit = limit;
        self
    }

    /// Point storage at a mock with a service key set
    pub fn with_storage(mut self, url: &str) -> Self {
        self.config.storage.url = Some(url.to_owned());
        self.config.storage.service_key = Some(SecretString::from("service-key"));
        self
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.config.storage.max_upload_bytes = limit;
        self
    }

    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
