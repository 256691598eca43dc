use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// Credentials are not required here; missing keys surface per request.
    ///
    /// # Errors
    ///
    /// Returns an error if a duration, limit or URL is invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_tts_config()?;
        self.validate_storage_config()?;
        Ok(())
    }

    fn validate_tts_config(&self) -> anyhow::Result<()> {
        let tts = &self.tts;

        if tts.request_timeout()?.is_zero() {
            anyhow::bail!("tts.request_timeout must be greater than 0");
        }

        if tts.audio_fetch_timeout()?.is_zero() {
            anyhow::bail!("tts.audio_fetch_timeout must be greater than 0");
        }

        if tts.max_audio_bytes == 0 {
            anyhow::bail!("tts.max_audio_bytes must be greater than 0");
        }

        if tts.audio_fields.iter().all(|field| field.trim().is_empty()) {
            anyhow::bail!("tts.audio_fields must name at least one response field");
        }

        tts.endpoint(&tts.synthesis_path)?;
        tts.endpoint(&tts.voices_path)?;

        if tts.voices.limit == 0 {
            anyhow::bail!("tts.voices.limit must be greater than 0");
        }

        Ok(())
    }

    fn validate_storage_config(&self) -> anyhow::Result<()> {
        let storage = &self.storage;

        storage.project_url()?;

        if storage.request_timeout()?.is_zero() {
            anyhow::bail!("storage.request_timeout must be greater than 0");
        }

        if storage.bucket.trim().is_empty() {
            anyhow::bail!("storage.bucket must not be empty");
        }

        if storage.max_upload_bytes == 0 {
            anyhow::bail!("storage.max_upload_bytes must be greater than 0");
        }

        Ok(())
    }
}
