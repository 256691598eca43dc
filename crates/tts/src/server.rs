use voicedu_config::Config;

use crate::{proxy::SynthesisProxy, voices::VoiceCatalog};

/// Shared state of the TTS routes
pub struct Server {
    pub(crate) proxy: SynthesisProxy,
    pub(crate) catalog: VoiceCatalog,
}

/// Builder for constructing the TTS server from configuration
pub struct TtsServerBuilder<'a> {
    config: &'a Config,
}

impl<'a> TtsServerBuilder<'a> {
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<Server> {
        let tts = &self.config.tts;

        if tts.api_key.is_none() {
            tracing::warn!("No TTS provider credentials configured, synthesis and voice listing will fail");
        }

        tracing::debug!("TTS provider at {}, auth scheme {:?}", tts.base_url, tts.auth);

        Ok(Server {
            proxy: SynthesisProxy::new(tts)?,
            catalog: VoiceCatalog::new(tts)?,
        })
    }
}
