use serde::{Deserialize, Serialize};

/// Speech synthesis request as sent by browser clients
///
/// `lang` and `format` are accepted as older spellings of `language` and
/// `outputFormat`. When both spellings are sent the newer one wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    /// Text to synthesize
    pub text: Option<String>,
    /// Provider voice identifier
    pub voice_id: Option<String>,
    /// Language hint; not forwarded to the provider
    pub language: Option<String>,
    #[serde(rename = "lang")]
    pub legacy_language: Option<String>,
    /// Requested container, `wav` or anything else for mp3
    pub output_format: Option<String>,
    #[serde(rename = "format")]
    pub legacy_format: Option<String>,
}

impl SynthesisRequest {
    /// Text and voice, both required to be non-empty
    pub fn required_fields(&self) -> crate::Result<(&str, &str)> {
        let text = self.text.as_deref().filter(|t| !t.is_empty());
        let voice_id = self.voice_id.as_deref().filter(|v| !v.is_empty());

        match (text, voice_id) {
            (Some(text), Some(voice_id)) => Ok((text, voice_id)),
            _ => Err(crate::TtsError::BadRequest("Missing text or voiceId".to_string())),
        }
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref().or(self.legacy_language.as_deref())
    }

    pub fn requested_format(&self) -> Option<&str> {
        self.output_format.as_deref().or(self.legacy_format.as_deref())
    }

    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat::from_requested(self.requested_format())
    }
}

/// Audio container of a synthesis result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mpeg,
}

impl AudioFormat {
    /// Only an exact `wav` selects WAV; every other value, or none, means MPEG
    pub fn from_requested(format: Option<&str>) -> Self {
        match format {
            Some("wav") => Self::Wav,
            _ => Self::Mpeg,
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mpeg => "audio/mpeg",
        }
    }
}

/// Normalized synthesis result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisResult {
    /// Base64 (standard alphabet) encoded audio
    pub audio_base64: String,
    pub mime_type: &'static str,
}

/// Query parameters of the voice listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceQuery {
    pub tag: Option<String>,
    pub language: Option<String>,
    pub state: Option<String>,
}

impl VoiceQuery {
    /// Build from decoded query pairs; the first occurrence of a key wins
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "tag" => &mut query.tag,
                "language" => &mut query.language,
                "state" => &mut query.state,
                _ => continue,
            };

            if slot.is_none() {
                *slot = Some(value);
            }
        }

        query
    }
}

/// Normalized voice catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub id: Option<String>,
    pub name: String,
    pub language: String,
    pub sample_url: Option<String>,
    pub tags: Vec<String>,
    pub state: String,
}
