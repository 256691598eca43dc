use axum::extract::rejection::QueryRejection;
use axum::response::{IntoResponse, Response};
use reqwest::StatusCode;
use thiserror::Error;
use voicedu_core::{HttpError, PayloadRejection, error_response};

pub type Result<T> = std::result::Result<T, TtsError>;

/// Failure classifications of the TTS handlers
///
/// Each stage of a synthesis (parse, validate, credentials, provider call,
/// normalization) produces its own variant, so the classification is fixed
/// where the failure happens rather than guessed from a catch-all.
#[derive(Debug, Error)]
pub enum TtsError {
    /// Malformed or incomplete request; the caller must fix it
    #[error("{0}")]
    BadRequest(String),

    /// Deployment lacks provider credentials
    #[error("Missing TTS provider credentials")]
    MissingCredentials,

    /// Provider answered 404/501: synchronous synthesis is not on this plan
    #[error("Synchronous TTS not available on this plan. Use the async TTS endpoint and polling.")]
    ProviderUnavailable { status: u16 },

    /// Provider failed, or a provider-returned audio URL could not be fetched within bounds
    #[error("TTS provider error: {0}")]
    ProviderError(String),

    /// Provider succeeded but its response carried no usable audio
    #[error("No audio returned")]
    NoAudioProduced,

    /// Unexpected failure such as a dropped connection or an unparseable response
    #[error("{0}")]
    Internal(String),
}

impl TtsError {
    /// Internal error carrying `message`, or a generic text when it is blank
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();

        if message.trim().is_empty() {
            Self::Internal("Unknown error".to_string())
        } else {
            Self::Internal(message)
        }
    }
}

impl HttpError for TtsError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingCredentials | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ProviderUnavailable { .. } => StatusCode::NOT_IMPLEMENTED,
            Self::ProviderError(_) | Self::NoAudioProduced => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::MissingCredentials => "missing_credentials",
            Self::ProviderUnavailable { .. } => "provider_unavailable",
            Self::ProviderError(_) => "provider_error",
            Self::NoAudioProduced => "no_audio_produced",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl From<PayloadRejection> for TtsError {
    fn from(rejection: PayloadRejection) -> Self {
        Self::BadRequest(rejection.to_string())
    }
}

impl From<QueryRejection> for TtsError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for TtsError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}
