use axum::response::{IntoResponse, Response};
use reqwest::StatusCode;
use thiserror::Error;
use voicedu_core::{HttpError, PayloadRejection, error_response};

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Missing fields, undecodable payload or unreadable body
    #[error("{0}")]
    BadRequest(String),

    /// Deployment lacks the storage URL or service key
    #[error("Missing storage credentials")]
    MissingCredentials,

    /// Storage API rejected the object write
    #[error("{0}")]
    UploadFailed(String),

    #[error("{0}")]
    Internal(String),
}

impl StorageError {
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();

        if message.trim().is_empty() {
            Self::Internal("Unknown error during upload".to_string())
        } else {
            Self::Internal(message)
        }
    }
}

impl HttpError for StorageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingCredentials | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UploadFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::MissingCredentials => "missing_credentials",
            Self::UploadFailed(_) => "upload_failed",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl From<PayloadRejection> for StorageError {
    fn from(rejection: PayloadRejection) -> Self {
        Self::BadRequest(rejection.to_string())
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        tracing::error!("Storage API request failed: {error}");
        Self::internal(error.to_string())
    }
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}
