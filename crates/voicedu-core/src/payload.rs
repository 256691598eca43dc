use axum::{
    body::Body,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{HttpError, error_response};

/// Body limit applied when a route does not set its own (1 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 1 << 20;

/// Per-route body limit, installed as a request extension
///
/// ```ignore
/// router.layer(axum::Extension(BodyLimit(32 << 20)))
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

/// Extractor for JSON request bodies
///
/// Unlike `axum::Json` it does not insist on a `Content-Type` header, and its
/// rejection is a typed [`PayloadRejection`] so handlers can fold body
/// failures into their own error classification.
pub struct ExtractPayload<T>(pub T);

/// Why a request body could not be turned into a payload
#[derive(Debug, thiserror::Error)]
pub enum PayloadRejection {
    /// Body exceeded the route's limit
    #[error("Request body is too large, limit is {limit} bytes")]
    TooLarge { limit: usize },

    /// Body stream failed before completion
    #[error("Failed to read request body: {0}")]
    Read(String),

    /// Body is not valid JSON for the expected shape
    #[error("Failed to parse request body: {0}")]
    Parse(String),
}

impl HttpError for PayloadRejection {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Read(_) | Self::Parse(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_type(&self) -> &str {
        "invalid_request_error"
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        let limit = parts
            .extensions
            .get::<BodyLimit>()
            .map_or(DEFAULT_BODY_LIMIT, |limit| limit.0);

        let bytes = axum::body::to_bytes(body, limit).await.map_err(|err| {
            if std::error::Error::source(&err).is_some_and(|source| source.is::<http_body_util::LengthLimitError>()) {
                PayloadRejection::TooLarge { limit }
            } else {
                PayloadRejection::Read(err.to_string())
            }
        })?;

        serde_json::from_slice::<T>(&bytes)
            .map(Self)
            .map_err(|e| PayloadRejection::Parse(e.to_string()))
    }
}
