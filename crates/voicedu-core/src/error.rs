use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each handler crate's error type so that every failure,
/// whatever its origin, leaves the service in the same envelope.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable classification (e.g. `provider_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}

/// Uniform error body: `{ "error": "<message>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Render a domain error as a JSON response
pub fn error_response<E: HttpError + ?Sized>(error: &E) -> Response {
    let status = error.status_code();

    if status.is_server_error() {
        tracing::warn!(error_type = error.error_type(), status = status.as_u16(), "request failed: {error}");
    } else {
        tracing::debug!(error_type = error.error_type(), status = status.as_u16(), "request rejected: {error}");
    }

    let body = ErrorBody {
        error: error.client_message(),
    };

    (status, Json(body)).into_response()
}

/// Fallback for routes hit with an unsupported method
///
/// Plain text, unlike the JSON envelope every other failure uses.
pub async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
}
