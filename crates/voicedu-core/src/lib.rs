#![allow(clippy::must_use_candidate)]

//! Pieces shared by every Voicedu handler crate: the error envelope and the
//! bounded JSON body extractor

mod error;
mod payload;

pub use error::{ErrorBody, HttpError, error_response, method_not_allowed};
pub use payload::{BodyLimit, DEFAULT_BODY_LIMIT, ExtractPayload, PayloadRejection};
