//! Project-specific utilities live here.

use axum::{extract::rejection::JsonRejection, Json};

/// A simple JSON acknowledgement body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Unwrap a JSON body, treating a missing or malformed one as empty.
///
/// Handlers then report the missing fields the same way whether the body
/// was absent, unparsable, or just incomplete.
pub fn payload_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "ignoring unusable request body");
            T::default()
        }
    }
}
