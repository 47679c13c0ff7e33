use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::http_error::AppError;

/// Status plus JSON-serializable body, independent of any extractor or handler signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub status: StatusCode,
    pub body: T,
}

impl<T> Reply<T> {
    pub fn new(status: StatusCode, body: T) -> Self {
        Self { status, body }
    }

    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn created(body: T) -> Self {
        Self::new(StatusCode::CREATED, body)
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub type HandlerResult<T> = Result<Reply<T>, AppError>;

/// Decodes a JSON request body. An empty body decodes to `T::default()`; a
/// malformed one is reported as a 500 `{"message": ..}` like any other
/// failure on the write path.
pub fn decode_json<T>(body: &[u8]) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::error!(error = %e, "request body rejected");
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("invalid JSON body: {}", e))
            .in_field(crate::http_error::ErrorField::Message)
    })
}
