use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};

use crate::store::StoreError;

/// JSON key the error text is written under. Read-style endpoints answer with
/// `{"error": ..}`, write and list endpoints with `{"message": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorField {
    Error,
    Message,
}

impl ErrorField {
    fn key(self) -> &'static str {
        match self {
            ErrorField::Error => "error",
            ErrorField::Message => "message",
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<String>,
    pub field: ErrorField,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), code: None, field: ErrorField::Error }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn in_field(mut self, field: ErrorField) -> Self {
        self.field = field;
        self
    }

    /// Body as it goes over the wire; `code` only appears when set.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert(self.field.key().to_string(), Value::String(self.message.clone()));
        if let Some(code) = &self.code {
            body.insert("code".to_string(), Value::String(code.clone()));
        }
        Value::Object(body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = self.body();
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        let err = AppError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        match e {
            StoreError::InvalidFilter(_) => err.with_code("invalid_filter"),
            StoreError::InvalidUpdate(_) => err.with_code("invalid_update"),
            StoreError::InvalidId(_) => err.with_code("invalid_id"),
            StoreError::Database(_) | StoreError::Serialization(_) => err,
        }
    }
}
