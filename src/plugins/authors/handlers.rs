use axum::body::Bytes;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::Extension;
use serde_json::{Map, Value};

use crate::http_error::{AppError, ErrorField};
use crate::plugins::authors::models::{Author, AuthorEnvelope, AuthorList};
use crate::plugins::shared::{decode_json, HandlerResult, Reply};
use crate::store::{parse_id, DynAuthorStore, StoreError};

pub const AUTHOR_NOT_FOUND: &str = "Author not found.";

fn failure(e: StoreError, field: ErrorField) -> AppError {
    tracing::error!(error = %e, "author store call failed");
    AppError::from(e).in_field(field)
}

pub async fn create_author(Extension(store): Extension<DynAuthorStore>, body: Bytes) -> HandlerResult<AuthorEnvelope> {
    let fields: Map<String, Value> = decode_json(&body)?;
    let author = store.insert_author(&Author::new(fields)).await.map_err(|e| failure(e, ErrorField::Message))?;
    tracing::info!(id = %author.id, "new author created");
    Ok(Reply::created(AuthorEnvelope { author }))
}

pub async fn get_author(Extension(store): Extension<DynAuthorStore>, Path(id): Path<String>) -> HandlerResult<AuthorEnvelope> {
    let id = parse_id(&id).map_err(|e| failure(e, ErrorField::Error))?;
    match store.find_author(id).await.map_err(|e| failure(e, ErrorField::Error))? {
        Some(author) => Ok(Reply::ok(AuthorEnvelope { author })),
        None => Err(AppError::new(StatusCode::NOT_FOUND, AUTHOR_NOT_FOUND)),
    }
}

pub async fn list_authors(Extension(store): Extension<DynAuthorStore>) -> HandlerResult<AuthorList> {
    let authors = store.list_authors().await.map_err(|e| failure(e, ErrorField::Message))?;
    Ok(Reply::ok(AuthorList { count: authors.len(), authors }))
}
