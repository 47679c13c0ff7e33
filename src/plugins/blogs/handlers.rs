use axum::body::Bytes;
use axum::extract::Path;
use axum::Extension;

use crate::plugins::blogs::models::{Blog, BlogCreate, BlogEnvelope, BlogList, MessageBody, PopulatedBlog};
use crate::plugins::blogs::service::BlogResourceHandler;
use crate::plugins::shared::{decode_json, HandlerResult};

pub async fn create_blog(Extension(handler): Extension<BlogResourceHandler>, body: Bytes) -> HandlerResult<BlogEnvelope<Blog>> {
    let input: BlogCreate = decode_json(&body)?;
    handler.create(input).await
}

pub async fn get_blog(Extension(handler): Extension<BlogResourceHandler>, Path(id): Path<String>) -> HandlerResult<BlogEnvelope<PopulatedBlog>> {
    handler.read(&id).await
}

pub async fn list_blogs(Extension(handler): Extension<BlogResourceHandler>) -> HandlerResult<BlogList> {
    handler.read_all().await
}

pub async fn query_blogs(Extension(handler): Extension<BlogResourceHandler>, body: Bytes) -> HandlerResult<BlogList> {
    let filter: serde_json::Value = decode_json(&body)?;
    handler.query(filter).await
}

pub async fn update_blog(Extension(handler): Extension<BlogResourceHandler>, Path(id): Path<String>, body: Bytes) -> HandlerResult<BlogEnvelope<Blog>> {
    let changes: serde_json::Value = decode_json(&body)?;
    handler.update(&id, changes).await
}

pub async fn delete_blog(Extension(handler): Extension<BlogResourceHandler>, Path(id): Path<String>) -> HandlerResult<MessageBody> {
    handler.delete(&id).await
}
