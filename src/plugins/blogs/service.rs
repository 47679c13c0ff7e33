use axum::http::StatusCode;
use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, warn, Span};

use crate::http_error::{AppError, ErrorField};
use crate::plugins::blogs::models::{Blog, BlogCreate, BlogEnvelope, BlogFilter, BlogList, BlogUpdate, MessageBody, PopulatedBlog};
use crate::plugins::shared::{HandlerResult, Reply};
use crate::store::{parse_id, DynBlogStore, StoreError};

pub const BLOG_NOT_FOUND: &str = "Blog not found.";
pub const UPDATE_NOT_FOUND: &str = "NOT FOUND";
pub const BLOG_DELETED: &str = "Blog deleted";

/// The six blog operations as plain async functions of their input and the
/// store. Every event is emitted under the span handed in at construction.
#[derive(Clone)]
pub struct BlogResourceHandler {
    store: DynBlogStore,
    span: Span,
}

impl BlogResourceHandler {
    pub fn new(store: DynBlogStore, span: Span) -> Self {
        Self { store, span }
    }

    fn failure(&self, e: StoreError, field: ErrorField) -> AppError {
        error!(parent: &self.span, error = %e, "blog store call failed");
        AppError::from(e).in_field(field)
    }

    pub async fn create(&self, input: BlogCreate) -> HandlerResult<BlogEnvelope<Blog>> {
        info!(parent: &self.span, "attempting to create blog");
        let blog = Blog::new(input, Utc::now());

        let saved = self.store.save(&blog).await.map_err(|e| self.failure(e, ErrorField::Message))?;
        info!(parent: &self.span, id = %saved.id, "new blog created");
        Ok(Reply::created(BlogEnvelope { blog: saved }))
    }

    pub async fn read(&self, raw_id: &str) -> HandlerResult<BlogEnvelope<PopulatedBlog>> {
        info!(parent: &self.span, id = raw_id, "incoming read for blog");
        let id = parse_id(raw_id).map_err(|e| self.failure(e, ErrorField::Error))?;

        let found = self.store.find_by_id(id).await.map_err(|e| self.failure(e, ErrorField::Error))?;
        let Some(blog) = found else {
            return Err(AppError::new(StatusCode::NOT_FOUND, BLOG_NOT_FOUND));
        };

        let blog = self.store.resolve_author(blog).await.map_err(|e| self.failure(e, ErrorField::Error))?;
        Ok(Reply::ok(BlogEnvelope { blog }))
    }

    pub async fn read_all(&self) -> HandlerResult<BlogList> {
        info!(parent: &self.span, "returning all blogs");
        self.list(&BlogFilter::default()).await
    }

    /// `filter` is the raw request body and reaches the store as-is.
    pub async fn query(&self, filter: Value) -> HandlerResult<BlogList> {
        info!(parent: &self.span, "query route called");
        let filter = BlogFilter::try_from(filter)
            .map_err(|reason| self.failure(StoreError::InvalidFilter(reason), ErrorField::Message))?;
        self.list(&filter).await
    }

    async fn list(&self, filter: &BlogFilter) -> HandlerResult<BlogList> {
        let blogs = self.store.find_matching(filter).await.map_err(|e| self.failure(e, ErrorField::Message))?;
        let blogs = self.store.resolve_authors(blogs).await.map_err(|e| self.failure(e, ErrorField::Message))?;
        Ok(Reply::ok(BlogList::from(blogs)))
    }

    /// Read-modify-write with no version check: concurrent updates to one id
    /// are last-write-wins. `changes` is the raw body; it is only read once
    /// the blog has been found.
    pub async fn update(&self, raw_id: &str, changes: Value) -> HandlerResult<BlogEnvelope<Blog>> {
        info!(parent: &self.span, id = raw_id, "update route called");
        let id = parse_id(raw_id).map_err(|e| self.failure(e, ErrorField::Message))?;

        let found = self.store.find_by_id(id).await.map_err(|e| self.failure(e, ErrorField::Message))?;
        // a missing id answers 401 on this route
        let Some(mut blog) = found else {
            return Err(AppError::new(StatusCode::UNAUTHORIZED, UPDATE_NOT_FOUND).in_field(ErrorField::Message));
        };

        let changes = BlogUpdate::from_body(changes)
            .map_err(|reason| self.failure(StoreError::InvalidUpdate(reason), ErrorField::Message))?;
        changes.apply_to(&mut blog);
        blog.updated_at = Utc::now();

        let saved = self.store.save(&blog).await.map_err(|e| self.failure(e, ErrorField::Message))?;
        info!(parent: &self.span, id = %saved.id, "blog updated");
        Ok(Reply::created(BlogEnvelope { blog: saved }))
    }

    /// Answers 201 whether or not a document matched.
    pub async fn delete(&self, raw_id: &str) -> HandlerResult<MessageBody> {
        warn!(parent: &self.span, id = raw_id, "delete route called");
        let id = parse_id(raw_id).map_err(|e| self.failure(e, ErrorField::Message))?;

        let deleted = self.store.delete_by_id(id).await.map_err(|e| self.failure(e, ErrorField::Message))?;
        if !deleted {
            warn!(parent: &self.span, id = %id, "delete matched no blog");
        }
        Ok(Reply::created(MessageBody { message: BLOG_DELETED }))
    }
}
