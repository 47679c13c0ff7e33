//! Document persistence behind the blog and author plugins.
//!
//! Absence is never an error here: lookups return `Option`, deletes return
//! whether anything was removed, and callers decide what a miss means.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::plugins::authors::models::Author;
use crate::plugins::blogs::models::{Blog, BlogFilter, PopulatedBlog};

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("document (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error("invalid update: {0}")]
    InvalidUpdate(String),
    #[error("Cast to UUID failed for value \"{0}\"")]
    InvalidId(String),
}

/// Parses a path id the way the store would cast it.
pub fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

#[async_trait]
pub trait BlogStore: Send + Sync + 'static {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, StoreError>;

    async fn find_matching(&self, filter: &BlogFilter) -> Result<Vec<Blog>, StoreError>;

    /// Expands the author reference. A dangling reference resolves to `None`.
    async fn resolve_author(&self, blog: Blog) -> Result<PopulatedBlog, StoreError>;

    async fn resolve_authors(&self, blogs: Vec<Blog>) -> Result<Vec<PopulatedBlog>, StoreError> {
        let mut out = Vec::with_capacity(blogs.len());
        for blog in blogs {
            out.push(self.resolve_author(blog).await?);
        }
        Ok(out)
    }

    /// Inserts or replaces the whole document, returning what was persisted.
    async fn save(&self, blog: &Blog) -> Result<Blog, StoreError>;

    /// Returns `true` when a document was removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError>;

    fn backend(&self) -> &'static str;
}

#[async_trait]
pub trait AuthorStore: Send + Sync + 'static {
    async fn insert_author(&self, author: &Author) -> Result<Author, StoreError>;

    async fn find_author(&self, id: Uuid) -> Result<Option<Author>, StoreError>;

    async fn list_authors(&self) -> Result<Vec<Author>, StoreError>;
}

pub type DynBlogStore = Arc<dyn BlogStore>;
pub type DynAuthorStore = Arc<dyn AuthorStore>;

/// One backing store seen through both plugin-facing traits.
#[derive(Clone)]
pub struct Stores {
    pub blogs: DynBlogStore,
    pub authors: DynAuthorStore,
}

impl Stores {
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: BlogStore + AuthorStore,
    {
        Self { blogs: store.clone(), authors: store }
    }

    pub fn in_memory() -> Self {
        Self::shared(Arc::new(InMemoryStore::new()))
    }
}
