use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AuthorStore, BlogStore, StoreError};
use crate::plugins::authors::models::Author;
use crate::plugins::blogs::models::{Blog, BlogFilter, PopulatedBlog};

/// Documents live in a `doc JSONB` column keyed by `id`. Filters are applied
/// with JSONB containment, which is the same top-level partial match the
/// in-memory store performs.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let doc = sqlx::query_scalar::<_, Json<Blog>>("SELECT doc FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc.map(|Json(blog)| blog))
    }

    async fn find_matching(&self, filter: &BlogFilter) -> Result<Vec<Blog>, StoreError> {
        if let Some(op) = filter.operators() {
            return Err(StoreError::InvalidFilter(format!("unsupported operator `{}`", op)));
        }
        let docs = if filter.is_empty() {
            sqlx::query_scalar::<_, Json<Blog>>("SELECT doc FROM blogs ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query_scalar::<_, Json<Blog>>("SELECT doc FROM blogs WHERE doc @> $1 ORDER BY created_at, id")
                .bind(Json(filter.as_value()))
                .fetch_all(&self.pool)
                .await?
        };
        Ok(docs.into_iter().map(|Json(blog)| blog).collect())
    }

    async fn resolve_author(&self, blog: Blog) -> Result<PopulatedBlog, StoreError> {
        let author = match blog.author {
            Some(id) => self.find_author(id).await?,
            None => None,
        };
        Ok(blog.with_author(author))
    }

    async fn resolve_authors(&self, blogs: Vec<Blog>) -> Result<Vec<PopulatedBlog>, StoreError> {
        let mut ids: Vec<Uuid> = blogs.iter().filter_map(|b| b.author).collect();
        ids.sort_unstable();
        ids.dedup();

        let mut authors: HashMap<Uuid, Author> = HashMap::new();
        if !ids.is_empty() {
            let rows = sqlx::query_scalar::<_, Json<Author>>("SELECT doc FROM authors WHERE id = ANY($1)")
                .bind(&ids[..])
                .fetch_all(&self.pool)
                .await?;
            authors.extend(rows.into_iter().map(|Json(a)| (a.id, a)));
        }

        Ok(blogs
            .into_iter()
            .map(|blog| {
                let author = blog.author.and_then(|id| authors.get(&id).cloned());
                blog.with_author(author)
            })
            .collect())
    }

    async fn save(&self, blog: &Blog) -> Result<Blog, StoreError> {
        let Json(saved) = sqlx::query_scalar::<_, Json<Blog>>(
            "INSERT INTO blogs (id, doc, created_at) VALUES ($1, $2, $3) ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc RETURNING doc",
        )
        .bind(blog.id)
        .bind(Json(blog))
        .bind(blog.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[async_trait]
impl AuthorStore for PgStore {
    async fn insert_author(&self, author: &Author) -> Result<Author, StoreError> {
        let Json(saved) = sqlx::query_scalar::<_, Json<Author>>("INSERT INTO authors (id, doc) VALUES ($1, $2) RETURNING doc")
            .bind(author.id)
            .bind(Json(author))
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn find_author(&self, id: Uuid) -> Result<Option<Author>, StoreError> {
        let doc = sqlx::query_scalar::<_, Json<Author>>("SELECT doc FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc.map(|Json(a)| a))
    }

    async fn list_authors(&self) -> Result<Vec<Author>, StoreError> {
        let docs = sqlx::query_scalar::<_, Json<Author>>("SELECT doc FROM authors ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(docs.into_iter().map(|Json(a)| a).collect())
    }
}
