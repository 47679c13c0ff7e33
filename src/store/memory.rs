use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{AuthorStore, BlogStore, StoreError};
use crate::plugins::authors::models::Author;
use crate::plugins::blogs::models::{Blog, BlogFilter, PopulatedBlog};

/// Process-local document store. Lists come back in creation order.
#[derive(Default)]
pub struct InMemoryStore {
    blogs: RwLock<Docs<Blog>>,
    authors: RwLock<Docs<Author>>,
}

struct Docs<T> {
    by_id: HashMap<Uuid, T>,
    order: Vec<Uuid>,
}

impl<T> Default for Docs<T> {
    fn default() -> Self {
        Self { by_id: HashMap::new(), order: Vec::new() }
    }
}

impl<T: Clone> Docs<T> {
    fn upsert(&mut self, id: Uuid, doc: T) {
        if self.by_id.insert(id, doc).is_none() {
            self.order.push(id);
        }
    }

    fn remove(&mut self, id: &Uuid) -> bool {
        if self.by_id.remove(id).is_some() {
            self.order.retain(|o| o != id);
            true
        } else {
            false
        }
    }

    fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn author(&self, id: Option<Uuid>) -> Option<Author> {
        id.and_then(|id| self.authors.read().by_id.get(&id).cloned())
    }
}

#[async_trait]
impl BlogStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        Ok(self.blogs.read().by_id.get(&id).cloned())
    }

    async fn find_matching(&self, filter: &BlogFilter) -> Result<Vec<Blog>, StoreError> {
        if let Some(op) = filter.operators() {
            return Err(StoreError::InvalidFilter(format!("unsupported operator `{}`", op)));
        }
        let blogs = self.blogs.read();
        let mut out = Vec::new();
        for blog in blogs.iter() {
            if filter.is_empty() || filter.matches(&serde_json::to_value(blog)?) {
                out.push(blog.clone());
            }
        }
        Ok(out)
    }

    async fn resolve_author(&self, blog: Blog) -> Result<PopulatedBlog, StoreError> {
        let author = self.author(blog.author);
        Ok(blog.with_author(author))
    }

    async fn save(&self, blog: &Blog) -> Result<Blog, StoreError> {
        self.blogs.write().upsert(blog.id, blog.clone());
        Ok(blog.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.blogs.write().remove(&id))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl AuthorStore for InMemoryStore {
    async fn insert_author(&self, author: &Author) -> Result<Author, StoreError> {
        self.authors.write().upsert(author.id, author.clone());
        Ok(author.clone())
    }

    async fn find_author(&self, id: Uuid) -> Result<Option<Author>, StoreError> {
        Ok(self.authors.read().by_id.get(&id).cloned())
    }

    async fn list_authors(&self) -> Result<Vec<Author>, StoreError> {
        Ok(self.authors.read().iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::blogs::models::BlogCreate;
    use chrono::Utc;
    use serde_json::json;

    fn blog(title: &str, author: Option<Uuid>) -> Blog {
        Blog::new(BlogCreate { author, title: Some(title.into()), ..Default::default() }, Utc::now())
    }

    #[tokio::test]
    async fn save_find_delete_cycle() {
        let store = InMemoryStore::new();
        let b = blog("one", None);
        store.save(&b).await.unwrap();
        assert_eq!(store.find_by_id(b.id).await.unwrap(), Some(b.clone()));

        assert!(store.delete_by_id(b.id).await.unwrap());
        assert!(!store.delete_by_id(b.id).await.unwrap());
        assert_eq!(store.find_by_id(b.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_replaces_without_reordering() {
        let store = InMemoryStore::new();
        let mut first = blog("first", None);
        let second = blog("second", None);
        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();
        first.title = Some("first, edited".into());
        store.save(&first).await.unwrap();

        let all = store.find_matching(&BlogFilter::default()).await.unwrap();
        let titles: Vec<_> = all.iter().map(|b| b.title.clone().unwrap()).collect();
        assert_eq!(titles, vec!["first, edited", "second"]);
    }

    #[tokio::test]
    async fn filters_by_field_and_rejects_operators() {
        let store = InMemoryStore::new();
        store.save(&blog("a", None)).await.unwrap();
        store.save(&blog("b", None)).await.unwrap();

        let f = BlogFilter::try_from(json!({ "title": "b" })).unwrap();
        let found = store.find_matching(&f).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title.as_deref(), Some("b"));

        let f = BlogFilter::try_from(json!({ "$where": "1" })).unwrap();
        assert!(matches!(store.find_matching(&f).await, Err(StoreError::InvalidFilter(_))));
    }

    #[tokio::test]
    async fn resolves_known_and_dangling_authors() {
        let store = InMemoryStore::new();
        let author = Author::new(json!({ "name": "Ada" }).as_object().cloned().unwrap());
        store.insert_author(&author).await.unwrap();

        let populated = store.resolve_author(blog("x", Some(author.id))).await.unwrap();
        assert_eq!(populated.author, Some(author));

        let dangling = store.resolve_author(blog("y", Some(Uuid::new_v4()))).await.unwrap();
        assert_eq!(dangling.author, None);
    }
}
