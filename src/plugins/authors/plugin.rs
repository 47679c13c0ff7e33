use axum::{routing::get, routing::post, Extension, Router};

use crate::kernel::Plugin;
use crate::plugins::authors::handlers::{create_author, get_author, list_authors};
use crate::store::DynAuthorStore;

pub struct AuthorsPlugin {
    store: DynAuthorStore,
}

impl AuthorsPlugin {
    pub fn new(store: DynAuthorStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Plugin for AuthorsPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_author).get(list_authors))
            .route("/:id", get(get_author))
            .layer(Extension(self.store.clone()))
    }

    fn name(&self) -> &'static str {
        "authors"
    }
}
