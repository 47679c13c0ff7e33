use axum::{routing::get, routing::post, Extension, Router};

use crate::kernel::Plugin;
use crate::plugins::blogs::handlers::*;
use crate::plugins::blogs::service::BlogResourceHandler;
use crate::store::DynBlogStore;

pub struct BlogPlugin {
    handler: BlogResourceHandler,
}

impl BlogPlugin {
    pub fn new(store: DynBlogStore) -> Self {
        let span = tracing::info_span!("blogs", store = store.backend());
        Self { handler: BlogResourceHandler::new(store, span) }
    }
}

#[async_trait::async_trait]
impl Plugin for BlogPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_blog).get(list_blogs))
            .route("/query", post(query_blogs))
            .route("/:id", get(get_blog).patch(update_blog).put(update_blog).delete(delete_blog))
            .layer(Extension(self.handler.clone()))
    }

    fn name(&self) -> &'static str {
        "blogs"
    }
}
