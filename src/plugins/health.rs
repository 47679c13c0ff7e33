use crate::kernel::Plugin;
use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    store: &'static str,
}

/// Name of the store backend, as carried in the request extensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreName(pub &'static str);

/// Liveness plus the name of the store backend the blog routes are using.
pub struct HealthPlugin {
    store: &'static str,
}

impl HealthPlugin {
    pub fn new(store: &'static str) -> Self {
        Self { store }
    }
}

async fn health_handler(Extension(StoreName(store)): Extension<StoreName>) -> Json<Health> {
    Json(Health { status: "ok", store })
}

#[async_trait::async_trait]
impl Plugin for HealthPlugin {
    async fn router(&self) -> Router {
        Router::new().route("/", get(health_handler)).layer(Extension(StoreName(self.store)))
    }

    fn name(&self) -> &'static str {
        "health"
    }

    async fn on_start(&self) {
        tracing::info!(store = self.store, "health plugin started");
    }
}
