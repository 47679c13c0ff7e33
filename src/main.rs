use std::sync::Arc;

use axum::Router;
use blog_api_kernel::config::{Config, StoreBackend};
use blog_api_kernel::kernel::{build_app, default_plugins, Plugin};
use blog_api_kernel::store::{PgStore, Stores};
use blog_api_kernel::{db, logging};
use dotenvy::dotenv;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // load environment before anything reads it
    dotenv().ok();
    let config = Config::from_env()?;
    logging::init(config.log_format);

    let stores = match config.store {
        StoreBackend::Postgres => {
            let pool = db::init_db(&config.database_url, config.db_max_connections).await?;
            Stores::shared(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store, data is lost on shutdown");
            Stores::in_memory()
        }
    };

    let plugins_vec: Vec<Box<dyn Plugin>> = default_plugins(&stores);
    let plugin_names: Vec<&'static str> = plugins_vec.iter().map(|p| p.name()).collect();
    tracing::info!("mounting plugins: {:?}", plugin_names);

    let app: Router = build_app(&plugins_vec).await;

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
            for p in plugins_vec.iter() {
                p.on_shutdown().await;
            }
        })
        .await?;

    Ok(())
}
