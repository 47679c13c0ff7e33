#![allow(dead_code)]

use std::process::Command;
use std::sync::Arc;

use blog_api_kernel::db;
use blog_api_kernel::kernel::{build_app, default_plugins};
use blog_api_kernel::store::{PgStore, Stores};
use tokio::net::TcpListener;

pub struct TestDbGuard {
    maintenance_url: String,
    unique_db: String,
}

impl TestDbGuard {
    pub fn new(maintenance_url: String, unique_db: String) -> Self {
        Self { maintenance_url, unique_db }
    }
}

impl Drop for TestDbGuard {
    fn drop(&mut self) {
        let _ = Command::new("psql")
            .arg(&self.maintenance_url)
            .arg("-c")
            .arg(format!(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}' AND pid <> pg_backend_pid();",
                self.unique_db
            ))
            .status();
        let _ = Command::new("psql")
            .arg(&self.maintenance_url)
            .arg("-c")
            .arg(format!("DROP DATABASE IF EXISTS \"{}\"", self.unique_db))
            .status();
    }
}

/// `TEST_DATABASE_URL`. Postgres-backed tests are `#[ignore]`d, so reaching
/// this without it set is a setup error, not a skip.
pub fn test_database_url() -> anyhow::Result<String> {
    std::env::var("TEST_DATABASE_URL")
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("TEST_DATABASE_URL must be set to run ignored Postgres tests"))
}

/// Creates a throwaway database next to `test_db` and returns a migrated pool for it.
pub async fn create_test_db_and_pool(test_db: &str) -> anyhow::Result<(sqlx::PgPool, TestDbGuard)> {
    let mut maintenance_url = test_db.to_string();
    if let Some(idx) = maintenance_url.rfind('/') {
        maintenance_url.replace_range(idx + 1.., "postgres");
    }
    let base_db_name = test_db.rsplit('/').next().unwrap().split('?').next().unwrap();
    let unique_db = format!("{}_{}", base_db_name, uuid::Uuid::new_v4().simple());
    let mut unique_db_url = test_db.to_string();
    if let Some(idx) = unique_db_url.rfind('/') {
        unique_db_url.replace_range(idx + 1.., &unique_db);
    }
    let _ = Command::new("psql").arg(&maintenance_url).arg("-c").arg(format!("DROP DATABASE IF EXISTS \"{}\"", unique_db)).status();
    let _ = Command::new("psql").arg(&maintenance_url).arg("-c").arg(format!("CREATE DATABASE \"{}\"", unique_db)).status();
    let guard = TestDbGuard::new(maintenance_url, unique_db);
    let pool = db::init_db(&unique_db_url, 5).await?;
    Ok((pool, guard))
}

pub fn pg_stores(pool: sqlx::PgPool) -> Stores {
    Stores::shared(Arc::new(PgStore::new(pool)))
}

pub async fn spawn_app(stores: Stores) -> anyhow::Result<(String, tokio::task::JoinHandle<()>)> {
    let app = build_app(&default_plugins(&stores)).await;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });
    Ok((format!("http://{}", addr), server_handle))
}
