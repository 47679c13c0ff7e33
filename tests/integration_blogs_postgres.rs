mod common;
use blog_api_kernel::plugins::authors::models::Author;
use blog_api_kernel::plugins::blogs::models::{Blog, BlogCreate, BlogFilter};
use blog_api_kernel::store::{AuthorStore, BlogStore, InMemoryStore, PgStore};
use common::{create_test_db_and_pool, pg_stores, spawn_app, test_database_url};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn pg_store_round_trips_documents() -> anyhow::Result<()> {
    let test_db = test_database_url()?;
    let (pool, _guard) = create_test_db_and_pool(&test_db).await?;
    let store = PgStore::new(pool);

    let author = store.insert_author(&Author::new(json!({ "name": "Ada" }).as_object().cloned().unwrap())).await?;
    let blog = Blog::new(BlogCreate { author: Some(author.id), title: Some("pg".into()), ..Default::default() }, chrono::Utc::now());
    let saved = store.save(&blog).await?;
    assert_eq!(saved.id, blog.id);

    let found = store.find_by_id(blog.id).await?.expect("saved blog");
    assert_eq!(found.title.as_deref(), Some("pg"));

    let populated = store.resolve_authors(vec![found.clone()]).await?;
    assert_eq!(populated[0].author.as_ref().map(|a| a.id), Some(author.id));

    let hit = store.find_matching(&BlogFilter::try_from(json!({ "title": "pg" })).unwrap()).await?;
    assert_eq!(hit.len(), 1);
    let miss = store.find_matching(&BlogFilter::try_from(json!({ "title": "other" })).unwrap()).await?;
    assert!(miss.is_empty());

    assert!(store.delete_by_id(blog.id).await?);
    assert!(!store.delete_by_id(blog.id).await?);
    assert!(store.find_by_id(blog.id).await?.is_none());
    Ok(())
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn blog_crud_against_postgres() -> anyhow::Result<()> {
    let test_db = test_database_url()?;
    let (pool, _guard) = create_test_db_and_pool(&test_db).await?;
    let (base, server_handle) = spawn_app(pg_stores(pool)).await?;
    let client = reqwest::Client::new();

    let created = client.post(format!("{}/blogs", base)).json(&json!({ "title": "Hello", "content": "c" })).send().await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = created.json().await?;
    let id = created["blog"]["_id"].as_str().unwrap().to_string();

    let all: Value = client.get(format!("{}/blogs", base)).send().await?.json().await?;
    let queried: Value = client.post(format!("{}/blogs/query", base)).json(&json!({})).send().await?.json().await?;
    assert_eq!(all, queried);
    assert_eq!(all["count"], json!(1));

    let upd = client.patch(format!("{}/blogs/{}", base, id)).json(&json!({ "title": "X" })).send().await?;
    assert_eq!(upd.status(), StatusCode::CREATED);
    let read: Value = client.get(format!("{}/blogs/{}", base, id)).send().await?.json().await?;
    assert_eq!(read["blog"]["title"], json!("X"));
    assert_eq!(read["blog"]["content"], json!("c"));

    let del = client.delete(format!("{}/blogs/{}", base, id)).send().await?;
    assert_eq!(del.status(), StatusCode::CREATED);
    let gone = client.get(format!("{}/blogs/{}", base, id)).send().await?;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    server_handle.abort();
    let _ = server_handle.await;
    Ok(())
}

async fn matching_ids(store: &dyn BlogStore, filter: Value) -> anyhow::Result<Vec<uuid::Uuid>> {
    let filter = BlogFilter::try_from(filter).map_err(anyhow::Error::msg)?;
    let mut ids: Vec<_> = store.find_matching(&filter).await?.into_iter().map(|b| b.id).collect();
    ids.sort();
    Ok(ids)
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn pg_filters_agree_with_memory_store() -> anyhow::Result<()> {
    let test_db = test_database_url()?;
    let (pool, _guard) = create_test_db_and_pool(&test_db).await?;
    let pg = PgStore::new(pool);
    let memory = InMemoryStore::new();

    let now = chrono::Utc::now();
    let docs = [
        BlogCreate { title: Some("Hello".into()), headline: Some("first".into()), ..Default::default() },
        BlogCreate { title: Some("Hello".into()), ..Default::default() },
        BlogCreate { title: Some("Other".into()), ..Default::default() },
    ];
    for input in docs {
        let blog = Blog::new(input, now);
        pg.save(&blog).await?;
        memory.save(&blog).await?;
    }

    for filter in [
        json!({ "title": "Hello" }),
        json!({ "headline": null }),
        json!({ "title": "Hello", "headline": null }),
        json!({ "title": "missing" }),
        json!({}),
    ] {
        let from_pg = matching_ids(&pg, filter.clone()).await?;
        let from_memory = matching_ids(&memory, filter.clone()).await?;
        assert_eq!(from_pg, from_memory, "filter {}", filter);
    }

    assert_eq!(matching_ids(&pg, json!({ "title": "Hello" })).await?.len(), 2);
    assert_eq!(matching_ids(&pg, json!({ "headline": null })).await?.len(), 2);
    Ok(())
}
