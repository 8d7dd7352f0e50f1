//! Integration tests for PostgresStore
//!
//! These tests require the test PostgreSQL database to be running.
//! Start it with: docker-compose -f docker-compose.test.yml up -d
//!
//! Every test that touches the products table runs inside one test function,
//! since the table is shared and tests run in parallel.

use crate::common::{product, sample_products};
use brandscout::config::ConnectionConfig;
use brandscout::config::connections::SslMode;
use brandscout::db::{PostgresStore, ProductStore, TABLE_NAME};
use brandscout::error::DbError;
use brandscout::scrape::{TOP_N, rank_top};

/// Get test database connection config
fn test_config() -> ConnectionConfig {
    ConnectionConfig {
        host: std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: std::env::var("TEST_DB_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5433),
        database: std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "test_db".to_string()),
        username: std::env::var("TEST_DB_USER").unwrap_or_else(|_| "test_user".to_string()),
        password: Some(
            std::env::var("TEST_DB_PASSWORD").unwrap_or_else(|_| "test_password".to_string()),
        ),
        ssl_mode: SslMode::Disable,
    }
}

#[tokio::test]
async fn test_store_round_trip() {
    let config = test_config();
    let store = PostgresStore::new();

    if let Err(e) = store.ensure_schema(&config).await {
        eprintln!(
            "Skipping test: Database not available at {}:{} - {}",
            config.host, config.port, e
        );
        return;
    }
    // Idempotent
    store.ensure_schema(&config).await.unwrap();

    // replace_all then count_rows equals the records passed
    let ranked = rank_top(sample_products(), TOP_N);
    let inserted = store.replace_all(&config, &ranked).await.unwrap();
    assert_eq!(inserted, 5);
    assert_eq!(store.count_rows(&config).await.unwrap(), 5);

    // Top-rated row is the first stored maximum
    let top = store.top_rated_row(&config).await.unwrap().unwrap();
    assert_eq!(top.name, "Product 4");
    assert_eq!(top.rating, 5.0);
    assert_eq!(top.price, "\u{20b9}9,999");
    assert_eq!(top.reviews, 100);

    // Schema text describes the table and its current rows
    let tree = store.table_info(&config).await.unwrap();
    let table = tree.table(TABLE_NAME).expect("products table is listed");
    let columns: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["id", "name", "price", "rating", "reviews"]);
    assert!(table.columns[0].is_primary_key);
    assert_eq!(table.sample_rows.len(), 3);
    let text = tree.to_prompt_text();
    assert!(text.contains("CREATE TABLE \"TopBrands\""));
    assert!(text.contains("Product "));

    // A second replace leaves only the new rows
    store
        .replace_all(&config, &[product("Replacement", 3.9)])
        .await
        .unwrap();
    assert_eq!(store.count_rows(&config).await.unwrap(), 1);
    let top = store.top_rated_row(&config).await.unwrap().unwrap();
    assert_eq!(top.name, "Replacement");

    // Empty replace clears the table
    store.replace_all(&config, &[]).await.unwrap();
    assert_eq!(store.count_rows(&config).await.unwrap(), 0);
    assert!(store.top_rated_row(&config).await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_host_is_rejected_before_connecting() {
    let mut config = test_config();
    config.host = "user@host.com".to_string();
    let store = PostgresStore::new();

    let result = store.count_rows(&config).await;
    match result {
        Err(DbError::ConnectionFailed(msg)) => assert!(msg.contains("Invalid host")),
        other => panic!("Expected ConnectionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_database_fails_cleanly() {
    let mut config = test_config();
    config.host = "127.0.0.1".to_string();
    config.port = 9;
    let store = PostgresStore::new();

    let result = store.replace_all(&config, &[product("x", 4.0)]).await;
    assert!(matches!(
        result,
        Err(DbError::ConnectionFailed(_)) | Err(DbError::Timeout)
    ));
}
