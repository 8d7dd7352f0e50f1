//! Common test utilities and helpers
//!
//! In-memory stand-ins for the product source, store and language model, so
//! the pipeline can be exercised without a network or a database.

#![allow(dead_code)]

use async_trait::async_trait;
use brandscout::config::{ConnectionConfig, SslMode};
use brandscout::db::{Column, DataType, ProductStore, SchemaTree, TABLE_NAME, Table};
use brandscout::error::{DbError, DbResult, FetchError, FetchResult, ModelResult};
use brandscout::llm::LanguageModel;
use brandscout::scrape::{ProductRecord, ProductSource, StoredRow};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Create a test connection configuration
pub fn test_connection_config() -> ConnectionConfig {
    ConnectionConfig {
        host: "localhost".to_string(),
        port: 5432,
        database: "product_db".to_string(),
        username: "test_user".to_string(),
        password: Some("test_password".to_string()),
        ssl_mode: SslMode::Disable,
    }
}

pub fn product(name: &str, rating: f64) -> ProductRecord {
    ProductRecord {
        name: name.to_string(),
        price: "\u{20b9}9,999".to_string(),
        rating,
        reviews: 100,
    }
}

/// Seven listings whose ratings exercise the tie rule
pub fn sample_products() -> Vec<ProductRecord> {
    [3.0, 4.8, 4.8, 2.1, 5.0, 4.0, 1.5]
        .iter()
        .enumerate()
        .map(|(i, r)| product(&format!("Product {}", i), *r))
        .collect()
}

/// Product source returning a fixed result
pub struct FakeSource {
    result: Mutex<Option<FetchResult<Vec<ProductRecord>>>>,
    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn returning(products: Vec<ProductRecord>) -> Self {
        Self {
            result: Mutex::new(Some(Ok(products))),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            result: Mutex::new(Some(Err(error))),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ProductSource for FakeSource {
    async fn fetch(&self, _query: &str) -> FetchResult<Vec<ProductRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// In-memory product store with failure switches
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<StoredRow>>,
    next_id: AtomicUsize,
    pub fail_replace: bool,
    pub fail_read_back: bool,
    pub table_info_calls: AtomicUsize,
    pub replace_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose `replace_all` always fails
    pub fn failing_replace() -> Self {
        Self {
            fail_replace: true,
            ..Self::default()
        }
    }

    /// Store whose read-back queries always fail
    pub fn failing_read_back() -> Self {
        Self {
            fail_read_back: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<StoredRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn ensure_schema(&self, _config: &ConnectionConfig) -> DbResult<()> {
        Ok(())
    }

    async fn replace_all(
        &self,
        _config: &ConnectionConfig,
        records: &[ProductRecord],
    ) -> DbResult<usize> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_replace {
            return Err(DbError::ConnectionFailed("connection refused".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        rows.clear();
        for r in records {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
            rows.push(StoredRow {
                id,
                name: r.name.clone(),
                price: r.price.clone(),
                rating: r.rating,
                reviews: r.reviews,
            });
        }
        Ok(records.len())
    }

    async fn count_rows(&self, _config: &ConnectionConfig) -> DbResult<i64> {
        if self.fail_read_back {
            return Err(DbError::Timeout);
        }
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn top_rated_row(&self, _config: &ConnectionConfig) -> DbResult<Option<StoredRow>> {
        if self.fail_read_back {
            return Err(DbError::Timeout);
        }
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .fold(None::<&StoredRow>, |best, r| match best {
                Some(b) if b.rating > r.rating || (b.rating == r.rating && b.id < r.id) => Some(b),
                _ => Some(r),
            })
            .cloned())
    }

    async fn table_info(&self, _config: &ConnectionConfig) -> DbResult<SchemaTree> {
        self.table_info_calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(SchemaTree {
            tables: vec![Table {
                name: TABLE_NAME.to_string(),
                columns: vec![
                    Column {
                        name: "id".to_string(),
                        data_type: DataType::Integer,
                        nullable: false,
                        is_primary_key: true,
                    },
                    Column {
                        name: "name".to_string(),
                        data_type: DataType::Varchar(Some(255)),
                        nullable: true,
                        is_primary_key: false,
                    },
                    Column {
                        name: "rating".to_string(),
                        data_type: DataType::Double,
                        nullable: true,
                        is_primary_key: false,
                    },
                ],
                sample_rows: rows
                    .iter()
                    .take(3)
                    .map(|r| {
                        vec![
                            Some(r.id.to_string()),
                            Some(r.name.clone()),
                            Some(r.rating.to_string()),
                        ]
                    })
                    .collect(),
            }],
        })
    }
}

/// Model that echoes the question line of the prompt
pub struct EchoModel;

#[async_trait]
impl LanguageModel for EchoModel {
    async fn complete(&self, prompt: &str) -> ModelResult<String> {
        let question = prompt
            .lines()
            .find_map(|l| l.strip_prefix("Question: "))
            .unwrap_or_default();
        Ok(format!("You asked: {}", question))
    }
}
