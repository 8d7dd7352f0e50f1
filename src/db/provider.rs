//! Product store trait
//!
//! Defines the interface the pipeline uses to persist and read back ranked
//! products. This abstraction allows for:
//! - Swapping the relational backend
//! - Easy testing with in-memory implementations
//! - Consistent error handling
//!
//! Every operation takes the session's connection config and opens its own
//! short-lived connection; nothing is pooled or held between calls.

use crate::config::ConnectionConfig;
use crate::db::schema::SchemaTree;
use crate::error::DbResult;
use crate::scrape::types::{ProductRecord, StoredRow};
use async_trait::async_trait;

/// Name of the fixed products table
pub const TABLE_NAME: &str = "TopBrands";

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Create the products table if it does not exist. Idempotent.
    ///
    /// # Errors
    /// Returns `DbError::ConnectionFailed` if connection cannot be established
    async fn ensure_schema(&self, config: &ConnectionConfig) -> DbResult<()>;

    /// Delete every stored row, then insert `records` in order.
    ///
    /// Returns the number of rows inserted. Any error aborts the remaining
    /// inserts and leaves the previous contents in place.
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` if a statement fails
    async fn replace_all(
        &self,
        config: &ConnectionConfig,
        records: &[ProductRecord],
    ) -> DbResult<usize>;

    /// Number of stored rows
    async fn count_rows(&self, config: &ConnectionConfig) -> DbResult<i64>;

    /// Highest-rated stored row, if any
    async fn top_rated_row(&self, config: &ConnectionConfig) -> DbResult<Option<StoredRow>>;

    /// Describe the tables in the database
    ///
    /// # Errors
    /// Returns `DbError::SchemaLoadFailed` if schema introspection fails
    async fn table_info(&self, config: &ConnectionConfig) -> DbResult<SchemaTree>;
}
