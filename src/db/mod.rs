//! Database abstraction layer
//!
//! This module provides a trait-based abstraction over the product store,
//! allowing the pipeline to be tested with in-memory implementations.

pub mod postgres;
pub mod provider;
pub mod schema;
pub mod types;

// Re-export main types
pub use postgres::PostgresStore;
pub use provider::{ProductStore, TABLE_NAME};
pub use schema::{Column, SchemaTree, Table};
pub use types::DataType;
