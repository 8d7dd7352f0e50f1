//! brandscout - top-rated marketplace listings, stored and explained, from the terminal
//!
//! brandscout scrapes a marketplace search page through a scraping proxy,
//! keeps the five best-rated complete listings, replaces the contents of a
//! PostgreSQL table with them, and answers natural-language questions about
//! the stored data with a locally hosted language model.
//!
//! # Features
//!
//! - **Fetch**: one proxied request per search, parsed into product records
//! - **Rank**: stable sort by rating, top 5 kept
//! - **Store**: full replace of the `"TopBrands"` table, inside a transaction
//! - **Introspect**: schema text with sample rows, regenerated after each store
//! - **Ask**: schema + question prompt to an Ollama model, with a timeout
//! - **Verify**: field checks and a read-back comparison after each cycle
//!
//! # Architecture
//!
//! - [`config`]: Connection parameters and application settings
//! - [`scrape`]: Fetching, parsing and ranking listings
//! - [`db`]: Product storage and schema introspection
//! - [`llm`]: Language model client and prompt building
//! - [`verify`]: Post-cycle sanity checks
//! - [`pipeline`]: The fetch → store → introspect cycle and question answering
//! - [`session`]: Connection, schema generation and in-flight state
//! - [`app`]: Application state and event handling
//! - [`ui`]: Terminal user interface components
//! - [`commands`]: Slash command parsing
//! - [`cli`]: Command-line arguments
//! - [`error`]: Error types and result aliases
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use brandscout::config::{ConnectionConfig, Settings};
//! use brandscout::db::PostgresStore;
//! use brandscout::llm::OllamaClient;
//! use brandscout::pipeline::Pipeline;
//! use brandscout::scrape::ProxyFetcher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::default();
//! let pipeline = Pipeline::new(
//!     Arc::new(ProxyFetcher::new(settings.scraper.clone())?),
//!     Arc::new(PostgresStore::new()),
//!     Arc::new(OllamaClient::new(&settings.model)),
//!     &settings,
//! );
//!
//! let config = ConnectionConfig::from_fields("localhost", "5432", "postgres", "", "product_db")?;
//! pipeline.prime_schema(&config).await?;
//!
//! let report = pipeline.run_cycle(&config, "washing machine").await?;
//! for product in &report.products {
//!     println!("{} {} ({})", product.name, product.price, product.rating);
//! }
//!
//! if let Ok(ref schema) = report.schema {
//!     let answer = pipeline.answer("Which brand has the most reviews?", schema).await?;
//!     println!("{}", answer);
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod scrape;
pub mod session;
pub mod ui;
pub mod verify;

pub use error::{AppError, CommandError, ConfigError, DbError, Result};
