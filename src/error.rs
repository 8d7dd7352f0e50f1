//! Error types for brandscout
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors with clear error chains.

use std::io;
use std::time::Duration;

/// Main error type for the brandscout application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scraping errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Language model errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Session precondition errors
    #[error("{0}")]
    Session(#[from] SessionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Command parsing errors
    #[error("Command error: {0}")]
    Command(#[from] CommandError),
}

/// Database operation errors
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Failed to establish connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Schema introspection failed
    #[error("Schema loading failed: {0}")]
    SchemaLoadFailed(String),

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,
}

/// Scraping proxy request errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No API key configured for the scraping proxy
    #[error("No scraping proxy API key configured (set SCRAPER_API_KEY)")]
    MissingApiKey,

    /// Request could not be sent or the body could not be read
    #[error("Request failed: {0}")]
    Request(String),

    /// Proxy answered with a non-success status
    #[error("Proxy returned HTTP {0}")]
    Status(u16),
}

/// Language model errors
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Model endpoint could not be reached
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    /// No answer within the configured timeout
    #[error("Model unavailable: no answer within {0:?}")]
    Timeout(Duration),

    /// Endpoint answered but not with a usable completion
    #[error("Unexpected model response: {0}")]
    BadResponse(String),
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Home directory not found
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Config file not found
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Host field holds a URL or credentials instead of a bare host
    #[error(
        "Invalid host '{0}'! Please enter just `localhost` or a valid IP address (e.g., 127.0.0.1)."
    )]
    InvalidHost(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Preconditions the session enforces before dispatching work
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Please connect to the database first.")]
    NotConnected,

    #[error("Please fetch product data first.")]
    NoData,

    #[error("A fetch is already running.")]
    CycleInProgress,

    #[error("Still waiting for the previous answer.")]
    QuestionPending,

    #[error("Wait for the running fetch or question to finish before reconnecting.")]
    Busy,
}

/// Failure of a fetch → rank → store cycle
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    /// Nothing usable came back from the marketplace
    #[error("No brands found or an error occurred during the fetch.")]
    NoProducts(#[source] Option<FetchError>),

    /// Persisting the ranked products failed; schema refresh was skipped
    #[error("Failed to store data in database")]
    StoreFailed(#[source] DbError),
}

/// Command parsing errors
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Unknown command
    #[error("Unknown command: {0}")]
    Unknown(String),
}

/// Specialized Result type for brandscout operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Specialized Result type for database operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized Result type for scraping operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Specialized Result type for model calls
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Specialized Result type for command operations
pub type CommandResult<T> = std::result::Result<T, CommandError>;
