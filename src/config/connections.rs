//! Connection configuration
//!
//! Holds the database connection parameters for the current session. The
//! config lives in memory only; nothing here is written to disk.

use crate::error::{ConfigError, ConfigResult};

/// Default PostgreSQL port
pub const DEFAULT_PORT: u16 = 5432;

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Database host (bare hostname or IP)
    pub host: String,

    /// Database port
    pub port: u16,

    /// Database name
    pub database: String,

    /// Username
    pub username: String,

    /// Password
    pub password: Option<String>,

    /// SSL mode
    pub ssl_mode: SslMode,
}

/// SSL connection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SslMode {
    Disable,
    #[default]
    Prefer,
    Require,
}

impl SslMode {
    fn as_str(self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
        }
    }
}

impl ConnectionConfig {
    /// Build a config from raw form fields, validating before any use.
    ///
    /// An empty password is treated as no password.
    pub fn from_fields(
        host: &str,
        port: &str,
        username: &str,
        password: &str,
        database: &str,
    ) -> ConfigResult<Self> {
        let port = port.trim();
        let port = if port.is_empty() {
            DEFAULT_PORT
        } else {
            port.parse::<u16>()
                .map_err(|_| ConfigError::Invalid(format!("Invalid port: {}", port)))?
        };

        let config = Self {
            host: host.trim().to_string(),
            port,
            database: database.trim().to_string(),
            username: username.trim().to_string(),
            password: if password.is_empty() {
                None
            } else {
                Some(password.to_string())
            },
            ssl_mode: SslMode::Prefer,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that must never reach the network.
    ///
    /// A host containing `@` is almost always a pasted URL or `user@host`
    /// and is refused outright.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.host.contains('@') {
            return Err(ConfigError::InvalidHost(self.host.clone()));
        }
        if self.host.is_empty() {
            return Err(ConfigError::Invalid("Host is required".into()));
        }
        if self.database.is_empty() {
            return Err(ConfigError::Invalid("Database is required".into()));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Invalid("Username is required".into()));
        }
        Ok(())
    }

    /// Short label for the status bar, e.g. `product_db@localhost`
    pub fn display_name(&self) -> String {
        format!("{}@{}", self.database, self.host)
    }

    /// Build a PostgreSQL connection string (without password)
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={}",
            self.host, self.port, self.database, self.username
        )
    }

    /// Build a full connection string including password
    pub fn connection_string_with_password(&self) -> String {
        let with_ssl = format!(
            "{} sslmode={} connect_timeout=10",
            self.connection_string(),
            self.ssl_mode.as_str()
        );
        if let Some(ref pw) = self.password {
            format!("{} password={}", with_ssl, quote_conn_value(pw))
        } else {
            with_ssl
        }
    }
}

/// Quote a libpq key/value when it contains spaces or quotes
fn quote_conn_value(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '\'', '\\']) {
        let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
        format!("'{}'", escaped)
    } else {
        value.to_string()
    }
}
