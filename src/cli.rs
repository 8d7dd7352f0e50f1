//! Command-line arguments

use crate::config::connections::{ConnectionConfig, DEFAULT_PORT, SslMode};
use crate::error::ConfigResult;
use clap::Parser;
use std::path::PathBuf;

/// Environment variable holding the database password
pub const PASSWORD_ENV: &str = "BRANDSCOUT_DB_PASSWORD";

#[derive(Debug, Parser)]
#[command(
    name = "brandscout",
    version,
    about = "Scrape top-rated listings into PostgreSQL and ask a local LLM about them"
)]
pub struct Cli {
    /// Database host; when given, connect at startup instead of showing the dialog
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long, short = 'p', default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, short = 'U', default_value = "postgres")]
    pub username: String,

    #[arg(long, short = 'd', default_value = "product_db")]
    pub database: String,

    /// Database password
    #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, value_enum, default_value_t = SslMode::Prefer)]
    pub ssl_mode: SslMode,

    /// Settings file (default: ~/.brandscout/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the model name from the settings file
    #[arg(long)]
    pub model: Option<String>,
}

impl Cli {
    /// The startup connection, if a host was given
    pub fn connection_config(&self) -> ConfigResult<Option<ConnectionConfig>> {
        let Some(ref host) = self.host else {
            return Ok(None);
        };
        let config = ConnectionConfig {
            host: host.trim().to_string(),
            port: self.port,
            database: self.database.clone(),
            username: self.username.clone(),
            password: self.password.clone().filter(|p| !p.is_empty()),
            ssl_mode: self.ssl_mode,
        };
        config.validate()?;
        Ok(Some(config))
    }
}
