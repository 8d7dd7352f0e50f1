//! Session context
//!
//! Everything the workflow remembers between operations: the connection
//! config, the current schema text, the last ranked products, and which
//! operations are in flight.
//!
//! Schema text is tied to a generation. Adopting a connection and each
//! successful store bump the generation, and schema text counts as current
//! only when it was produced for the current generation. Starting a fetch
//! clears it outright. Questions need a successful store since the last
//! connect, so the schema always describes the database that was written to.

use crate::config::ConnectionConfig;
use crate::error::{ConfigError, CycleError, SessionError};
use crate::pipeline::CycleReport;
use crate::scrape::ProductRecord;

/// Schema text and the generation it describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaText {
    pub text: String,
    pub generation: u64,
}

/// Why a connection config was not adopted
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Busy(#[from] SessionError),
}

#[derive(Debug, Default)]
pub struct Session {
    connection: Option<ConnectionConfig>,
    schema: Option<SchemaText>,
    /// Bumped on every adopted connection and every successful store
    generation: u64,
    /// Successful stores since the connection was adopted
    stores: u64,
    products: Vec<ProductRecord>,
    cycle_running: bool,
    question_pending: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a connection config after validating it.
    ///
    /// Refused while a fetch or a question is in flight. Adopting a config
    /// forgets the stored products and schema of the previous connection.
    /// Returns the generation to hand back with the primed schema.
    pub fn connect(&mut self, config: ConnectionConfig) -> Result<u64, ConnectError> {
        if self.cycle_running || self.question_pending {
            return Err(SessionError::Busy.into());
        }
        config.validate()?;
        self.connection = Some(config);
        self.schema = None;
        self.stores = 0;
        self.products.clear();
        self.generation += 1;
        Ok(self.generation)
    }

    pub fn connection(&self) -> Option<&ConnectionConfig> {
        self.connection.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Accept schema text produced for `generation`.
    ///
    /// Rejected (returns false) if a fetch is running or a store happened
    /// since the text was requested.
    pub fn apply_schema(&mut self, text: String, generation: u64) -> bool {
        if self.cycle_running || generation != self.generation {
            return false;
        }
        self.schema = Some(SchemaText { text, generation });
        true
    }

    /// Current schema text, if it describes the latest store
    pub fn schema_text(&self) -> Option<&str> {
        self.schema
            .as_ref()
            .filter(|s| s.generation == self.generation)
            .map(|s| s.text.as_str())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Successful stores since the current connection was adopted
    pub fn stores(&self) -> u64 {
        self.stores
    }

    /// Products from the last successful cycle
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn cycle_running(&self) -> bool {
        self.cycle_running
    }

    pub fn question_pending(&self) -> bool {
        self.question_pending
    }

    /// Start a fetch cycle: clears the schema text and returns the config to use
    pub fn begin_cycle(&mut self) -> Result<ConnectionConfig, SessionError> {
        let config = self
            .connection
            .clone()
            .ok_or(SessionError::NotConnected)?;
        if self.cycle_running {
            return Err(SessionError::CycleInProgress);
        }
        self.cycle_running = true;
        self.schema = None;
        Ok(config)
    }

    /// Record the outcome of a cycle started with [`Session::begin_cycle`]
    pub fn finish_cycle(&mut self, outcome: &Result<CycleReport, CycleError>) {
        self.cycle_running = false;
        // On failure the schema stays cleared until the next successful store
        if let Ok(report) = outcome {
            self.generation += 1;
            self.stores += 1;
            self.products = report.products.clone();
            self.schema = report.schema.as_ref().ok().map(|text| SchemaText {
                text: text.clone(),
                generation: self.generation,
            });
        }
    }

    /// Check preconditions for a question and return the schema text to use
    pub fn begin_question(&mut self) -> Result<String, SessionError> {
        if self.connection.is_none() {
            return Err(SessionError::NotConnected);
        }
        if self.question_pending {
            return Err(SessionError::QuestionPending);
        }
        if self.stores == 0 {
            return Err(SessionError::NoData);
        }
        let text = self.schema_text().ok_or(SessionError::NoData)?.to_string();
        self.question_pending = true;
        Ok(text)
    }

    pub fn finish_question(&mut self) {
        self.question_pending = false;
    }
}
