//! Database schema introspection
//!
//! Structures describing the tables the store can see, and their rendering
//! into the schema text handed to the language model.

use crate::db::types::DataType;
use std::fmt::Write as _;

/// Sample rows included per table when describing it
pub const SAMPLE_ROWS: usize = 3;

/// Tables visible in the `public` schema
#[derive(Debug, Clone, Default)]
pub struct SchemaTree {
    pub tables: Vec<Table>,
}

/// A database table
#[derive(Debug, Clone)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Columns in this table
    pub columns: Vec<Column>,
    /// Up to [`SAMPLE_ROWS`] rows, every value rendered as text
    pub sample_rows: Vec<Vec<Option<String>>>,
}

/// A table column
#[derive(Debug, Clone)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    pub nullable: bool,
    pub is_primary_key: bool,
}

impl SchemaTree {
    /// Create a new empty schema tree
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Render as `CREATE TABLE` blocks followed by sample rows.
    pub fn to_prompt_text(&self) -> String {
        if self.tables.is_empty() {
            return "No tables found in database.".to_string();
        }
        self.tables
            .iter()
            .map(Table::to_prompt_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Table {
    fn to_prompt_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "CREATE TABLE \"{}\" (", self.name);

        let mut lines: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut line = format!(
                    "\t{} {}",
                    c.name,
                    c.data_type.display_name().to_uppercase()
                );
                if !c.nullable {
                    line.push_str(" NOT NULL");
                }
                line
            })
            .collect();

        let pk: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .collect();
        if !pk.is_empty() {
            lines.push(format!("\tPRIMARY KEY ({})", pk.join(", ")));
        }

        let _ = writeln!(out, "{}", lines.join(",\n"));
        out.push(')');

        let _ = write!(
            out,
            "\n\n/*\n{} rows from {} table:\n",
            self.sample_rows.len(),
            self.name
        );
        let header: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let _ = writeln!(out, "{}", header.join("\t"));
        for row in &self.sample_rows {
            let cells: Vec<&str> = row
                .iter()
                .map(|v| v.as_deref().unwrap_or("NULL"))
                .collect();
            let _ = writeln!(out, "{}", cells.join("\t"));
        }
        out.push_str("*/");
        out
    }
}
