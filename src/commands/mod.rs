//! Slash commands
//!
//! Either input line accepts commands starting with `/`.

pub mod parser;

pub use parser::{Command, is_command, parse_command};
