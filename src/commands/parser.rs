//! Command parsing
//!
//! Parses a slash-prefixed input line (e.g. `/connect`, `/quit`) into a
//! [`Command`].

use crate::error::{CommandError, CommandResult};

/// Commands that can be typed into either input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the connection dialog
    Connect,

    /// Clear the cards, checks and answer
    Clear,

    /// Show key bindings
    Help,

    /// Quit the application
    Quit,
}

/// Whether an input line is a command rather than a search or question
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with('/')
}

/// Parse a command string into a Command enum
pub fn parse_command(input: &str) -> CommandResult<Command> {
    let input = input.trim();
    let input = input.strip_prefix('/').unwrap_or(input);
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(first) = parts.first() else {
        return Err(CommandError::Unknown(String::new()));
    };

    match *first {
        "connect" | "c" => Ok(Command::Connect),
        "clear" | "cl" => Ok(Command::Clear),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        unknown => Err(CommandError::Unknown(unknown.to_string())),
    }
}
