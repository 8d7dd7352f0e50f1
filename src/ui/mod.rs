//! Terminal UI components
//!
//! All UI widgets and rendering logic using ratatui.

pub mod cards;
pub mod chart;
pub mod checks;
pub mod connection_dialog;
pub mod input;
pub mod layout;
pub mod render;
pub mod theme;

/// Actions a component can return to signal intent to the parent.
/// Components never mutate siblings: they declare what should happen,
/// and the app decides how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentAction {
    /// Event consumed, no further action needed
    Consumed,
    /// Event not handled, parent should try
    Ignored,
    /// Input line submitted with Enter
    Submit(String),
}

/// Spinner frames shown while a fetch or question is in flight
pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
