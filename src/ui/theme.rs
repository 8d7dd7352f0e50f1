//! UI theme and styling
//!
//! Defines colors, styles, and visual appearance for all UI components.

use ratatui::style::{Color, Modifier, Style};

/// Application theme
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_focused: Style,
    pub border_unfocused: Style,

    // Input lines
    pub input_prompt: Style,
    pub input_text: Style,
    pub input_placeholder: Style,

    // Product cards
    pub card_title: Style,
    pub card_price: Style,
    pub card_stars: Style,
    pub card_muted: Style,

    // Rating chart
    pub chart_bar: Style,
    pub chart_value: Style,

    // Verification checks
    pub check_pass: Style,
    pub check_fail: Style,
    pub check_label: Style,
    pub link: Style,

    // Answer panel
    pub answer_question: Style,
    pub answer_text: Style,

    // Connection dialog
    pub dialog_border: Style,
    pub dialog_label: Style,
    pub dialog_input: Style,
    pub dialog_input_focused: Style,
    pub dialog_hint: Style,
    pub dialog_warning: Style,

    // Status messages
    pub status_success: Style,
    pub status_error: Style,
    pub status_info: Style,
    pub status_warning: Style,
    pub status_hint: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // Borders
            border_focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border_unfocused: Style::default().fg(Color::DarkGray),

            // Input lines
            input_prompt: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            input_text: Style::default().fg(Color::White),
            input_placeholder: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            // Product cards
            card_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            card_price: Style::default().fg(Color::Green),
            card_stars: Style::default().fg(Color::Yellow),
            card_muted: Style::default().fg(Color::Gray),

            // Rating chart
            chart_bar: Style::default().fg(Color::Cyan),
            chart_value: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            // Verification checks
            check_pass: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            check_fail: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            check_label: Style::default().fg(Color::Gray),
            link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            // Answer panel
            answer_question: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            answer_text: Style::default().fg(Color::White),

            // Connection dialog
            dialog_border: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            dialog_label: Style::default().fg(Color::Gray),
            dialog_input: Style::default().fg(Color::White),
            dialog_input_focused: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            dialog_hint: Style::default().fg(Color::DarkGray),
            dialog_warning: Style::default().fg(Color::Yellow),

            // Status messages
            status_success: Style::default().fg(Color::Green),
            status_error: Style::default().fg(Color::Red),
            status_info: Style::default().fg(Color::Blue),
            status_warning: Style::default().fg(Color::Yellow),
            status_hint: Style::default().fg(Color::DarkGray),
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Get border style based on focus
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.border_unfocused
        }
    }

    /// PASS/FAIL style
    pub fn check_style(&self, pass: bool) -> Style {
        if pass { self.check_pass } else { self.check_fail }
    }
}
