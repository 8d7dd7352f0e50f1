//! Connection dialog
//!
//! A modal form for the database connection: host, port, username, password
//! and database. The form is validated on submit and the error shown inline,
//! so an invalid host never reaches the network.

use crate::config::connections::{ConnectionConfig, DEFAULT_PORT, SslMode};
use crate::ui::ComponentAction;
use crate::ui::input::{TextInput, visible_slice};
use crate::ui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Preferred popup size
pub const DIALOG_WIDTH: u16 = 60;
pub const DIALOG_HEIGHT: u16 = 13;

const LABEL_WIDTH: usize = 12;

/// Actions returned by the dialog to the parent
#[derive(Debug)]
pub enum DialogAction {
    /// User submitted a valid connection
    Connect(ConnectionConfig),
    /// User dismissed the dialog (Esc)
    Dismissed,
    /// Key was consumed by the dialog (no further handling needed)
    Consumed,
}

/// Form fields in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Host,
    Port,
    Username,
    Password,
    Database,
}

impl Field {
    const ALL: [Field; 5] = [
        Field::Host,
        Field::Port,
        Field::Username,
        Field::Password,
        Field::Database,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::Host => "Host",
            Field::Port => "Port",
            Field::Username => "Username",
            Field::Password => "Password",
            Field::Database => "Database",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Connection dialog state
pub struct ConnectionDialog {
    visible: bool,
    inputs: [TextInput; 5],
    focus: Field,
    ssl_mode: SslMode,
    error: Option<String>,
}

impl ConnectionDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            inputs: [
                TextInput::with_value("localhost"),
                TextInput::with_value(&DEFAULT_PORT.to_string()),
                TextInput::with_value("postgres"),
                TextInput::new().masked(),
                TextInput::with_value("product_db"),
            ],
            focus: Field::Host,
            ssl_mode: SslMode::default(),
            error: None,
        }
    }

    /// Prefill the form from an existing config (the password stays masked)
    pub fn prefill(&mut self, config: &ConnectionConfig) {
        self.input_mut(Field::Host).set_value(&config.host);
        self.input_mut(Field::Port)
            .set_value(&config.port.to_string());
        self.input_mut(Field::Username).set_value(&config.username);
        self.input_mut(Field::Database).set_value(&config.database);
        if let Some(ref pw) = config.password {
            self.input_mut(Field::Password).set_value(pw);
        }
        self.ssl_mode = config.ssl_mode;
    }

    /// Show the dialog with focus on the first field
    pub fn show(&mut self) {
        self.visible = true;
        self.focus = Field::Host;
        self.error = None;
    }

    /// Hide the dialog, keeping field values for next time
    pub fn hide(&mut self) {
        self.visible = false;
        self.error = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn input(&self, field: Field) -> &TextInput {
        &self.inputs[field.index()]
    }

    fn input_mut(&mut self, field: Field) -> &mut TextInput {
        &mut self.inputs[field.index()]
    }

    /// Handle a key event, returning a DialogAction
    pub fn handle_key(&mut self, key: KeyEvent) -> DialogAction {
        match key.code {
            KeyCode::Esc => return DialogAction::Dismissed,
            KeyCode::Tab | KeyCode::Down if key.modifiers == KeyModifiers::NONE => {
                self.focus = self.focus.next();
                return DialogAction::Consumed;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                return DialogAction::Consumed;
            }
            _ => {}
        }

        let focus = self.focus;
        match self.input_mut(focus).handle_key(key) {
            ComponentAction::Submit(_) => self.submit(),
            ComponentAction::Consumed => {
                self.error = None;
                DialogAction::Consumed
            }
            ComponentAction::Ignored => DialogAction::Consumed,
        }
    }

    /// Insert pasted text into the focused field
    pub fn paste(&mut self, text: &str) {
        let focus = self.focus;
        self.input_mut(focus).insert_text(text);
        self.error = None;
    }

    fn submit(&mut self) -> DialogAction {
        let result = ConnectionConfig::from_fields(
            self.input(Field::Host).value(),
            self.input(Field::Port).value(),
            self.input(Field::Username).value(),
            self.input(Field::Password).value(),
            self.input(Field::Database).value(),
        );
        match result {
            Ok(mut config) => {
                config.ssl_mode = self.ssl_mode;
                DialogAction::Connect(config)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                DialogAction::Consumed
            }
        }
    }

    /// Render the dialog as a bordered popup over `area`
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Connect to Database ")
            .border_style(theme.dialog_border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height < 6 || inner.width < 20 {
            return;
        }

        let x = inner.x + 1;
        let width = inner.width.saturating_sub(2);
        let input_width = (width as usize).saturating_sub(LABEL_WIDTH + 2);
        let mut y = inner.y;

        for field in Field::ALL {
            let input = self.input(field);
            let focused = field == self.focus;
            let style = if focused {
                theme.dialog_input_focused
            } else {
                theme.dialog_input
            };
            let marker = if focused { "\u{25b8} " } else { "  " };
            let label = format!("{}{:<width$}", marker, field.label(), width = LABEL_WIDTH);

            let visible = visible_slice(&input.display_text(), input.display_cursor(), input_width);
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(label, theme.dialog_label),
                    Span::styled(visible.text, style),
                ])),
                Rect::new(x, y, width, 1),
            );
            if focused {
                let cursor_x = x + (LABEL_WIDTH + 2) as u16 + visible.cursor_offset as u16;
                frame.set_cursor_position((cursor_x.min(x + width.saturating_sub(1)), y));
            }
            y += 1;
        }

        y += 1;
        if let Some(ref err) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {}", err), theme.dialog_warning))
                    .wrap(ratatui::widgets::Wrap { trim: true }),
                Rect::new(x, y, width, 2.min(inner.bottom().saturating_sub(y))),
            );
        }

        let hint_y = inner.bottom().saturating_sub(1);
        if hint_y > y {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  Enter=connect  Tab=next field  Esc=cancel",
                    theme.dialog_hint,
                )),
                Rect::new(x, hint_y, width, 1),
            );
        }
    }
}

impl Default for ConnectionDialog {
    fn default() -> Self {
        Self::new()
    }
}
