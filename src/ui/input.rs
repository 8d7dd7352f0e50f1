//! Single-line text input
//!
//! Shared by the search bar, the question bar and the connection dialog
//! fields. Cursor positions are byte offsets kept on char boundaries.

use crate::ui::ComponentAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
    /// Render as `*` characters
    masked: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.len(),
            masked: false,
        }
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Take the current value, leaving the input empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn insert_text(&mut self, text: &str) {
        // Single line: pasted newlines become spaces
        let clean: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        self.value.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    /// Text as displayed (masked if needed)
    pub fn display_text(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Cursor position counted in characters of [`TextInput::display_text`]
    pub fn display_cursor(&self) -> usize {
        self.value[..self.cursor].chars().count()
    }

    /// Handle an editing key. Enter submits the current value.
    pub fn handle_key(&mut self, key: KeyEvent) -> ComponentAction {
        match key.code {
            KeyCode::Enter => return ComponentAction::Submit(self.value.clone()),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let prev = self.prev_boundary();
                    self.value.drain(prev..self.cursor);
                    self.cursor = prev;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.value.len() {
                    let next = self.next_boundary();
                    self.value.drain(self.cursor..next);
                }
            }
            KeyCode::Left => self.cursor = self.prev_boundary(),
            KeyCode::Right => self.cursor = self.next_boundary(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            _ => return ComponentAction::Ignored,
        }
        ComponentAction::Consumed
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.cursor
            + self.value[self.cursor..]
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(0)
    }
}

/// Helper for showing a visible slice of a string with cursor position
pub struct VisibleSlice {
    pub text: String,
    pub cursor_offset: usize,
}

/// Get the visible portion of a display string that fits within `width`
/// columns, keeping the cursor visible.
pub fn visible_slice(input: &str, cursor: usize, width: usize) -> VisibleSlice {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= width {
        return VisibleSlice {
            text: input.to_string(),
            cursor_offset: cursor,
        };
    }

    // Scroll to keep cursor visible
    let start = if cursor > width.saturating_sub(1) {
        cursor + 1 - width
    } else {
        0
    };
    let end = (start + width).min(chars.len());
    VisibleSlice {
        text: chars[start..end].iter().collect(),
        cursor_offset: cursor - start,
    }
}
