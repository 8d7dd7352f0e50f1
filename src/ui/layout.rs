//! Panel layout management
//!
//! Handles the arrangement of panels and terminal screen layout.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Computed areas for each panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub search: Rect,
    pub cards: Rect,
    pub chart: Rect,
    pub checks: Rect,
    pub question: Rect,
    pub answer: Rect,
    pub status_bar: Rect,
}

/// Calculate panel layout for the main screen
///
/// Top to bottom: search line, product cards, chart beside checks,
/// question line, answer, one-row status bar.
pub fn calculate_layout(area: Rect) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(7),
            Constraint::Length(12),
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(area);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);

    AppLayout {
        search: rows[0],
        cards: rows[1],
        chart: middle[0],
        checks: middle[1],
        question: rows[3],
        answer: rows[4],
        status_bar: rows[5],
    }
}

/// Center a popup of at most `width` x `height` inside `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
