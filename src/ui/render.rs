//! Top-level render function
//!
//! Orchestrates rendering of all panels using the layout module.

use crate::app::{AnswerState, App, PanelFocus, StatusLevel};
use crate::ui::connection_dialog::{DIALOG_HEIGHT, DIALOG_WIDTH};
use crate::ui::input::{TextInput, visible_slice};
use crate::ui::layout::{calculate_layout, centered_rect};
use crate::ui::theme::Theme;
use crate::ui::{SPINNER, cards, chart, checks};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let layout = calculate_layout(frame.area());

    render_input(
        frame,
        layout.search,
        " Search ",
        "Product to search for, e.g. washing machine",
        &app.search_input,
        app.focus == PanelFocus::Search,
        theme,
    );

    let (cards_title, shown) = match app.last_report {
        Some(ref report) => (
            format!(" Top {} for '{}' ", report.products.len(), report.query),
            report.products.as_slice(),
        ),
        None => (" Top Brands ".to_string(), &[][..]),
    };
    cards::render(frame, layout.cards, shown, &cards_title, theme);
    chart::render(frame, layout.chart, shown, theme);
    checks::render(frame, layout.checks, app.last_report.as_ref(), theme);

    render_input(
        frame,
        layout.question,
        " Ask ",
        "Question about the stored products",
        &app.question_input,
        app.focus == PanelFocus::Question,
        theme,
    );
    render_answer(frame, layout.answer, app, theme);
    render_status_bar(frame, layout.status_bar, app, theme);

    if app.connection_dialog.is_visible() {
        let area = centered_rect(frame.area(), DIALOG_WIDTH, DIALOG_HEIGHT);
        app.connection_dialog.render(frame, area, theme);
    }
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    placeholder: &str,
    input: &TextInput,
    focused: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(theme.border_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let prompt = "> ";
    let width = (inner.width as usize).saturating_sub(prompt.len());
    if input.is_empty() && !focused {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(prompt, theme.input_prompt),
                Span::styled(placeholder.to_string(), theme.input_placeholder),
            ])),
            inner,
        );
        return;
    }

    let visible = visible_slice(&input.display_text(), input.display_cursor(), width);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(prompt, theme.input_prompt),
            Span::styled(visible.text, theme.input_text),
        ])),
        inner,
    );
    if focused && inner.width > 0 {
        let x = inner.x + prompt.len() as u16 + visible.cursor_offset as u16;
        frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn render_answer(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let title = if app.model_name.is_empty() {
        " Answer ".to_string()
    } else {
        format!(" Answer ({}) ", app.model_name)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(theme.border_unfocused);

    let lines = match app.answer {
        AnswerState::Empty => vec![Line::from(Span::styled(
            "Fetch products, then ask a question about them.",
            theme.input_placeholder,
        ))],
        AnswerState::Pending { ref question } => vec![
            Line::from(Span::styled(format!("Q: {}", question), theme.answer_question)),
            Line::from(Span::styled(
                format!("{} Thinking...", spinner(app)),
                theme.card_muted,
            )),
        ],
        AnswerState::Answered {
            ref question,
            ref text,
        } => {
            let mut lines = vec![Line::from(Span::styled(
                format!("Q: {}", question),
                theme.answer_question,
            ))];
            lines.extend(
                text.lines()
                    .map(|l| Line::from(Span::styled(l.to_string(), theme.answer_text))),
            );
            lines
        }
        AnswerState::Failed {
            ref question,
            ref error,
        } => vec![
            Line::from(Span::styled(format!("Q: {}", question), theme.answer_question)),
            Line::from(Span::styled(error.clone(), theme.status_error)),
        ],
    };

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn spinner(app: &App) -> &'static str {
    SPINNER[app.spinner_frame % SPINNER.len()]
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let conn_info = match app.session.connection() {
        Some(config) => format!("[{}] ", config.display_name()),
        None => "[disconnected] ".to_string(),
    };
    let busy = if app.session.cycle_running() {
        format!("{} fetching  ", spinner(app))
    } else {
        String::new()
    };

    let (text, style) = match app.status_message {
        Some(ref status) => {
            let style = match status.level {
                StatusLevel::Info => theme.status_info,
                StatusLevel::Success => theme.status_success,
                StatusLevel::Warning => theme.status_warning,
                StatusLevel::Error => theme.status_error,
            };
            (format!("{}{}{}", conn_info, busy, status.message), style)
        }
        None => (
            format!("{}{}| Ctrl+O to connect, Tab to switch input, Ctrl+Q to quit", conn_info, busy),
            theme.status_hint,
        ),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppEvent;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(100)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_empty_app() {
        let app = App::new();
        let screen = draw(&app);
        assert!(screen.contains("Search"));
        assert!(screen.contains("Ratings"));
        assert!(screen.contains("Checks"));
        assert!(screen.contains("[disconnected]"));
    }

    #[test]
    fn test_render_connection_dialog() {
        let mut app = App::new();
        app.show_connection_dialog();
        let screen = draw(&app);
        assert!(screen.contains("Connect to Database"));
        assert!(screen.contains("Host"));
        assert!(screen.contains("localhost"));
    }

    #[test]
    fn test_render_status_message() {
        let mut app = App::new();
        app.handle_event(AppEvent::Key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Enter,
            crossterm::event::KeyModifiers::NONE,
        )));
        let screen = draw(&app);
        assert!(screen.contains("Please connect to the database first."));
    }
}
