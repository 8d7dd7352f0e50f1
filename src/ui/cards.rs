//! Product cards
//!
//! One bordered card per ranked product, laid out side by side.

use crate::scrape::ProductRecord;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_truncate::UnicodeTruncateStr;
use unicode_width::UnicodeWidthStr;

/// Product names longer than this (in columns) are cut with `...`
pub const NAME_MAX_WIDTH: usize = 50;

/// Cut `name` to at most `max` display columns, ending in `...` when cut
pub fn truncate_name(name: &str, max: usize) -> String {
    if name.width() <= max {
        return name.to_string();
    }
    let (head, _) = name.unicode_truncate(max.saturating_sub(3));
    format!("{}...", head.trim_end())
}

/// Five-star strip for a rating, e.g. `★★★★☆`
pub fn star_bar(product: &ProductRecord) -> String {
    let filled = product.star_count();
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Thousands-separated count, e.g. `12,345`
pub fn format_count(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render the ranked products into `area`
pub fn render(frame: &mut Frame, area: Rect, products: &[ProductRecord], title: &str, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(theme.border_unfocused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if products.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Search for a product to see the top-rated listings.",
                theme.input_placeholder,
            )),
            inner,
        );
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, products.len() as u32);
            products.len()
        ])
        .split(inner);

    for (i, (product, col)) in products.iter().zip(columns.iter()).enumerate() {
        render_card(frame, *col, i + 1, product, theme);
    }
}

fn render_card(frame: &mut Frame, area: Rect, rank: usize, product: &ProductRecord, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" #{} ", rank))
        .border_style(theme.border_unfocused);

    let lines = vec![
        Line::from(Span::styled(
            truncate_name(&product.name, NAME_MAX_WIDTH),
            theme.card_title,
        )),
        Line::from(Span::styled(product.price.clone(), theme.card_price)),
        Line::from(vec![
            Span::styled(star_bar(product), theme.card_stars),
            Span::styled(format!(" {:.1}", product.rating), theme.card_muted),
        ]),
        Line::from(Span::styled(
            format!("{} reviews", format_count(product.reviews)),
            theme.card_muted,
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}
