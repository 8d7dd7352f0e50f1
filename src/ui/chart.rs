//! Rating bar chart for the ranked products

use crate::scrape::ProductRecord;
use crate::ui::cards::truncate_name;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};

const LABEL_WIDTH: usize = 18;

/// Ratings are charted in tenths so 4.3 and 4.4 get distinct bars
const SCALE: f64 = 10.0;

/// (label, bar value, value text) per product
pub fn chart_points(products: &[ProductRecord]) -> Vec<(String, u64, String)> {
    products
        .iter()
        .map(|p| {
            (
                truncate_name(&p.name, LABEL_WIDTH),
                (p.rating.max(0.0) * SCALE).round() as u64,
                format!("{:.1}", p.rating),
            )
        })
        .collect()
}

pub fn render(frame: &mut Frame, area: Rect, products: &[ProductRecord], theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Ratings ")
        .border_style(theme.border_unfocused);

    if products.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No data yet", theme.input_placeholder)).block(block),
            area,
        );
        return;
    }

    let bars: Vec<Bar> = chart_points(products)
        .into_iter()
        .map(|(label, value, text)| {
            Bar::default()
                .label(Line::from(label))
                .value(value)
                .text_value(text)
                .style(theme.chart_bar)
                .value_style(theme.chart_value)
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .max((5.0 * SCALE) as u64)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}
