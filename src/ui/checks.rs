//! Verification panel
//!
//! Shows the field and storage checks of the last cycle plus the marketplace
//! link for checking the results by hand.

use crate::pipeline::CycleReport;
use crate::ui::theme::Theme;
use crate::verify::Verification;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// One displayed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRow {
    pub label: &'static str,
    pub detail: String,
    pub verdict: &'static str,
    pub pass: bool,
}

impl CheckRow {
    fn field(label: &'static str, valid: usize, total: usize) -> Self {
        let pass = valid == total;
        Self {
            label,
            detail: format!("{}/{}", valid, total),
            verdict: if pass { "PASS" } else { "FAIL" },
            pass,
        }
    }

    fn storage(label: &'static str, detail: String, pass: bool) -> Self {
        Self {
            label,
            detail,
            verdict: if pass { "Match" } else { "Mismatch" },
            pass,
        }
    }
}

/// Rows for the field checks and, when the read-back worked, the storage checks
pub fn check_rows(verification: &Verification) -> Vec<CheckRow> {
    let fields = &verification.fields;
    let mut rows = vec![
        CheckRow::field("Ratings in 1-5", fields.valid_ratings, fields.total),
        CheckRow::field("Prices with currency", fields.valid_prices, fields.total),
    ];

    if let Ok(ref storage) = verification.storage {
        rows.push(CheckRow::storage(
            "Row count",
            format!(
                "{} scraped / {} stored",
                storage.scraped_count, storage.stored_count
            ),
            storage.count_matches(),
        ));
        let top = match (&storage.scraped_top, &storage.stored_top) {
            (Some(s), Some(d)) => format!("{:.1} / {:.1}", s.rating, d.rating),
            (Some(s), None) => format!("{:.1} / none", s.rating),
            _ => "none".to_string(),
        };
        rows.push(CheckRow::storage("Top rated", top, storage.top_matches()));
    }
    rows
}

pub fn render(frame: &mut Frame, area: Rect, report: Option<&CycleReport>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Checks ")
        .border_style(theme.border_unfocused);

    let Some(report) = report else {
        frame.render_widget(
            Paragraph::new(Span::styled("Nothing checked yet", theme.input_placeholder))
                .block(block),
            area,
        );
        return;
    };

    let mut lines: Vec<Line> = check_rows(&report.verification)
        .into_iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(format!("{:<21}", row.label), theme.check_label),
                Span::raw(format!("{:<22} ", row.detail)),
                Span::styled(row.verdict, theme.check_style(row.pass)),
            ])
        })
        .collect();

    if let Err(ref msg) = report.verification.storage {
        lines.push(Line::from(Span::styled(msg.clone(), theme.check_fail)));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("Fetched {}", report.fetched_at.format("%Y-%m-%d %H:%M:%S")),
        theme.card_muted,
    )));
    lines.push(Line::from(Span::styled("Check by hand:", theme.check_label)));
    lines.push(Line::from(Span::styled(report.search_url.clone(), theme.link)));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}
