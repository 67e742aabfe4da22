//! Column formatting for record lists
//!
//! Rows are rendered as list items so they share the list highlight style;
//! this module lines the cells up into columns.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a single column may get
const MAX_COLUMN_WIDTH: usize = 28;

/// Width of every column: the widest of its header and cells, capped
pub fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.width());
            }
        }
    }
    widths
        .into_iter()
        .map(|w| w.min(MAX_COLUMN_WIDTH))
        .collect()
}

/// Pad or truncate `cell` to exactly `width` display columns
pub fn fit_cell(cell: &str, width: usize) -> String {
    if cell.width() <= width {
        let padding = width - cell.width();
        return format!("{}{}", cell, " ".repeat(padding));
    }

    let budget = width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for c in cell.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

pub fn header_line(headers: &[&str], widths: &[usize]) -> Line<'static> {
    let spans: Vec<Span> = headers
        .iter()
        .zip(widths)
        .flat_map(|(h, w)| {
            vec![
                Span::styled(
                    fit_cell(h, *w),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();
    Line::from(spans)
}

pub fn row_line(cells: &[String], widths: &[usize]) -> Line<'static> {
    let spans: Vec<Span> = cells
        .iter()
        .zip(widths)
        .flat_map(|(cell, w)| {
            vec![
                Span::styled(fit_cell(cell, *w), Style::default().fg(Color::White)),
                Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();
    Line::from(spans)
}

/// Format a money amount with thousands separators and two decimals
pub fn money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}.{:02}", if negative { "-" } else { "" }, grouped, cents % 100)
}
