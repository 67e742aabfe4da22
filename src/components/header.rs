//! Header, status line and key-hint bar around the main view

use crate::components::ship_picker::status_color;
use crate::model::ship::Ship;
use crate::model::ui::Tab;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct HeaderContext<'a> {
    pub ship: Option<&'a Ship>,
    pub ship_count: usize,
    pub source: &'a str,
    pub unsaved: bool,
    pub saving_enabled: bool,
}

pub fn render_header(frame: &mut Frame, area: Rect, ctx: &HeaderContext) {
    let mut spans = vec![
        Span::styled(
            " fleet-tui ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    match ctx.ship {
        Some(ship) => {
            spans.push(Span::styled(
                ship.name.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" [{}]", ship.status),
                Style::default().fg(status_color(ship)),
            ));
        }
        None => spans.push(Span::styled(
            "No ship selected",
            Style::default().fg(Color::DarkGray),
        )),
    }
    spans.push(Span::styled(
        format!("  {} ships", ctx.ship_count),
        Style::default().fg(Color::DarkGray),
    ));

    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!(" {} ", ctx.source),
        Style::default().fg(Color::Black).bg(Color::Magenta),
    ));
    if !ctx.saving_enabled {
        spans.push(Span::styled(
            " read-only ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ));
    } else if ctx.unsaved {
        spans.push(Span::styled(
            " ● unsaved",
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

pub fn render_status_line(frame: &mut Frame, area: Rect, error: Option<&str>, message: Option<&str>) {
    let line = match (error, message) {
        (Some(error), _) => Line::from(Span::styled(
            format!(" Error: {} ", error),
            Style::default().fg(Color::Red),
        )),
        (None, Some(message)) => Line::from(Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow),
        )),
        (None, None) => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn key_hint(key: &str, label: &str, color: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            format!(" {} ", key),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{}  ", label)),
    ]
}

/// Hints for the current context; `tab` is `None` when no ship is selected
pub fn render_help_bar(frame: &mut Frame, area: Rect, tab: Option<Tab>, capturing: bool) {
    let mut spans: Vec<Span> = Vec::new();
    if capturing {
        spans.extend(key_hint("Enter", "Save", Color::Green));
        spans.extend(key_hint("Esc", "Cancel", Color::Yellow));
        spans.extend(key_hint("Tab", "Next field", Color::Cyan));
        spans.extend(key_hint("←/→", "Choose", Color::Cyan));
    } else {
        spans.extend(key_hint("q", "Quit", Color::Yellow));
        spans.extend(key_hint("s", "Ships", Color::Cyan));
        spans.extend(key_hint("n", "New ship", Color::Green));
        match tab {
            Some(Tab::Overview) => {
                spans.extend(key_hint("e", "Edit", Color::Green));
                spans.extend(key_hint("+/-", "Zoom", Color::Cyan));
            }
            Some(tab) => {
                spans.extend(key_hint("a", "Add", Color::Green));
                spans.extend(key_hint("e", "Edit", Color::Green));
                spans.extend(key_hint("d", "Delete", Color::Red));
                if tab == Tab::Costs {
                    spans.extend(key_hint("c", "Categories", Color::Cyan));
                }
            }
            None => {}
        }
        if tab.is_some() {
            spans.extend(key_hint("Tab", "Next tab", Color::Cyan));
            spans.extend(key_hint("x", "Export", Color::Cyan));
        }
        spans.extend(key_hint("?", "Help", Color::Cyan));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}
