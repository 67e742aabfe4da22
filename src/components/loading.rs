//! Loading screen shown until the initial fleet load completes

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn get_logo() -> Vec<&'static str> {
    vec![
        "        |    |    |        ",
        "       )_)  )_)  )_)       ",
        "      )___))___))___)\\     ",
        "     )____)____)_____)\\\\   ",
        "   _____|____|____|____\\\\\\__",
        "   \\                   /   ",
        " ~~~~~~~~~~~~~~~~~~~~~~~~~~~",
    ]
}

pub struct LoadingScreen {
    source: String,
    frame_index: usize,
    started: Instant,
}

impl LoadingScreen {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            frame_index: 0,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Component for LoadingScreen {
    fn init(&mut self) -> Result<()> {
        self.started = Instant::now();
        self.frame_index = 0;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Nothing can be edited yet; quitting is the only option
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Ok(Some(Action::ForceQuit)),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Tick {
            self.frame_index = (self.frame_index + 1) % SPINNER.len();
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default(), area);

        let logo = get_logo();
        let logo_height = logo.len() as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(area.height.saturating_sub(logo_height + 5) / 2),
                Constraint::Length(logo_height),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let logo_lines: Vec<Line> = logo
            .iter()
            .map(|l| Line::from(Span::styled(*l, Style::default().fg(Color::Cyan))))
            .collect();
        frame.render_widget(
            Paragraph::new(logo_lines).alignment(Alignment::Center),
            chunks[1],
        );

        let status = Line::from(vec![
            Span::styled(
                format!("{} ", SPINNER[self.frame_index]),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                "Loading fleet",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" from {}", self.source),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(status).alignment(Alignment::Center), chunks[3]);

        let hint = Line::from(Span::styled(
            format!("{:.1}s · q to quit", self.elapsed().as_secs_f32()),
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), chunks[4]);
        Ok(())
    }
}
