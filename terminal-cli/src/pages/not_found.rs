use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::Action;
use crate::route::Route;
use crate::widgets::return_home_button;

pub struct NotFoundPage {
    path: String,
}

impl NotFoundPage {
    pub fn new(path: String) -> Self {
        Self { path }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => vec![Action::Navigate(Route::Landing)],
            _ => Vec::new(),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let message = Paragraph::new(vec![
            Line::styled(
                "404",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Line::raw("Page Not Found"),
            Line::styled(
                format!("Nothing lives at {}", self.path),
                Style::default().fg(Color::Gray),
            ),
        ])
        .alignment(Alignment::Center);
        f.render_widget(message, chunks[0]);

        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(18), Constraint::Min(0)])
            .split(chunks[1]);
        f.render_widget(return_home_button(true), row[1]);
    }
}
