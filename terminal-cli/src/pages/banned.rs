use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::Action;
use crate::sound::Effect;
use crate::widgets::MetallicButton;

#[derive(Default)]
pub struct BannedPage {
    logging_out: bool,
}

impl BannedPage {
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Enter if !self.logging_out => {
                self.logging_out = true;
                vec![Action::Sound(Effect::Click), Action::Logout]
            }
            _ => Vec::new(),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let message = Paragraph::new(vec![
            Line::styled(
                "Account Suspended",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::raw("Your account has been suspended and can no longer play."),
            Line::raw("Contact support if you believe this is a mistake."),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Red)),
        );
        f.render_widget(message, chunks[0]);

        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(16), Constraint::Min(0)])
            .split(chunks[1]);
        f.render_widget(
            MetallicButton::new("Logout")
                .focused(true)
                .disabled(self.logging_out),
            row[1],
        );
    }
}
