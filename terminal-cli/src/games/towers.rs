//! Towers is announced but not playable yet.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::Action;
use crate::route::Route;
use crate::sound::Effect;
use crate::widgets::return_home_button;

#[derive(Default)]
pub struct TowersPage;

impl TowersPage {
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Esc => vec![Action::Navigate(Route::Landing)],
            KeyCode::Enter => vec![
                Action::Sound(Effect::Click),
                Action::Navigate(Route::Landing),
            ],
            _ => Vec::new(),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let card = Paragraph::new(vec![
            Line::styled(
                "TOWERS",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::raw("Climb the tower one floor at a time and cash out before you fall."),
            Line::raw(""),
            Line::styled("Coming soon", Style::default().fg(Color::Cyan)),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Towers"),
        );
        f.render_widget(card, chunks[0]);

        let home = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(18), Constraint::Min(0)])
            .split(chunks[2]);
        f.render_widget(return_home_button(true), home[0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::testing::render_to_text;
    use crossterm::event::KeyModifiers;

    #[test]
    fn shows_placeholder() {
        let page = TowersPage;
        let text = render_to_text(80, 14, |f| page.render(f, f.area()));
        assert!(text.contains("Coming soon"));
        assert!(text.contains("Home"));
    }

    #[test]
    fn any_button_goes_home() {
        let mut page = TowersPage;
        let actions = page.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(matches!(actions.as_slice(), [Action::Navigate(Route::Landing)]));
    }
}
