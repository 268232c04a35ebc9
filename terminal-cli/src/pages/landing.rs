use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::Action;
use crate::pages::ViewContext;
use crate::route::Route;
use crate::sound::Effect;
use crate::widgets::{CoinDisplay, MetallicButton};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item {
    Cups,
    Towers,
    Leaderboard,
    Logout,
}

impl Item {
    const ALL: [Item; 4] = [Item::Cups, Item::Towers, Item::Leaderboard, Item::Logout];

    fn index(self) -> usize {
        Self::ALL.iter().position(|i| *i == self).unwrap_or(0)
    }

    fn step(self, delta: isize) -> Item {
        let len = Self::ALL.len() as isize;
        let idx = (self.index() as isize + delta).rem_euclid(len);
        Self::ALL[idx as usize]
    }
}

struct GameCard {
    item: Item,
    title: &'static str,
    blurb: &'static str,
}

const CARDS: [GameCard; 2] = [
    GameCard {
        item: Item::Cups,
        title: "CUPS",
        blurb: "Find the ball hidden under one of three cups.",
    },
    GameCard {
        item: Item::Towers,
        title: "TOWERS",
        blurb: "Climb floor by floor and cash out in time. Coming soon.",
    },
];

pub struct LandingPage {
    focus: Item,
}

impl Default for LandingPage {
    fn default() -> Self {
        Self { focus: Item::Cups }
    }
}

impl LandingPage {
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab => {
                self.focus = self.focus.step(-1);
                Vec::new()
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                self.focus = self.focus.step(1);
                Vec::new()
            }
            KeyCode::Enter => self.activate(),
            _ => Vec::new(),
        }
    }

    fn activate(&self) -> Vec<Action> {
        match self.focus {
            Item::Cups => vec![Action::Navigate(Route::Cups)],
            Item::Towers => vec![Action::Navigate(Route::Towers)],
            Item::Leaderboard => vec![Action::Navigate(Route::Leaderboard)],
            Item::Logout => vec![Action::Sound(Effect::Click), Action::Logout],
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, ctx: &ViewContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(7),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        let name = ctx
            .session
            .user()
            .map(|u| u.username.as_str())
            .unwrap_or("player");
        let balance = match ctx.session.balance() {
            Some(balance) => CoinDisplay::new(balance),
            None => CoinDisplay::unknown(),
        };
        let welcome = Paragraph::new(vec![
            Line::styled(
                format!("Welcome, {name}!"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            balance.line(),
        ])
        .alignment(Alignment::Center);
        f.render_widget(welcome, chunks[0]);

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(chunks[1]);
        for (card, area) in CARDS.iter().zip(cards.iter()) {
            let focused = self.focus == card.item;
            let border = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            let body = Paragraph::new(vec![
                Line::styled(card.title, border.add_modifier(Modifier::BOLD)),
                Line::raw(""),
                Line::raw(card.blurb),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(if focused {
                        BorderType::Double
                    } else {
                        BorderType::Rounded
                    })
                    .border_style(border),
            );
            f.render_widget(body, *area);
        }

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(18),
                Constraint::Length(2),
                Constraint::Length(14),
                Constraint::Min(0),
            ])
            .split(chunks[2]);
        f.render_widget(
            MetallicButton::new("Leaderboard").focused(self.focus == Item::Leaderboard),
            buttons[0],
        );
        f.render_widget(
            MetallicButton::new("Logout").focused(self.focus == Item::Logout),
            buttons[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::widgets::testing::render_to_text;
    use crossterm::event::KeyModifiers;
    use pcoin_types::{Coins, User};

    fn press(page: &mut LandingPage, code: KeyCode) -> Vec<Action> {
        page.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn focus_wraps_around() {
        let mut page = LandingPage::default();
        press(&mut page, KeyCode::Left);
        assert_eq!(page.focus, Item::Logout);
        press(&mut page, KeyCode::Right);
        press(&mut page, KeyCode::Right);
        assert_eq!(page.focus, Item::Towers);
    }

    #[test]
    fn enter_activates_focused_item() {
        let mut page = LandingPage::default();
        assert!(matches!(
            press(&mut page, KeyCode::Enter).as_slice(),
            [Action::Navigate(Route::Cups)]
        ));
        press(&mut page, KeyCode::Tab);
        press(&mut page, KeyCode::Tab);
        assert!(matches!(
            press(&mut page, KeyCode::Enter).as_slice(),
            [Action::Navigate(Route::Leaderboard)]
        ));
        press(&mut page, KeyCode::Tab);
        assert!(matches!(
            press(&mut page, KeyCode::Enter).as_slice(),
            [Action::Sound(Effect::Click), Action::Logout]
        ));
    }

    #[test]
    fn greets_user_with_balance() {
        let session = Session::SignedIn(User {
            id: 7,
            username: "alice".into(),
            balance: Coins::from_hundredths(123_450),
            is_banned: false,
        });
        let ctx = ViewContext {
            session: &session,
            tick: 0,
        };
        let page = LandingPage::default();
        let text = render_to_text(80, 16, |f| page.render(f, f.area(), &ctx));
        assert!(text.contains("Welcome, alice!"));
        assert!(text.contains("1,234.50"));
        assert!(text.contains("CUPS"));
        assert!(text.contains("TOWERS"));
        assert!(text.contains("Leaderboard"));
    }
}
