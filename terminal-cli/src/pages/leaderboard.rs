use crossterm::event::{KeyCode, KeyEvent};
use pcoin_types::LeaderboardEntry;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::Action;
use crate::route::Route;
use crate::widgets::coin_display::format_coins;
use crate::widgets::{return_home_button, Spinner};

/// Rows shown; the server may send more.
pub const TOP_N: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankBadge {
    Trophy,
    Medal,
    Award,
    Star,
}

impl RankBadge {
    /// Badge for a zero-based position in the ranking.
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => RankBadge::Trophy,
            1 => RankBadge::Medal,
            2 => RankBadge::Award,
            _ => RankBadge::Star,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            RankBadge::Trophy => "♛",
            RankBadge::Medal => "♚",
            RankBadge::Award => "♜",
            RankBadge::Star => "☆",
        }
    }

    pub fn color(self) -> Color {
        match self {
            RankBadge::Trophy => Color::Yellow,
            RankBadge::Medal => Color::Gray,
            RankBadge::Award => Color::Rgb(205, 127, 50),
            RankBadge::Star => Color::DarkGray,
        }
    }
}

enum State {
    Loading,
    Loaded(Vec<LeaderboardEntry>),
    Failed(String),
}

pub struct LeaderboardPage {
    state: State,
}

impl Default for LeaderboardPage {
    fn default() -> Self {
        Self {
            state: State::Loading,
        }
    }
}

impl LeaderboardPage {
    /// Actions to run when the page is shown.
    pub fn mount() -> Vec<Action> {
        vec![Action::LoadLeaderboard]
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, State::Loading)
    }

    pub fn on_loaded(&mut self, result: Result<Vec<LeaderboardEntry>, String>) {
        self.state = match result {
            Ok(rows) => State::Loaded(rows),
            Err(reason) => State::Failed(reason),
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Esc => vec![Action::Navigate(Route::Landing)],
            KeyCode::Char('r') if !self.is_loading() => {
                self.state = State::Loading;
                vec![Action::LoadLeaderboard]
            }
            _ => Vec::new(),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, tick: u64) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(3)])
            .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title("Top Players (r to reload)");

        match &self.state {
            State::Loading => {
                let inner = block.inner(chunks[0]);
                f.render_widget(block, chunks[0]);
                f.render_widget(Spinner::new(tick).label("Loading leaderboard…"), inner);
            }
            State::Failed(reason) => {
                let text = Paragraph::new(vec![
                    Line::styled(
                        "Could not load the leaderboard.",
                        Style::default().fg(Color::Red),
                    ),
                    Line::styled(reason.as_str(), Style::default().fg(Color::Gray)),
                ])
                .block(block);
                f.render_widget(text, chunks[0]);
            }
            State::Loaded(rows) if rows.is_empty() => {
                let text = Paragraph::new("No games played yet. Be the first!").block(block);
                f.render_widget(text, chunks[0]);
            }
            State::Loaded(rows) => f.render_widget(table(rows).block(block), chunks[0]),
        }

        let home = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(18), Constraint::Min(0)])
            .split(chunks[1]);
        f.render_widget(return_home_button(false), home[0]);
    }
}

fn table(rows: &[LeaderboardEntry]) -> Table<'static> {
    let header = Row::new([
        "Rank", "Player", "Winnings", "Games", "Biggest Win", "Win Rate",
    ])
    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let body = rows.iter().take(TOP_N).enumerate().map(|(index, entry)| {
        let badge = RankBadge::for_index(index);
        Row::new([
            Cell::from(format!("{} #{}", badge.symbol(), index + 1))
                .style(Style::default().fg(badge.color())),
            Cell::from(entry.username.clone()),
            Cell::from(format_coins(entry.total_winnings))
                .style(Style::default().fg(Color::Yellow)),
            Cell::from(entry.games_played.to_string()),
            Cell::from(format_coins(entry.biggest_win)),
            Cell::from(format!("{:.1}%", entry.win_rate)),
        ])
    });

    Table::new(
        body,
        [
            Constraint::Length(7),
            Constraint::Min(12),
            Constraint::Length(14),
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Length(9),
        ],
    )
    .header(header)
}
