//! Cups: find the ball under one of three cups.

pub mod round;

use crossterm::event::{KeyCode, KeyEvent};
use pcoin_types::{CupIndex, PlayResponse, CUP_COUNT};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::{Action, UiEvent};
use crate::notify::Notification;
use crate::pages::ViewContext;
use crate::route::Route;
use crate::sound::Effect;
use crate::timer::ScopedTimer;
use crate::widgets::coin_display::{format_coins, CURRENCY};
use crate::widgets::{return_home_button, CoinDisplay, MetallicButton, Spinner};
use round::{CupsRound, Phase, Resolution, REVEAL_DELAY};

const CUP_ART: [&str; 4] = ["  _____  ", " /     \\ ", "|       |", "|_______|"];
const BALL: &str = "●";

pub struct CupsPage {
    game: CupsRound,
    cursor: CupIndex,
    reveal: Option<ScopedTimer>,
}

impl Default for CupsPage {
    fn default() -> Self {
        Self {
            game: CupsRound::default(),
            cursor: CupIndex::ALL[0],
            reveal: None,
        }
    }
}

impl CupsPage {
    pub fn game(&self) -> &CupsRound {
        &self.game
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &ViewContext) -> Vec<Action> {
        match (self.game.phase(), key.code) {
            (_, KeyCode::Esc) => vec![Action::Navigate(Route::Landing)],
            (Phase::Betting, KeyCode::Enter) => match self.game.start(ctx.session.balance()) {
                Ok(bet) => {
                    info!(bet = %bet, round = self.game.round(), "cups round started");
                    vec![Action::Sound(Effect::Click)]
                }
                Err(err) => vec![Action::Notify(Notification::error(
                    "Invalid bet",
                    err.to_string(),
                ))],
            },
            (Phase::Betting, KeyCode::Char(ch)) => {
                self.game.push_bet_char(ch);
                Vec::new()
            }
            (Phase::Betting, KeyCode::Backspace) => {
                self.game.pop_bet_char();
                Vec::new()
            }
            (Phase::Selecting, KeyCode::Left) => {
                let idx = (self.cursor.get() + CUP_COUNT - 1) % CUP_COUNT;
                self.cursor = CupIndex::ALL[idx];
                Vec::new()
            }
            (Phase::Selecting, KeyCode::Right) => {
                let idx = (self.cursor.get() + 1) % CUP_COUNT;
                self.cursor = CupIndex::ALL[idx];
                Vec::new()
            }
            (Phase::Selecting, KeyCode::Char(c @ '1'..='3')) => {
                let idx = (c as u8 - b'1') as usize;
                self.pick(CupIndex::ALL[idx])
            }
            (Phase::Selecting, KeyCode::Enter) => self.pick(self.cursor),
            (Phase::Finished, KeyCode::Enter | KeyCode::Char('p')) => {
                if self.game.play_again() {
                    vec![Action::Sound(Effect::Click)]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn pick(&mut self, cup: CupIndex) -> Vec<Action> {
        self.cursor = cup;
        match self.game.select_cup(cup) {
            Some(request) => vec![
                Action::Sound(Effect::Click),
                Action::Play {
                    round: self.game.round(),
                    request,
                },
            ],
            None => Vec::new(),
        }
    }

    /// Apply the play response and start the reveal delay.
    pub fn on_play_result(
        &mut self,
        round: u64,
        result: Result<PlayResponse, String>,
        ui_tx: &mpsc::UnboundedSender<UiEvent>,
    ) -> Vec<Action> {
        match self.game.resolve(round, result) {
            Resolution::Revealed(outcome) => {
                self.reveal = Some(ScopedTimer::spawn(
                    REVEAL_DELAY,
                    ui_tx.clone(),
                    UiEvent::RevealElapsed { round },
                ));
                if outcome.won {
                    vec![
                        Action::Sound(Effect::Success),
                        Action::Notify(Notification::info(
                            "You won!",
                            format!(
                                "You won {} {CURRENCY}!",
                                format_coins(outcome.win_amount)
                            ),
                        )),
                    ]
                } else {
                    let ball = self
                        .game
                        .ball_position()
                        .map(|b| b.to_string())
                        .unwrap_or_default();
                    vec![Action::Notify(Notification::info(
                        "You lost",
                        format!("The ball was under cup {ball}. Better luck next time!"),
                    ))]
                }
            }
            Resolution::Aborted(reason) => {
                warn!(round, reason = %reason, "cups round failed");
                self.reveal = None;
                vec![Action::Notify(Notification::error(
                    "Game failed",
                    "Failed to play game. Please try again.",
                ))]
            }
            Resolution::Ignored => Vec::new(),
        }
    }

    /// A result is on screen but the round has not finished yet.
    pub fn reveal_pending(&self) -> bool {
        self.game.phase() == Phase::Revealing && self.game.outcome().is_some()
    }

    /// The reveal delay for `round` is over.
    pub fn on_reveal_elapsed(&mut self, round: u64) -> Vec<Action> {
        if !self.game.finish_reveal(round) {
            return Vec::new();
        }
        self.reveal = None;
        vec![Action::RefreshBalance]
    }

    pub fn render(&self, f: &mut Frame, area: Rect, ctx: &ViewContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(8),
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        let balance = match ctx.session.balance() {
            Some(balance) => CoinDisplay::new(balance),
            None => CoinDisplay::unknown(),
        };
        let mut header = vec![Span::styled(
            "Find the ball!  Balance: ",
            Style::default().fg(Color::Gray),
        )];
        header.extend(balance.line().spans);
        f.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

        self.render_cups(f, chunks[1]);
        self.render_controls(f, chunks[2], ctx);

        let home = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(18), Constraint::Min(0)])
            .split(chunks[4]);
        f.render_widget(return_home_button(false), home[0]);
    }

    fn render_cups(&self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); CUP_COUNT])
            .split(area);
        let show_ball = matches!(self.game.phase(), Phase::Revealing | Phase::Finished);

        for cup in CupIndex::ALL {
            let selected = self.game.selected_cup() == Some(cup);
            let hovered = self.game.phase() == Phase::Selecting && self.cursor == cup;
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if hovered {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            let mut lines: Vec<Line> = CUP_ART
                .iter()
                .map(|row| Line::styled(*row, style))
                .collect();
            let under = if show_ball && self.game.ball_position() == Some(cup) {
                Span::styled(BALL, Style::default().fg(Color::LightRed))
            } else {
                Span::raw(" ")
            };
            lines.push(Line::from(under));
            lines.push(Line::styled(format!("[{cup}]"), style));

            f.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                columns[cup.get()],
            );
        }
    }

    fn render_controls(&self, f: &mut Frame, area: Rect, ctx: &ViewContext) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        match self.game.phase() {
            Phase::Betting => {
                let row = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Min(20), Constraint::Length(22)])
                    .split(inner);
                let field = Line::from(vec![
                    Span::raw("Bet amount: "),
                    Span::styled(
                        format!("{}_", self.game.bet_input()),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!(" {CURRENCY}"), Style::default().fg(Color::Gray)),
                ]);
                f.render_widget(Paragraph::new(field), row[0]);
                f.render_widget(MetallicButton::new("Start Game").focused(true), row[1]);
            }
            Phase::Selecting => {
                f.render_widget(
                    Paragraph::new("Pick a cup: ←/→ and Enter, or press 1-3")
                        .alignment(Alignment::Center),
                    inner,
                );
            }
            Phase::Revealing => match self.game.ball_position() {
                Some(ball) => f.render_widget(
                    Paragraph::new(format!("The ball was under cup {ball}…"))
                        .alignment(Alignment::Center),
                    inner,
                ),
                None => f.render_widget(Spinner::new(ctx.tick).label("Revealing…"), inner),
            },
            Phase::Finished => {
                let row = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Min(20), Constraint::Length(22)])
                    .split(inner);
                if let Some(outcome) = self.game.outcome() {
                    let banner = if outcome.won {
                        Line::styled(
                            format!("You won {} {CURRENCY}!", format_coins(outcome.win_amount)),
                            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Line::styled(
                            "You lost. Better luck next time!",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        )
                    };
                    f.render_widget(Paragraph::new(banner), row[0]);
                }
                f.render_widget(MetallicButton::new("Play Again").focused(true), row[1]);
            }
        }
    }
}
