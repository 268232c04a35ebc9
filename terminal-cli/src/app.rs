//! Application shell: owns the session, the current page and every side effect.
//!
//! Pages never talk to the network. They return [`Action`]s, the shell runs
//! them, and results come back through the [`UiEvent`] channel on the UI task.

use std::future::Future;
use std::time::Instant;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pcoin_client::Client;
use pcoin_types::{Credentials, LeaderboardEntry, PlayRequest, PlayResponse, User};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::notify::{Notification, Toasts, Variant};
use crate::pages::{AuthMode, Page, ViewContext};
use crate::route::Route;
use crate::session::Session;
use crate::sound::{Effect, SoundEffects};
use crate::widgets::{CoinDisplay, Spinner};

/// Lines kept in the activity log pane.
pub const MAX_LOG_LINES: usize = 300;

const TOAST_WIDTH: u16 = 44;

/// Something a page wants done.
#[derive(Debug)]
pub enum Action {
    Navigate(Route),
    Notify(Notification),
    Sound(Effect),
    /// Place a bet; `round` tags the response.
    Play { round: u64, request: PlayRequest },
    Login(Credentials),
    Register(Credentials),
    Logout,
    LoadLeaderboard,
    CheckSession,
    RefreshBalance,
}

/// Results posted back to the UI task.
#[derive(Debug)]
pub enum UiEvent {
    Session(Result<Option<User>, String>),
    AuthFinished {
        mode: AuthMode,
        result: Result<User, String>,
    },
    LoggedOut(Result<(), String>),
    Leaderboard(Result<Vec<LeaderboardEntry>, String>),
    PlayFinished {
        round: u64,
        result: Result<PlayResponse, String>,
    },
    RevealElapsed {
        round: u64,
    },
}

pub struct App {
    client: Client,
    sound: SoundEffects,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    session: Session,
    route: Route,
    page: Page,
    toasts: Toasts,
    logs: Vec<String>,
    verbose: bool,
    tick: u64,
}

impl App {
    pub fn new(
        client: Client,
        sound: SoundEffects,
        ui_tx: mpsc::UnboundedSender<UiEvent>,
        start: Route,
        verbose: bool,
    ) -> Self {
        let (page, _) = Page::for_route(&start);
        Self {
            client,
            sound,
            ui_tx,
            session: Session::Checking,
            route: start,
            page,
            toasts: Toasts::default(),
            logs: vec![format!("{} Connecting…", Local::now().format("%H:%M:%S"))],
            verbose,
            tick: 0,
        }
    }

    /// Kick off the first session check; mount actions wait for its answer.
    pub fn start(&mut self) {
        self.check_session();
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.tick = self.tick.wrapping_add(1);
        self.toasts.prune(now);
    }

    /// Handle a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            return true;
        }
        self.sound.prime();
        if matches!(self.session, Session::Checking) && self.route.is_protected() {
            return false;
        }
        let ctx = ViewContext {
            session: &self.session,
            tick: self.tick,
        };
        let actions = self.page.handle_key(key, &ctx);
        self.apply(actions);
        false
    }

    pub fn handle_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Session(result) => self.on_session(result),
            UiEvent::AuthFinished { mode, result } => {
                if let Err(reason) = &result {
                    warn!(?mode, reason = %reason, "authentication failed");
                }
                let actions = match &mut self.page {
                    Page::Auth(page) => page.on_finished(mode, result),
                    // The form is gone; a successful sign-in still counts.
                    _ if result.is_ok() => vec![Action::CheckSession],
                    _ => Vec::new(),
                };
                self.apply(actions);
            }
            UiEvent::LoggedOut(result) => {
                if let Err(reason) = result {
                    warn!(reason = %reason, "logout request failed");
                }
                info!("signed out");
                self.push_log("Signed out".to_string());
                self.session = Session::SignedOut;
                self.show(Route::Auth);
            }
            UiEvent::Leaderboard(result) => {
                if let Err(reason) = &result {
                    warn!(reason = %reason, "leaderboard load failed");
                    self.notify(Notification::error(
                        "Leaderboard unavailable",
                        reason.clone(),
                    ));
                }
                if let Page::Leaderboard(page) = &mut self.page {
                    page.on_loaded(result);
                }
            }
            UiEvent::PlayFinished { round, result } => {
                let actions = match &mut self.page {
                    Page::Cups(page) => page.on_play_result(round, result, &self.ui_tx),
                    // Settled on the server; only the balance is left to refresh.
                    _ if result.is_ok() => {
                        debug!(round, "play result arrived after leaving the game");
                        vec![Action::RefreshBalance]
                    }
                    _ => Vec::new(),
                };
                self.apply(actions);
            }
            UiEvent::RevealElapsed { round } => {
                let actions = match &mut self.page {
                    Page::Cups(page) => page.on_reveal_elapsed(round),
                    _ => Vec::new(),
                };
                self.apply(actions);
            }
        }
    }

    fn on_session(&mut self, result: Result<Option<User>, String>) {
        let was_checking = matches!(self.session, Session::Checking);
        match result {
            Ok(Some(user)) => {
                if was_checking || self.session.user().map(|u| u.id) != Some(user.id) {
                    info!(user = %user.username, balance = %user.balance, "signed in");
                    self.push_log(format!("Signed in as {}", user.username));
                }
                self.session = Session::SignedIn(user);
            }
            Ok(None) => {
                if !matches!(self.session, Session::SignedOut) {
                    info!("no active session");
                }
                self.session = Session::SignedOut;
            }
            Err(reason) => {
                warn!(reason = %reason, "session check failed");
                if was_checking {
                    self.session = Session::SignedOut;
                    self.notify(Notification::error("Connection problem", reason));
                }
            }
        }

        if let Some(target) = self.route.redirect(&self.session) {
            self.show(target);
        } else if was_checking {
            // The start page was built before the session was known.
            self.show(self.route.clone());
        }
    }

    pub fn apply(&mut self, actions: Vec<Action>) {
        for action in actions {
            self.run(action);
        }
    }

    fn run(&mut self, action: Action) {
        match action {
            Action::Navigate(route) => self.navigate(route),
            Action::Notify(notification) => self.notify(notification),
            Action::Sound(effect) => self.sound.play(effect),
            Action::Play { round, request } => {
                info!(
                    round,
                    game = request.game_type.name(),
                    bet = %request.bet_amount,
                    "placing bet"
                );
                let client = self.client.clone();
                self.spawn(async move {
                    let result = client.play(&request).await.map_err(|e| e.message());
                    UiEvent::PlayFinished { round, result }
                });
            }
            Action::Login(credentials) => self.authenticate(AuthMode::Login, credentials),
            Action::Register(credentials) => self.authenticate(AuthMode::Register, credentials),
            Action::Logout => {
                let client = self.client.clone();
                self.spawn(async move {
                    UiEvent::LoggedOut(client.logout().await.map_err(|e| e.message()))
                });
            }
            Action::LoadLeaderboard => {
                let client = self.client.clone();
                self.spawn(async move {
                    UiEvent::Leaderboard(client.leaderboard().await.map_err(|e| e.message()))
                });
            }
            Action::CheckSession | Action::RefreshBalance => self.check_session(),
        }
    }

    fn authenticate(&mut self, mode: AuthMode, credentials: Credentials) {
        info!(?mode, user = %credentials.username, "submitting credentials");
        let client = self.client.clone();
        self.spawn(async move {
            let result = match mode {
                AuthMode::Login => client.login(&credentials).await,
                AuthMode::Register => client.register(&credentials).await,
            };
            UiEvent::AuthFinished {
                mode,
                result: result.map_err(|e| e.message()),
            }
        });
    }

    fn check_session(&mut self) {
        let client = self.client.clone();
        self.spawn(async move {
            UiEvent::Session(client.current_user().await.map_err(|e| e.message()))
        });
    }

    fn spawn<F>(&self, request: F)
    where
        F: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(request.await);
        });
    }

    /// User-initiated navigation, subject to the session guard.
    fn navigate(&mut self, route: Route) {
        let target = route.redirect(&self.session).unwrap_or(route);
        if target == self.route {
            return;
        }
        self.sound.play(Effect::Navigate);
        self.show(target);
    }

    /// Replace the current page. Dropping the old page cancels its timers.
    fn show(&mut self, route: Route) {
        debug!(from = %self.route, to = %route, "route change");
        let (page, mut actions) = Page::for_route(&route);
        self.route = route;
        let previous = std::mem::replace(&mut self.page, page);
        // The bet is settled but the aborted reveal will never refresh the balance.
        if matches!(&previous, Page::Cups(cups) if cups.reveal_pending()) {
            actions.push(Action::RefreshBalance);
        }
        drop(previous);
        if !matches!(self.session, Session::Checking) {
            self.apply(actions);
        }
    }

    fn notify(&mut self, notification: Notification) {
        match notification.variant {
            Variant::Default => info!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
            Variant::Destructive => warn!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
        }
        self.push_log(format!("{}: {}", notification.title, notification.description));
        self.toasts.push(notification, Instant::now());
    }

    fn push_log(&mut self, line: String) {
        let ts = Local::now().format("%H:%M:%S");
        self.logs.push(format!("{ts} {line}"));
        if self.logs.len() > MAX_LOG_LINES {
            let excess = self.logs.len() - MAX_LOG_LINES;
            self.logs.drain(0..excess);
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.draw_header(f, chunks[0]);

        let body = if self.verbose {
            let split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(chunks[1]);
            self.draw_log(f, split[1]);
            split[0]
        } else {
            chunks[1]
        };

        if matches!(self.session, Session::Checking) && self.route.is_protected() {
            f.render_widget(Spinner::new(self.tick).label("Checking session…"), body);
        } else {
            let ctx = ViewContext {
                session: &self.session,
                tick: self.tick,
            };
            self.page.render(f, body, &ctx);
        }
        self.draw_toasts(f, chunks[1]);

        let footer = Paragraph::new("Tab/arrows move  Enter select  Esc home  Ctrl-C quit")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(footer, chunks[2]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let left = Line::from(vec![
            Span::styled(
                "P COIN Casino",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" | {}", self.route.title()),
                Style::default().fg(Color::Gray),
            ),
        ]);
        f.render_widget(Paragraph::new(left), halves[0]);

        if let Some(user) = self.session.user() {
            let mut spans = vec![Span::styled(
                format!("{}  ", user.username),
                Style::default().fg(Color::White),
            )];
            spans.extend(CoinDisplay::new(user.balance).line().spans);
            f.render_widget(
                Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
                halves[1],
            );
        }
    }

    fn draw_log(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .logs
            .iter()
            .rev()
            .take(area.height.saturating_sub(2) as usize)
            .rev()
            .map(|l| Line::raw(l.clone()))
            .collect();
        let log = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Log"))
            .wrap(Wrap { trim: true });
        f.render_widget(log, area);
    }

    fn draw_toasts(&self, f: &mut Frame, area: Rect) {
        let width = TOAST_WIDTH.min(area.width);
        let mut y = area.y;
        for notification in self.toasts.visible() {
            if y + 4 > area.bottom() {
                break;
            }
            let rect = Rect {
                x: area.right() - width,
                y,
                width,
                height: 4,
            };
            let color = match notification.variant {
                Variant::Default => Color::Yellow,
                Variant::Destructive => Color::Red,
            };
            let toast = Paragraph::new(vec![
                Line::styled(
                    notification.title.as_str(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Line::raw(notification.description.as_str()),
            ])
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
            f.render_widget(Clear, rect);
            f.render_widget(toast, rect);
            y += 4;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::testing::render_to_text;
    use crate::games::cups::round::Phase;
    use pcoin_client::RetryPolicy;
    use pcoin_types::Coins;
    use std::time::Duration;

    /// Wait for the next session check to report back, skipping other events.
    async fn next_session_check(rx: &mut mpsc::UnboundedReceiver<UiEvent>) {
        let wait = async {
            loop {
                match rx.recv().await {
                    Some(UiEvent::Session(_)) => return,
                    Some(_) => continue,
                    None => panic!("channel closed"),
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("no session check was issued");
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(start: Route) -> (App, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        // Nothing listens here; spawned requests fail quietly in the background.
        let client = Client::new("http://127.0.0.1:9")
            .unwrap()
            .with_retry_policy(RetryPolicy {
                max_attempts: 1,
                ..RetryPolicy::default()
            });
        let app = App::new(client, SoundEffects::disabled(), tx, start, true);
        (app, rx)
    }

    fn user(is_banned: bool) -> User {
        User {
            id: 42,
            username: "alice".into(),
            balance: Coins::from_hundredths(150_075),
            is_banned,
        }
    }

    #[tokio::test]
    async fn signed_out_start_lands_on_auth() {
        let (mut app, _rx) = app(Route::Cups);
        app.handle_ui_event(UiEvent::Session(Ok(None)));
        assert_eq!(app.route(), &Route::Auth);
        assert!(matches!(app.page(), Page::Auth(_)));
    }

    #[tokio::test]
    async fn banned_user_is_confined() {
        let (mut app, _rx) = app(Route::Leaderboard);
        app.handle_ui_event(UiEvent::Session(Ok(Some(user(true)))));
        assert_eq!(app.route(), &Route::Banned);

        app.apply(vec![Action::Navigate(Route::Cups)]);
        assert_eq!(app.route(), &Route::Banned);
    }

    #[tokio::test]
    async fn sign_in_leaves_auth_page() {
        let (mut app, _rx) = app(Route::Auth);
        app.handle_ui_event(UiEvent::Session(Ok(None)));
        assert_eq!(app.route(), &Route::Auth);

        app.handle_ui_event(UiEvent::AuthFinished {
            mode: AuthMode::Login,
            result: Ok(user(false)),
        });
        app.handle_ui_event(UiEvent::Session(Ok(Some(user(false)))));
        assert_eq!(app.route(), &Route::Landing);
        assert_eq!(app.session().balance(), Some(Coins::from_hundredths(150_075)));
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let (mut app, _rx) = app(Route::Landing);
        app.handle_ui_event(UiEvent::Session(Ok(Some(user(false)))));
        app.handle_ui_event(UiEvent::LoggedOut(Err("Bad Gateway".into())));
        assert_eq!(app.session(), &Session::SignedOut);
        assert_eq!(app.route(), &Route::Auth);
    }

    #[tokio::test]
    async fn unknown_route_is_not_guarded() {
        let (mut app, _rx) = app(Route::parse("/nowhere"));
        app.handle_ui_event(UiEvent::Session(Ok(None)));
        assert_eq!(app.route(), &Route::NotFound("/nowhere".into()));
    }

    #[tokio::test]
    async fn stale_play_result_is_ignored_off_page() {
        let (mut app, _rx) = app(Route::Landing);
        app.handle_ui_event(UiEvent::Session(Ok(Some(user(false)))));
        app.handle_ui_event(UiEvent::PlayFinished {
            round: 1,
            result: Ok(PlayResponse {
                ball_position: 0,
                win_amount: Coins::from_hundredths(2_000),
            }),
        });
        assert!(app.toasts().is_empty());
        assert_eq!(app.route(), &Route::Landing);
    }

    #[tokio::test]
    async fn notifications_are_mirrored_to_log() {
        let (mut app, _rx) = app(Route::Leaderboard);
        app.handle_ui_event(UiEvent::Session(Ok(Some(user(false)))));
        app.handle_ui_event(UiEvent::Leaderboard(Err("Unable to reach the server".into())));
        assert_eq!(app.toasts().len(), 1);
        let last = app.logs().last().unwrap();
        assert!(last.ends_with("Leaderboard unavailable: Unable to reach the server"));
    }

    #[tokio::test]
    async fn log_is_capped() {
        let (mut app, _rx) = app(Route::Landing);
        for i in 0..(MAX_LOG_LINES + 25) {
            app.push_log(format!("line {i}"));
        }
        assert_eq!(app.logs().len(), MAX_LOG_LINES);
        assert!(app.logs().last().unwrap().ends_with(&format!("line {}", MAX_LOG_LINES + 24)));
    }

    #[tokio::test]
    async fn header_shows_user_and_balance() {
        let (mut app, _rx) = app(Route::Landing);
        let text = render_to_text(100, 24, |f| app.draw(f));
        assert!(text.contains("Checking session"));

        app.handle_ui_event(UiEvent::Session(Ok(Some(user(false)))));
        let text = render_to_text(100, 24, |f| app.draw(f));
        assert!(text.contains("P COIN Casino | Home"));
        assert!(text.contains("alice"));
        assert!(text.contains("1,500.75"));
    }

    #[tokio::test]
    async fn play_result_after_leaving_refreshes_balance() {
        let (mut app, mut rx) = app(Route::Landing);
        app.handle_ui_event(UiEvent::Session(Ok(Some(user(false)))));

        app.handle_ui_event(UiEvent::PlayFinished {
            round: 1,
            result: Ok(PlayResponse {
                ball_position: 1,
                win_amount: Coins::from_hundredths(2_000),
            }),
        });
        next_session_check(&mut rx).await;
    }

    #[tokio::test]
    async fn leaving_during_reveal_refreshes_balance() {
        let (mut app, mut rx) = app(Route::Landing);
        app.handle_ui_event(UiEvent::Session(Ok(Some(user(false)))));
        app.apply(vec![Action::Navigate(Route::Cups)]);
        // Opening the game fetches a fresh balance.
        next_session_check(&mut rx).await;

        assert!(!app.handle_key(key(KeyCode::Enter)));
        assert!(!app.handle_key(key(KeyCode::Char('2'))));
        let Page::Cups(cups) = app.page() else {
            panic!("expected the cups page");
        };
        let round = cups.game().round();
        app.handle_ui_event(UiEvent::PlayFinished {
            round,
            result: Ok(PlayResponse {
                ball_position: 1,
                win_amount: Coins::from_hundredths(2_000),
            }),
        });
        let Page::Cups(cups) = app.page() else {
            panic!("expected the cups page");
        };
        assert_eq!(cups.game().phase(), Phase::Revealing);
        assert!(cups.reveal_pending());

        app.apply(vec![Action::Navigate(Route::Landing)]);
        assert_eq!(app.route(), &Route::Landing);
        next_session_check(&mut rx).await;
    }

    #[tokio::test]
    async fn ctrl_c_quits() {
        let (mut app, _rx) = app(Route::Landing);
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.handle_key(key));
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(!app.handle_key(key));
    }
}
