use crossterm::event::{KeyCode, KeyEvent};
use pcoin_types::{Credentials, User};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;
use thiserror::Error;

use crate::app::Action;
use crate::notify::Notification;
use crate::sound::Effect;
use crate::widgets::MetallicButton;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    fn other(self) -> AuthMode {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Focus {
    Username,
    Password,
    Confirm,
    Submit,
    SwitchMode,
}

#[derive(Default)]
struct Fields {
    username: String,
    password: String,
    confirm: String,
}

pub struct AuthPage {
    mode: AuthMode,
    fields: Fields,
    focus: Focus,
    submitting: bool,
}

impl Default for AuthPage {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            fields: Fields::default(),
            focus: Focus::Username,
            submitting: false,
        }
    }
}

impl AuthPage {
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn focus_order(&self) -> &'static [Focus] {
        match self.mode {
            AuthMode::Login => &[
                Focus::Username,
                Focus::Password,
                Focus::Submit,
                Focus::SwitchMode,
            ],
            AuthMode::Register => &[
                Focus::Username,
                Focus::Password,
                Focus::Confirm,
                Focus::Submit,
                Focus::SwitchMode,
            ],
        }
    }

    fn move_focus(&mut self, delta: isize) {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let next = (idx + delta).rem_euclid(order.len() as isize);
        self.focus = order[next as usize];
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Username => Some(&mut self.fields.username),
            Focus::Password => Some(&mut self.fields.password),
            Focus::Confirm => Some(&mut self.fields.confirm),
            Focus::Submit | Focus::SwitchMode => None,
        }
    }

    pub fn type_str(&mut self, text: &str) {
        if let Some(field) = self.field_mut() {
            field.push_str(text);
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.other();
        self.fields.confirm.clear();
        self.focus = Focus::Username;
    }

    /// Wipe everything typed into the form.
    pub fn clear(&mut self) {
        self.fields = Fields::default();
        self.focus = Focus::Username;
    }

    /// Client-side checks run before any request is sent.
    pub fn validate(&self) -> Result<Credentials, FormError> {
        let f = &self.fields;
        let confirm_missing = self.mode == AuthMode::Register && f.confirm.is_empty();
        if f.username.trim().is_empty() || f.password.is_empty() || confirm_missing {
            return Err(FormError::MissingFields);
        }
        if self.mode == AuthMode::Register && f.password != f.confirm {
            return Err(FormError::PasswordMismatch);
        }
        Ok(Credentials {
            username: f.username.trim().to_string(),
            password: f.password.clone(),
        })
    }

    pub fn submit(&mut self) -> Vec<Action> {
        if self.submitting {
            return Vec::new();
        }
        match self.validate() {
            Ok(credentials) => {
                self.submitting = true;
                let request = match self.mode {
                    AuthMode::Login => Action::Login(credentials),
                    AuthMode::Register => Action::Register(credentials),
                };
                vec![Action::Sound(Effect::Click), request]
            }
            Err(err) => vec![Action::Notify(Notification::error(
                format!("{} failed", self.mode.title()),
                err.to_string(),
            ))],
        }
    }

    /// Outcome of the login or register request.
    pub fn on_finished(&mut self, mode: AuthMode, result: Result<User, String>) -> Vec<Action> {
        self.submitting = false;
        match result {
            Ok(user) => {
                self.clear();
                let title = match mode {
                    AuthMode::Login => "Welcome back",
                    AuthMode::Register => "Account created",
                };
                vec![
                    Action::Sound(Effect::Success),
                    Action::Notify(Notification::info(
                        title,
                        format!("Signed in as {}", user.username),
                    )),
                    Action::CheckSession,
                ]
            }
            Err(message) => vec![Action::Notify(Notification::error(
                format!("{} failed", mode.title()),
                message,
            ))],
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(1);
                Vec::new()
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(-1);
                Vec::new()
            }
            KeyCode::Enter => match self.focus {
                Focus::SwitchMode => {
                    self.toggle_mode();
                    vec![Action::Sound(Effect::Click)]
                }
                Focus::Submit => self.submit(),
                // Enter in the last text field submits; earlier ones advance.
                _ if self.focus_order()[self.focus_order().len() - 3] == self.focus => {
                    self.submit()
                }
                _ => {
                    self.move_focus(1);
                    Vec::new()
                }
            },
            KeyCode::Backspace => {
                if let Some(field) = self.field_mut() {
                    field.pop();
                }
                Vec::new()
            }
            KeyCode::Char(ch) => {
                if let Some(field) = self.field_mut() {
                    field.push(ch);
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let rows: u16 = match self.mode {
            AuthMode::Login => 14,
            AuthMode::Register => 17,
        };
        let form = centered(area, 52, rows);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" P COIN {} ", self.mode.title()));
        let inner = block.inner(form);
        f.render_widget(block, form);

        let mut constraints = vec![Constraint::Length(3), Constraint::Length(3)];
        if self.mode == AuthMode::Register {
            constraints.push(Constraint::Length(3));
        }
        constraints.extend([Constraint::Length(3), Constraint::Min(1)]);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let masked = |s: &str| "•".repeat(s.chars().count());
        let mut slot = 0;
        self.render_field(f, chunks[slot], "Username", &self.fields.username, Focus::Username);
        slot += 1;
        self.render_field(
            f,
            chunks[slot],
            "Password",
            &masked(&self.fields.password),
            Focus::Password,
        );
        slot += 1;
        if self.mode == AuthMode::Register {
            self.render_field(
                f,
                chunks[slot],
                "Confirm Password",
                &masked(&self.fields.confirm),
                Focus::Confirm,
            );
            slot += 1;
        }

        let submit_label = match (self.submitting, self.mode) {
            (true, _) => "Please wait…",
            (false, AuthMode::Login) => "Login",
            (false, AuthMode::Register) => "Create Account",
        };
        let button_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(20), Constraint::Min(0)])
            .split(chunks[slot]);
        f.render_widget(
            MetallicButton::new(submit_label)
                .focused(self.focus == Focus::Submit)
                .disabled(self.submitting),
            button_row[0],
        );
        slot += 1;

        let switch_text = match self.mode {
            AuthMode::Login => "Need an account? Register",
            AuthMode::Register => "Already have an account? Login",
        };
        let switch_style = if self.focus == Focus::SwitchMode {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        f.render_widget(
            Paragraph::new(Line::styled(switch_text, switch_style)).alignment(Alignment::Center),
            chunks[slot],
        );
    }

    fn render_field(&self, f: &mut Frame, area: Rect, label: &str, value: &str, focus: Focus) {
        let focused = self.focus == focus;
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let cursor = if focused { "_" } else { "" };
        let field = Paragraph::new(Line::from(vec![
            Span::raw(value.to_string()),
            Span::styled(cursor, Style::default().fg(Color::Yellow)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(label.to_string()),
        );
        f.render_widget(field, area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
