//! One view per route.

pub mod auth;
pub mod banned;
pub mod landing;
pub mod leaderboard;
pub mod not_found;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::app::Action;
use crate::games::cups::CupsPage;
use crate::games::towers::TowersPage;
use crate::route::Route;
use crate::session::Session;

pub use auth::{AuthMode, AuthPage};
pub use banned::BannedPage;
pub use landing::LandingPage;
pub use leaderboard::LeaderboardPage;
pub use not_found::NotFoundPage;

/// Shell state a page may read while handling input or drawing.
pub struct ViewContext<'a> {
    pub session: &'a Session,
    /// UI ticks since start, for animations.
    pub tick: u64,
}

pub enum Page {
    Landing(LandingPage),
    Auth(AuthPage),
    Leaderboard(LeaderboardPage),
    Cups(CupsPage),
    Towers(TowersPage),
    Banned(BannedPage),
    NotFound(NotFoundPage),
}

impl Page {
    /// Build the page for `route` along with the actions it runs on mount.
    pub fn for_route(route: &Route) -> (Page, Vec<Action>) {
        match route {
            Route::Landing => (Page::Landing(LandingPage::default()), Vec::new()),
            Route::Auth => (Page::Auth(AuthPage::default()), Vec::new()),
            Route::Leaderboard => (
                Page::Leaderboard(LeaderboardPage::default()),
                LeaderboardPage::mount(),
            ),
            // Bets are validated against the balance, so fetch a fresh one.
            Route::Cups => (Page::Cups(CupsPage::default()), vec![Action::RefreshBalance]),
            Route::Towers => (Page::Towers(TowersPage), Vec::new()),
            Route::Banned => (Page::Banned(BannedPage::default()), Vec::new()),
            Route::NotFound(path) => (Page::NotFound(NotFoundPage::new(path.clone())), Vec::new()),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &ViewContext) -> Vec<Action> {
        match self {
            Page::Landing(page) => page.handle_key(key),
            Page::Auth(page) => page.handle_key(key),
            Page::Leaderboard(page) => page.handle_key(key),
            Page::Cups(page) => page.handle_key(key, ctx),
            Page::Towers(page) => page.handle_key(key),
            Page::Banned(page) => page.handle_key(key),
            Page::NotFound(page) => page.handle_key(key),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, ctx: &ViewContext) {
        match self {
            Page::Landing(page) => page.render(f, area, ctx),
            Page::Auth(page) => page.render(f, area),
            Page::Leaderboard(page) => page.render(f, area, ctx.tick),
            Page::Cups(page) => page.render(f, area, ctx),
            Page::Towers(page) => page.render(f, area),
            Page::Banned(page) => page.render(f, area),
            Page::NotFound(page) => page.render(f, area),
        }
    }
}
