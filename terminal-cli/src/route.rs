use crate::session::Session;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Landing,
    Auth,
    Leaderboard,
    Cups,
    Towers,
    Banned,
    NotFound(String),
}

const ROUTES: [(&str, Route); 6] = [
    ("/", Route::Landing),
    ("/auth", Route::Auth),
    ("/leaderboard", Route::Leaderboard),
    ("/games/cups", Route::Cups),
    ("/games/towers", Route::Towers),
    ("/banned", Route::Banned),
];

impl Route {
    /// Resolve a path. Trailing slashes are ignored; unknown paths are not-found.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        ROUTES
            .iter()
            .find(|(p, _)| *p == normalized)
            .map(|(_, r)| r.clone())
            .unwrap_or_else(|| Route::NotFound(trimmed.to_string()))
    }

    pub fn path(&self) -> &str {
        match self {
            Route::NotFound(path) => path,
            route => ROUTES
                .iter()
                .find(|(_, r)| r == route)
                .map(|(p, _)| *p)
                .unwrap_or("/"),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Home",
            Route::Auth => "Sign In",
            Route::Leaderboard => "Leaderboard",
            Route::Cups => "Cups",
            Route::Towers => "Towers",
            Route::Banned => "Account Suspended",
            Route::NotFound(_) => "Not Found",
        }
    }

    /// Routes that need a signed-in user.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Auth | Route::NotFound(_))
    }

    /// Where a visit to this route should land given the session, if elsewhere.
    pub fn redirect(&self, session: &Session) -> Option<Route> {
        if matches!(self, Route::NotFound(_)) {
            return None;
        }
        match session {
            Session::Checking => None,
            Session::SignedOut if self.is_protected() => Some(Route::Auth),
            Session::SignedOut => None,
            Session::SignedIn(user) if user.is_banned => {
                (*self != Route::Banned).then_some(Route::Banned)
            }
            Session::SignedIn(_) => {
                matches!(self, Route::Auth | Route::Banned).then_some(Route::Landing)
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcoin_types::{Coins, User};

    fn signed_in(is_banned: bool) -> Session {
        Session::SignedIn(User {
            id: 1,
            username: "alice".into(),
            balance: Coins::from_hundredths(10_000),
            is_banned,
        })
    }

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::Landing);
        assert_eq!(Route::parse(""), Route::Landing);
        assert_eq!(Route::parse("/games/cups/"), Route::Cups);
        assert_eq!(Route::parse("/leaderboard"), Route::Leaderboard);
        assert_eq!(
            Route::parse("/games/slots"),
            Route::NotFound("/games/slots".into())
        );
    }

    #[test]
    fn path_round_trips() {
        for (path, route) in ROUTES.iter() {
            assert_eq!(route.path(), *path);
            assert_eq!(&Route::parse(path), route);
        }
        assert_eq!(Route::NotFound("/nope".into()).path(), "/nope");
    }

    #[test]
    fn signed_out_users_go_to_auth() {
        let session = Session::SignedOut;
        assert_eq!(Route::Cups.redirect(&session), Some(Route::Auth));
        assert_eq!(Route::Landing.redirect(&session), Some(Route::Auth));
        assert_eq!(Route::Banned.redirect(&session), Some(Route::Auth));
        assert_eq!(Route::Auth.redirect(&session), None);
        assert_eq!(Route::NotFound("/x".into()).redirect(&session), None);
    }

    #[test]
    fn signed_in_users_skip_auth() {
        let session = signed_in(false);
        assert_eq!(Route::Auth.redirect(&session), Some(Route::Landing));
        assert_eq!(Route::Banned.redirect(&session), Some(Route::Landing));
        assert_eq!(Route::Leaderboard.redirect(&session), None);
    }

    #[test]
    fn banned_users_are_confined() {
        let session = signed_in(true);
        assert_eq!(Route::Cups.redirect(&session), Some(Route::Banned));
        assert_eq!(Route::Auth.redirect(&session), Some(Route::Banned));
        assert_eq!(Route::Banned.redirect(&session), None);
    }

    #[test]
    fn nothing_redirects_while_checking() {
        assert_eq!(Route::Cups.redirect(&Session::Checking), None);
    }
}
