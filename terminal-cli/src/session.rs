use pcoin_types::{Coins, User};

/// What the shell knows about the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    /// The first session check has not answered yet.
    #[default]
    Checking,
    SignedOut,
    SignedIn(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    /// Last balance reported by the server.
    pub fn balance(&self) -> Option<Coins> {
        self.user().map(|u| u.balance)
    }
}
