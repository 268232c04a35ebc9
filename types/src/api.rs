//! Request and response bodies exchanged with the API server.

use crate::{Coins, CupIndex, CupsPayload, GameType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/games/play`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRequest {
    pub game_type: GameType,
    pub bet_amount: Coins,
    pub game_data: CupsPayload,
}

impl PlayRequest {
    pub fn cups(bet_amount: Coins, selected_cup: CupIndex) -> Self {
        Self {
            game_type: GameType::Cups,
            bet_amount,
            game_data: CupsPayload { selected_cup },
        }
    }
}

/// Outcome of a round as decided by the server.
///
/// The ball position is kept raw here; the game validates it before showing
/// anything so a malformed response can never surface as a result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResponse {
    pub ball_position: u8,
    pub win_amount: Coins,
}

/// One row of `GET /api/leaderboard`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: u64,
    pub username: String,
    pub total_winnings: Coins,
    pub games_played: u64,
    pub biggest_win: Coins,
    /// Percentage of rounds won, 0..=100.
    pub win_rate: f64,
    pub last_updated: DateTime<Utc>,
}

/// Signed-in user as returned by `GET /api/user` and the auth endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub balance: Coins,
    #[serde(default)]
    pub is_banned: bool,
}

/// Body of `POST /api/login` and `POST /api/register`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Error body returned by the server on failed requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
