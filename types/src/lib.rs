//! Types shared between the P COIN client and the API server.

pub mod api;
pub mod coins;
pub mod game;

pub use api::{Credentials, ErrorBody, LeaderboardEntry, PlayRequest, PlayResponse, User};
pub use coins::{Coins, ParseCoinsError};
pub use game::{CupIndex, CupsPayload, GameType, InvalidCup, CUP_COUNT};
