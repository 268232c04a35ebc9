//! Cups round state machine.
//!
//! ```text
//! betting --start--> selecting --pick cup--> revealing --reveal delay--> finished
//!    ^                                          |                           |
//!    +------------- request failed -------------+                           |
//!    +------------------------------ play again ----------------------------+
//! ```
//!
//! The server decides where the ball is and what the round pays. This type
//! only validates the bet locally (advisory), tracks which round is current,
//! and refuses anything that does not fit the current phase.

use pcoin_types::{Coins, CupIndex, ParseCoinsError, PlayRequest, PlayResponse};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// How long the revealed ball stays on screen before the round finishes.
pub const REVEAL_DELAY: Duration = Duration::from_secs(2);

pub const DEFAULT_BET: &str = "10";

const MAX_BET_INPUT: usize = 16;

// Round ids are unique for the whole process so a response for a round that
// belonged to a page since torn down can never match a newer round.
static NEXT_ROUND: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Betting,
    Selecting,
    Revealing,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub won: bool,
    pub win_amount: Coins,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BetError {
    #[error("Please enter a valid bet amount ({0})")]
    Invalid(#[from] ParseCoinsError),
    #[error("Bet amount must be greater than zero")]
    NotPositive,
    #[error("Insufficient balance: bet {bet} exceeds balance {balance}")]
    ExceedsBalance { bet: Coins, balance: Coins },
    #[error("Balance is still loading")]
    BalanceUnknown,
    #[error("A round is already in progress")]
    RoundInProgress,
}

/// What a play response did to the round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Result accepted; the reveal delay should start now.
    Revealed(Outcome),
    /// The round was abandoned and the game is back to betting.
    Aborted(String),
    /// Not for the current round, or the round is not waiting on a response.
    Ignored,
}

#[derive(Debug)]
pub struct CupsRound {
    bet_input: String,
    bet: Option<Coins>,
    selected_cup: Option<CupIndex>,
    ball_position: Option<CupIndex>,
    outcome: Option<Outcome>,
    phase: Phase,
    round: u64,
}

impl Default for CupsRound {
    fn default() -> Self {
        Self {
            bet_input: DEFAULT_BET.to_string(),
            bet: None,
            selected_cup: None,
            ball_position: None,
            outcome: None,
            phase: Phase::Betting,
            round: 0,
        }
    }
}

impl CupsRound {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn bet_input(&self) -> &str {
        &self.bet_input
    }

    /// Bet confirmed for the current round.
    pub fn bet(&self) -> Option<Coins> {
        self.bet
    }

    pub fn selected_cup(&self) -> Option<CupIndex> {
        self.selected_cup
    }

    pub fn ball_position(&self) -> Option<CupIndex> {
        self.ball_position
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Type into the bet field. Only digits and one dot, only while betting.
    pub fn push_bet_char(&mut self, ch: char) -> bool {
        if self.phase != Phase::Betting || self.bet_input.len() >= MAX_BET_INPUT {
            return false;
        }
        let accepted = ch.is_ascii_digit() || (ch == '.' && !self.bet_input.contains('.'));
        if accepted {
            self.bet_input.push(ch);
        }
        accepted
    }

    pub fn pop_bet_char(&mut self) {
        if self.phase == Phase::Betting {
            self.bet_input.pop();
        }
    }

    pub fn set_bet_input(&mut self, input: impl Into<String>) {
        if self.phase == Phase::Betting {
            self.bet_input = input.into();
        }
    }

    /// Validate the bet against the last known balance and open a new round.
    ///
    /// The check is advisory; the server has the final say on the play request.
    pub fn start(&mut self, balance: Option<Coins>) -> Result<Coins, BetError> {
        if self.phase != Phase::Betting {
            return Err(BetError::RoundInProgress);
        }
        let bet: Coins = self.bet_input.parse()?;
        if bet.is_zero() {
            return Err(BetError::NotPositive);
        }
        let balance = balance.ok_or(BetError::BalanceUnknown)?;
        if bet > balance {
            return Err(BetError::ExceedsBalance { bet, balance });
        }

        self.clear_round();
        self.bet = Some(bet);
        self.round = NEXT_ROUND.fetch_add(1, Ordering::Relaxed);
        self.phase = Phase::Selecting;
        Ok(bet)
    }

    /// Pick a cup. Returns the single play request for this round, or `None`
    /// when the game is not waiting for a pick.
    pub fn select_cup(&mut self, cup: CupIndex) -> Option<PlayRequest> {
        if self.phase != Phase::Selecting {
            return None;
        }
        let bet = self.bet?;
        self.selected_cup = Some(cup);
        self.phase = Phase::Revealing;
        Some(PlayRequest::cups(bet, cup))
    }

    /// Apply the play response for `round`.
    pub fn resolve(&mut self, round: u64, result: Result<PlayResponse, String>) -> Resolution {
        if round != self.round || self.phase != Phase::Revealing || self.outcome.is_some() {
            return Resolution::Ignored;
        }
        let response = match result {
            Ok(response) => response,
            Err(reason) => return self.abort(reason),
        };
        let Ok(ball) = CupIndex::try_from(response.ball_position) else {
            return self.abort(format!(
                "server returned invalid ball position {}",
                response.ball_position
            ));
        };
        let outcome = Outcome {
            won: !response.win_amount.is_zero(),
            win_amount: response.win_amount,
        };
        self.ball_position = Some(ball);
        self.outcome = Some(outcome);
        Resolution::Revealed(outcome)
    }

    /// End the reveal delay for `round`. Returns whether the round finished.
    pub fn finish_reveal(&mut self, round: u64) -> bool {
        if round != self.round || self.phase != Phase::Revealing || self.outcome.is_none() {
            return false;
        }
        self.phase = Phase::Finished;
        true
    }

    /// Return to betting after a finished round. The bet text is kept.
    pub fn play_again(&mut self) -> bool {
        if self.phase != Phase::Finished {
            return false;
        }
        self.clear_round();
        self.phase = Phase::Betting;
        true
    }

    fn abort(&mut self, reason: String) -> Resolution {
        self.clear_round();
        self.phase = Phase::Betting;
        Resolution::Aborted(reason)
    }

    fn clear_round(&mut self) {
        self.bet = None;
        self.selected_cup = None;
        self.ball_position = None;
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coins(hundredths: u64) -> Coins {
        Coins::from_hundredths(hundredths)
    }

    fn cup(i: usize) -> CupIndex {
        CupIndex::new(i).unwrap()
    }

    fn response(ball: u8, win: u64) -> Result<PlayResponse, String> {
        Ok(PlayResponse {
            ball_position: ball,
            win_amount: coins(win),
        })
    }

    fn selecting(bet: &str, balance: u64) -> CupsRound {
        let mut game = CupsRound::default();
        game.set_bet_input(bet);
        game.start(Some(coins(balance))).unwrap();
        game
    }

    #[test]
    fn full_winning_round() {
        let mut game = selecting("10", 10_000);
        assert_eq!(game.phase(), Phase::Selecting);

        let request = game.select_cup(cup(1)).expect("play request");
        assert_eq!(request, PlayRequest::cups(coins(1_000), cup(1)));
        assert_eq!(game.phase(), Phase::Revealing);

        let round = game.round();
        let resolution = game.resolve(round, response(1, 2_000));
        assert_eq!(
            resolution,
            Resolution::Revealed(Outcome {
                won: true,
                win_amount: coins(2_000)
            })
        );
        assert_eq!(game.phase(), Phase::Revealing);
        assert_eq!(game.ball_position(), Some(cup(1)));

        assert!(game.finish_reveal(round));
        assert_eq!(game.phase(), Phase::Finished);

        assert!(game.play_again());
        assert_eq!(game.phase(), Phase::Betting);
        assert_eq!(game.selected_cup(), None);
        assert_eq!(game.ball_position(), None);
        assert_eq!(game.outcome(), None);
        assert_eq!(game.bet_input(), "10");
    }

    #[test]
    fn zero_win_is_a_loss() {
        let mut game = selecting("5", 10_000);
        game.select_cup(cup(0)).unwrap();
        let resolution = game.resolve(game.round(), response(2, 0));
        assert_eq!(
            resolution,
            Resolution::Revealed(Outcome {
                won: false,
                win_amount: Coins::ZERO
            })
        );
    }

    #[test]
    fn failure_returns_to_betting_without_result() {
        let mut game = selecting("5", 10_000);
        game.select_cup(cup(2)).unwrap();
        let round = game.round();

        let resolution = game.resolve(round, Err("Insufficient balance".into()));
        assert_eq!(resolution, Resolution::Aborted("Insufficient balance".into()));
        assert_eq!(game.phase(), Phase::Betting);
        assert_eq!(game.outcome(), None);
        assert_eq!(game.selected_cup(), None);

        // A late timer for the abandoned round cannot finish it.
        assert!(!game.finish_reveal(round));
        assert_eq!(game.phase(), Phase::Betting);
    }

    #[test]
    fn out_of_range_ball_aborts() {
        let mut game = selecting("5", 10_000);
        game.select_cup(cup(0)).unwrap();
        let resolution = game.resolve(game.round(), response(3, 500));
        assert!(matches!(resolution, Resolution::Aborted(_)));
        assert_eq!(game.phase(), Phase::Betting);
        assert_eq!(game.ball_position(), None);
    }

    #[test]
    fn selecting_outside_selecting_phase_is_noop() {
        let mut game = CupsRound::default();
        assert!(game.select_cup(cup(0)).is_none());
        assert_eq!(game.phase(), Phase::Betting);

        let mut game = selecting("5", 10_000);
        game.select_cup(cup(0)).unwrap();
        // Clicking again while revealing must not produce a second request.
        assert!(game.select_cup(cup(1)).is_none());
        assert_eq!(game.selected_cup(), Some(cup(0)));
    }

    #[test]
    fn stale_responses_are_ignored() {
        let mut game = selecting("5", 10_000);
        game.select_cup(cup(0)).unwrap();
        let round = game.round();
        assert_eq!(game.resolve(round + 1, response(0, 0)), Resolution::Ignored);
        assert_eq!(game.resolve(round, response(0, 0)), Resolution::Revealed(Outcome {
            won: false,
            win_amount: Coins::ZERO,
        }));
        // Duplicate delivery for the same round.
        assert_eq!(game.resolve(round, response(1, 900)), Resolution::Ignored);
        assert_eq!(game.ball_position(), Some(cup(0)));
    }

    #[test]
    fn finish_requires_a_result() {
        let mut game = selecting("5", 10_000);
        game.select_cup(cup(0)).unwrap();
        assert!(!game.finish_reveal(game.round()));
        assert_eq!(game.phase(), Phase::Revealing);
    }

    #[test]
    fn start_resets_previous_round() {
        let mut game = selecting("5", 10_000);
        game.select_cup(cup(2)).unwrap();
        let round = game.round();
        game.resolve(round, response(1, 0));
        game.finish_reveal(round);
        game.play_again();

        game.start(Some(coins(10_000))).unwrap();
        assert_eq!(game.phase(), Phase::Selecting);
        assert!(game.round() > round);
        assert_eq!(game.selected_cup(), None);
        assert_eq!(game.ball_position(), None);
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn start_rejects_bad_bets() {
        let mut game = CupsRound::default();
        game.set_bet_input("abc");
        assert!(matches!(game.start(Some(coins(100))), Err(BetError::Invalid(_))));
        game.set_bet_input("");
        assert!(matches!(game.start(Some(coins(100))), Err(BetError::Invalid(_))));
        game.set_bet_input("10");
        assert_eq!(game.start(None), Err(BetError::BalanceUnknown));
        assert_eq!(game.phase(), Phase::Betting);
        assert_eq!(game.round(), 0);
    }

    #[test]
    fn start_only_from_betting() {
        let mut game = selecting("5", 10_000);
        assert_eq!(game.start(Some(coins(10_000))), Err(BetError::RoundInProgress));
    }

    #[test]
    fn bet_field_accepts_decimal_input() {
        let mut game = CupsRound::default();
        game.set_bet_input("");
        for ch in "12.5.0x".chars() {
            game.push_bet_char(ch);
        }
        assert_eq!(game.bet_input(), "12.50");
        game.pop_bet_char();
        assert_eq!(game.bet_input(), "12.5");

        game.start(Some(coins(10_000))).unwrap();
        assert!(!game.push_bet_char('1'));
        assert_eq!(game.bet_input(), "12.5");
    }

    proptest! {
        #[test]
        fn invalid_amounts_never_start(bet in 0u64..2_000_000, balance in 0u64..1_000_000) {
            let mut game = CupsRound::default();
            game.set_bet_input(Coins::from_hundredths(bet).to_string());
            let result = game.start(Some(Coins::from_hundredths(balance)));
            if bet == 0 || bet > balance {
                prop_assert!(result.is_err());
                prop_assert_eq!(game.phase(), Phase::Betting);
            } else {
                prop_assert_eq!(result, Ok(Coins::from_hundredths(bet)));
                prop_assert_eq!(game.phase(), Phase::Selecting);
            }
        }
    }
}
