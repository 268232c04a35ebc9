use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of cups on the cups table.
pub const CUP_COUNT: usize = 3;

/// Games offered by the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Cups,
    Towers,
}

impl GameType {
    pub fn name(&self) -> &'static str {
        match self {
            GameType::Cups => "Cups",
            GameType::Towers => "Towers",
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cup index {0} out of range (expected 0..{CUP_COUNT})")]
pub struct InvalidCup(pub u8);

/// Position of a cup on the table, always in `0..CUP_COUNT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CupIndex(u8);

impl CupIndex {
    pub const ALL: [CupIndex; CUP_COUNT] = [CupIndex(0), CupIndex(1), CupIndex(2)];

    pub fn new(index: usize) -> Option<Self> {
        (index < CUP_COUNT).then_some(Self(index as u8))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for CupIndex {
    type Error = InvalidCup;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CupIndex::new(value as usize).ok_or(InvalidCup(value))
    }
}

impl From<CupIndex> for u8 {
    fn from(value: CupIndex) -> Self {
        value.0
    }
}

impl fmt::Display for CupIndex {
    /// Cups are numbered from one for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

/// Game-specific payload for a cups round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CupsPayload {
    pub selected_cup: CupIndex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cup_index_bounds() {
        assert_eq!(CupIndex::new(0).map(CupIndex::get), Some(0));
        assert_eq!(CupIndex::new(2).map(CupIndex::get), Some(2));
        assert!(CupIndex::new(3).is_none());
        assert_eq!(CupIndex::try_from(7u8), Err(InvalidCup(7)));
    }

    #[test]
    fn cup_index_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<CupIndex>("1").is_ok());
        assert!(serde_json::from_str::<CupIndex>("3").is_err());
    }

    #[test]
    fn game_type_wire_names() {
        assert_eq!(serde_json::to_string(&GameType::Cups).unwrap(), "\"cups\"");
        assert_eq!(
            serde_json::from_str::<GameType>("\"towers\"").unwrap(),
            GameType::Towers
        );
    }
}
