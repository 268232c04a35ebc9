//! P COIN amounts.
//!
//! Amounts are held as fixed-point hundredths so the client never does
//! floating point arithmetic on balances. The API speaks decimal strings
//! (`"12.50"`); some responses carry plain JSON numbers instead, which are
//! accepted and rounded to the nearest hundredth.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of fractional digits carried by an amount.
pub const DECIMALS: u32 = 2;

/// Hundredths per whole coin.
pub const SCALE: u64 = 10u64.pow(DECIMALS);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseCoinsError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must not be negative")]
    Negative,
    #[error("invalid amount: {0}")]
    Invalid(String),
    #[error("at most {DECIMALS} decimal places are allowed")]
    TooPrecise,
    #[error("amount is too large")]
    Overflow,
}

/// A non-negative amount of P COIN.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coins(u64);

impl Coins {
    pub const ZERO: Coins = Coins(0);

    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    pub fn from_whole(coins: u64) -> Option<Self> {
        coins.checked_mul(SCALE).map(Self)
    }

    pub const fn hundredths(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn whole(self) -> u64 {
        self.0 / SCALE
    }

    pub fn fraction(self) -> u64 {
        self.0 % SCALE
    }

    /// Convert a JSON number into an amount, rounding to hundredths.
    fn from_f64(value: f64) -> Result<Self, ParseCoinsError> {
        if !value.is_finite() {
            return Err(ParseCoinsError::Invalid(value.to_string()));
        }
        if value < 0.0 {
            return Err(ParseCoinsError::Negative);
        }
        let scaled = (value * SCALE as f64).round();
        if scaled > u64::MAX as f64 {
            return Err(ParseCoinsError::Overflow);
        }
        Ok(Self(scaled as u64))
    }
}

impl FromStr for Coins {
    type Err = ParseCoinsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseCoinsError::Empty);
        }
        if s.starts_with('-') {
            return Err(ParseCoinsError::Negative);
        }
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseCoinsError::Invalid(s.to_string()));
        }
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !digits(whole) || !digits(fraction) {
            return Err(ParseCoinsError::Invalid(s.to_string()));
        }
        if fraction.len() > DECIMALS as usize {
            return Err(ParseCoinsError::TooPrecise);
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ParseCoinsError::Overflow)?
        };
        let mut fraction_value = 0u64;
        for (i, b) in fraction.bytes().enumerate() {
            let place = 10u64.pow(DECIMALS - 1 - i as u32);
            fraction_value += u64::from(b - b'0') * place;
        }
        whole
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(fraction_value))
            .map(Coins)
            .ok_or(ParseCoinsError::Overflow)
    }
}

impl fmt::Display for Coins {
    /// Canonical wire form: whole part, a dot, and exactly two decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.whole(), self.fraction())
    }
}

impl Serialize for Coins {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Unsigned(u64),
            Float(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(de::Error::custom),
            Raw::Unsigned(whole) => Coins::from_whole(whole)
                .ok_or_else(|| de::Error::custom(ParseCoinsError::Overflow)),
            Raw::Float(value) => Coins::from_f64(value).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_decimal_strings() {
        assert_eq!("12".parse::<Coins>().unwrap(), Coins::from_hundredths(1200));
        assert_eq!("12.5".parse::<Coins>().unwrap(), Coins::from_hundredths(1250));
        assert_eq!("12.05".parse::<Coins>().unwrap(), Coins::from_hundredths(1205));
        assert_eq!(".75".parse::<Coins>().unwrap(), Coins::from_hundredths(75));
        assert_eq!("3.".parse::<Coins>().unwrap(), Coins::from_hundredths(300));
        assert_eq!(" 0 ".parse::<Coins>().unwrap(), Coins::ZERO);
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!("".parse::<Coins>(), Err(ParseCoinsError::Empty));
        assert_eq!("-1".parse::<Coins>(), Err(ParseCoinsError::Negative));
        assert_eq!("1.234".parse::<Coins>(), Err(ParseCoinsError::TooPrecise));
        assert!(matches!("abc".parse::<Coins>(), Err(ParseCoinsError::Invalid(_))));
        assert!(matches!("1.2.3".parse::<Coins>(), Err(ParseCoinsError::Invalid(_))));
        assert!(matches!(".".parse::<Coins>(), Err(ParseCoinsError::Invalid(_))));
        assert!(matches!("1e3".parse::<Coins>(), Err(ParseCoinsError::Invalid(_))));
        assert_eq!(
            "184467440737095516.16".parse::<Coins>(),
            Err(ParseCoinsError::Overflow)
        );
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Coins::from_hundredths(0).to_string(), "0.00");
        assert_eq!(Coins::from_hundredths(5).to_string(), "0.05");
        assert_eq!(Coins::from_hundredths(123_456).to_string(), "1234.56");
    }

    #[test]
    fn deserializes_strings_and_numbers() {
        let from_text: Coins = serde_json::from_str("\"10.50\"").unwrap();
        let from_int: Coins = serde_json::from_str("10").unwrap();
        let from_float: Coins = serde_json::from_str("10.499").unwrap();
        assert_eq!(from_text, Coins::from_hundredths(1050));
        assert_eq!(from_int, Coins::from_hundredths(1000));
        assert_eq!(from_float, Coins::from_hundredths(1050));
        assert!(serde_json::from_str::<Coins>("-3").is_err());
        assert!(serde_json::from_str::<Coins>("\"ten\"").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Coins::from_hundredths(2500)).unwrap();
        assert_eq!(json, "\"25.00\"");
    }

    proptest! {
        #[test]
        fn display_then_parse_is_identity(hundredths in 0u64..=u64::MAX / 2) {
            let coins = Coins::from_hundredths(hundredths);
            prop_assert_eq!(coins.to_string().parse::<Coins>().unwrap(), coins);
        }

        #[test]
        fn ordering_follows_hundredths(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let (x, y) = (Coins::from_hundredths(a), Coins::from_hundredths(b));
            prop_assert_eq!(x <= y, a <= b);
        }
    }
}
