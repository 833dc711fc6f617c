//! Fixed-point monetary amounts.
//!
//! All monetary values in the engine are unsigned integers with 8 implied
//! decimal places (scale 1e8), matching the external token's own precision.
//! Arithmetic is checked everywhere a user-supplied operand is involved;
//! floats never touch money.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of raw units per whole token (8 implied decimals).
pub const SCALE: u128 = 100_000_000;

/// Basis-point denominator for fee computation.
pub const BPS_DENOM: u128 = 10_000;

/// An unsigned fixed-point monetary amount, scale 1e8.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(pub u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Build from raw scaled units (e.g. 100_000_000 == 1.0).
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Build from a whole-token count.
    pub const fn from_whole(tokens: u128) -> Self {
        Self(tokens * SCALE)
    }

    pub const fn raw(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    /// Multiply a per-unit price by a position quantity.
    pub fn checked_mul_qty(self, quantity: u64) -> Option<Amount> {
        self.0.checked_mul(quantity as u128).map(Amount)
    }

    /// Fee in basis points of this amount, rounded down.
    pub fn checked_fee_bps(self, bps: u16) -> Option<Amount> {
        self.0
            .checked_mul(bps as u128)
            .map(|raw| Amount(raw / BPS_DENOM))
    }

    pub fn min(self, other: Amount) -> Amount {
        Amount(self.0.min(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:08}", self.0 / SCALE, self.0 % SCALE)
    }
}

/// Parse error for decimal amount strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount '{0}': expected a non-negative decimal with at most 8 fraction digits")]
pub struct ParseAmountError(pub String);

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Parse a decimal string such as "1", "1.5", or "0.00000001" into raw
    /// scaled units. More than 8 fraction digits is an error, not a rounding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseAmountError(s.to_string());
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if frac.len() > 8 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| err())?
        };
        let frac_raw: u128 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<8}");
            padded.parse().map_err(|_| err())?
        };
        whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(frac_raw))
            .map(Amount)
            .ok_or_else(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_and_scale() {
        assert_eq!(Amount::from_whole(1), Amount::from_raw(100_000_000));
        assert_eq!(Amount::from_whole(1).to_string(), "1.00000000");
        assert_eq!(Amount::from_raw(110_000_000).to_string(), "1.10000000");
    }

    #[test]
    fn checked_mul_qty_detects_overflow() {
        let price = Amount::from_raw(u128::MAX / 2);
        assert!(price.checked_mul_qty(3).is_none());
        assert_eq!(
            Amount::from_whole(2).checked_mul_qty(5),
            Some(Amount::from_whole(10))
        );
    }

    #[test]
    fn fee_bps_rounds_down() {
        // 25 bps of 1.0 = 0.0025
        assert_eq!(
            Amount::from_whole(1).checked_fee_bps(25),
            Some(Amount::from_raw(250_000))
        );
        // 1 bps of the smallest unit rounds to zero
        assert_eq!(Amount::from_raw(1).checked_fee_bps(1), Some(Amount::ZERO));
    }

    #[test]
    fn parse_decimal_strings() {
        assert_eq!("1".parse::<Amount>().unwrap(), Amount::from_whole(1));
        assert_eq!(
            "1.1".parse::<Amount>().unwrap(),
            Amount::from_raw(110_000_000)
        );
        assert_eq!("0.00000001".parse::<Amount>().unwrap(), Amount::from_raw(1));
        assert!("1.123456789".parse::<Amount>().is_err());
        assert!("".parse::<Amount>().is_err());
        assert!("-1".parse::<Amount>().is_err());
        assert!("1.2e3".parse::<Amount>().is_err());
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        assert_eq!(
            Amount::from_whole(1).saturating_sub(Amount::from_whole(2)),
            Amount::ZERO
        );
    }
}
