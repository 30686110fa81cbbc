//! Two-decimal money totals using decimal arithmetic.
//!
//! Every total the dashboard shows is rounded exactly once, on the exact
//! decimal sum, to 2 places with round-half-away-from-zero. Currency symbols
//! are a presentation concern and are not part of this type.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

/// Number of decimal places every displayed total carries.
pub const MONEY_SCALE: u32 = 2;

/// A monetary total rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Round an exact decimal amount to 2 places (half away from zero).
    #[must_use]
    pub fn from_decimal(amount: Decimal) -> Self {
        let rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        // -0.001 rounds to a negative zero; show it as plain zero.
        if rounded.is_zero() {
            return Self::ZERO;
        }
        Self(rounded)
    }

    /// Sum exact amounts, then round the total once.
    #[must_use]
    pub fn sum_of<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        Self::from_decimal(amounts.into_iter().sum())
    }

    /// The rounded amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this total is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Format for display with a currency symbol (e.g., "£19.99").
    #[must_use]
    pub fn display_with(&self, symbol: &str) -> String {
        if self.0.is_sign_negative() && !self.0.is_zero() {
            format!("-{symbol}{}", Self(-self.0))
        } else {
            format!("{symbol}{self}")
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut padded = self.0;
        padded.rescale(MONEY_SCALE);
        write!(f, "{padded}")
    }
}

// Totals leave the engine as "150.00" strings so no float ever touches them.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_decimal(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(Money::from_decimal(dec("0.125")).to_string(), "0.13");
        assert_eq!(Money::from_decimal(dec("0.005")).to_string(), "0.01");
        assert_eq!(Money::from_decimal(dec("-0.005")).to_string(), "-0.01");
        assert_eq!(Money::from_decimal(dec("2.344")).to_string(), "2.34");
        assert_eq!(Money::from_decimal(dec("-0.001")).display_with("£"), "£0.00");
    }

    #[test]
    fn test_sum_rounds_once() {
        let total = Money::sum_of([dec("0.005"), dec("0.005")]);
        assert_eq!(total.to_string(), "0.01");
    }

    #[test]
    fn test_display_pads_to_two_places() {
        assert_eq!(Money::from_decimal(dec("150")).to_string(), "150.00");
        assert_eq!(Money::from_decimal(dec("10.5")).to_string(), "10.50");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_display_with_symbol() {
        assert_eq!(Money::from_decimal(dec("30")).display_with("£"), "£30.00");
        assert_eq!(Money::from_decimal(dec("-10")).display_with("£"), "-£10.00");
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::from_decimal(dec("150"))).unwrap();
        assert_eq!(json, "\"150.00\"");
    }
}
