//! Amount type for handling monetary values typed in by the user.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may include a leading currency symbol and thousands separators.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a monetary amount.
///
/// Parsing accepts an optional sign, an optional single currency symbol and commas as thousands
/// separators. Anything that is not a finite decimal number is rejected.
///
/// # Examples
///
/// ```
/// # use finance_tracker::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("₹1,000.50").unwrap();
/// let b = Amount::from_str("1000.5").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "1,000.50");
/// assert_eq!(a.format("₹"), "₹1,000.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Formats the amount with two decimal places, thousands separators and `symbol` placed after
    /// the sign, e.g. `-₹60,000.00`.
    pub fn format(&self, symbol: &str) -> String {
        format_decimal(self.0, symbol)
    }
}

/// Formats `value` the same way `Amount::format` does. Totals are plain `Decimal` values, so the
/// presentation layer uses this directly.
pub fn format_decimal(value: Decimal, symbol: &str) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let num = value.abs().to_f64().unwrap_or_default();
    format!("{sign}{symbol}{}", format_num::format_num!(",.2", num))
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountError(String);

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid amount", self.0)
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AmountError(s.to_string());
        let trimmed = s.trim();

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        // A single leading currency symbol, e.g. "$50" or "₹50"
        let unsigned = match unsigned.chars().next() {
            Some(c) if is_currency_symbol(c) => &unsigned[c.len_utf8()..],
            _ => unsigned,
        };

        let digits = unsigned.replace(',', "");
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(err());
        }

        let value = Decimal::from_str(&digits).map_err(|_| err())?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

fn is_currency_symbol(c: char) -> bool {
    matches!(c, '$' | '₹' | '€' | '£' | '¥')
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(""))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // The plain decimal string keeps full precision, unlike `Display`.
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("150.5").unwrap();
        assert_eq!(amount.value(), dec("150.5"));
    }

    #[test]
    fn test_parse_with_currency_symbol() {
        assert_eq!(Amount::from_str("$50.00").unwrap().value(), dec("50"));
        assert_eq!(Amount::from_str("₹50.00").unwrap().value(), dec("50"));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Amount::from_str("-₹50.00").unwrap().value(), dec("-50"));
        assert_eq!(Amount::from_str("-50").unwrap().value(), dec("-50"));
    }

    #[test]
    fn test_parse_whitespace_and_commas() {
        let amount = Amount::from_str("  $1,234,567.89  ").unwrap();
        assert_eq!(amount.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for s in ["", "   ", "abc", "12abc", "NaN", "inf", "1e5", "$", "--5", "1.2.3"] {
            assert!(Amount::from_str(s).is_err(), "expected '{s}' to be rejected");
        }
    }

    #[test]
    fn test_error_message() {
        let err = Amount::from_str("abc").unwrap_err();
        assert_eq!(err.to_string(), "'abc' is not a valid amount");
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(dec("1000")).to_string(), "1,000.00");
        assert_eq!(Amount::new(dec("-60000")).to_string(), "-60,000.00");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Amount::new(dec("200")).format("₹"), "₹200.00");
        assert_eq!(Amount::new(dec("-4.5")).format("$"), "-$4.50");
    }

    #[test]
    fn test_sign_predicates() {
        assert!(Amount::from_str("5").unwrap().is_positive());
        assert!(Amount::from_str("-5").unwrap().is_negative());
        let zero = Amount::from_str("0.00").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_serde() {
        let amount = Amount::from_str("150.5").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"150.5\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
