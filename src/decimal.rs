//! Signed monetary amounts as written in the export.
//!
//! KBC writes amounts with a decimal comma (`-12,50`). `Amount` normalizes
//! that to a `rust_decimal::Decimal`, keeping the scale found in the file so
//! `"-12,00"` prints back as `-12.00`.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// A signed decimal amount, exact to the digits present in the source.
///
/// # Examples
///
/// ```
/// use kbcbe_statement::Amount;
///
/// let amount = Amount::from_decimal_comma("123,45").unwrap();
/// assert_eq!(amount.to_string(), "123.45");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Parses text that uses `,` as decimal mark.
    ///
    /// Only the comma is rewritten; a `.` in the input is taken as a decimal
    /// point too, so thousands separators are rejected rather than guessed.
    pub fn from_decimal_comma(s: &str) -> std::result::Result<Self, rust_decimal::Error> {
        Amount::from_str(&s.replace(',', "."))
    }

    /// Returns `true` for amounts below zero (money leaving the account).
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Amount(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}
