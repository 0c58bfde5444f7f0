//! Money type for representing expense amounts
//!
//! Amounts are stored in minor units (kopiyky, cents) as i64 so that totals
//! and threshold comparisons never suffer from floating-point drift. Bank
//! statements already report minor units; manual entries are parsed from
//! decimal text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A monetary amount in minor units of the single implicit currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create an amount from minor units
    ///
    /// # Examples
    /// ```
    /// use expense_tracker::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Largest amount accepted from user input (999 999 999.99)
    pub const MAX_INPUT: Money = Money(999_999_999_99);

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Minor-unit remainder (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Share of `total` expressed as a percentage, 0.0 when `total` is zero
    pub fn percentage_of(&self, total: Money) -> f64 {
        if total.is_zero() {
            return 0.0;
        }
        (self.0 as f64 / total.0 as f64) * 100.0
    }

    /// Parse an amount from user input
    ///
    /// Accepts "10.50", "10,50", "-10.50", "10", "10.5". Extra fractional
    /// digits beyond the second are truncated. Magnitudes above
    /// [`Money::MAX_INPUT`] are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(trimmed.to_string());

        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let body = body.replace(',', ".");

        let (whole, fraction) = match body.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (body.as_str(), ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction[..2].parse().map_err(|_| invalid())?,
        };

        let value = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .filter(|v| *v <= Self::MAX_INPUT.0)
            .ok_or_else(|| MoneyParseError::TooLarge(trimmed.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol prefix
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.format_with_symbol("");
        f.pad(&text)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    TooLarge(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid amount: '{}'", s),
            MoneyParseError::TooLarge(s) => {
                write!(f, "Amount too large: '{}' (maximum {})", s, Money::MAX_INPUT)
            }
        }
    }
}

impl std::error::Error for MoneyParseError {}
