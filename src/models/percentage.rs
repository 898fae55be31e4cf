//! Percentage share of a deposit
//!
//! Stored as hundredths of a percent (basis points) so shares like 33.33%
//! stay exact.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Basis points in 100%
pub const FULL_BASIS_POINTS: i32 = 10_000;

/// A percentage with two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(i32);

impl Percentage {
    /// 0%
    pub const fn zero() -> Self {
        Self(0)
    }

    /// From hundredths of a percent (5000 = 50%)
    pub const fn from_basis_points(points: i32) -> Self {
        Self(points)
    }

    /// From a whole percentage (50 = 50%)
    pub const fn from_whole(percent: i32) -> Self {
        Self(percent * 100)
    }

    /// Hundredths of a percent
    pub const fn basis_points(&self) -> i32 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// True for values within 0%..=100%
    pub const fn is_valid(&self) -> bool {
        self.0 >= 0 && self.0 <= FULL_BASIS_POINTS
    }

    /// This percentage of `amount`, rounded half away from zero to the cent
    pub fn of(&self, amount: Money) -> Money {
        amount.mul_ratio(i64::from(self.0), i64::from(FULL_BASIS_POINTS))
    }

    /// Parse "30", "30%", "33.33" or "12.5"
    pub fn parse(s: &str) -> Result<Self, PercentageParseError> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        let invalid = || PercentageParseError(s.to_string());

        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() || fraction.len() > 2 {
            return Err(invalid());
        }

        let whole: i32 = whole.parse().map_err(|_| invalid())?;
        let fraction: i32 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i32>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let points = whole
            .checked_mul(100)
            .and_then(|p| p.checked_add(fraction))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -points } else { points }))
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        if abs % 100 == 0 {
            write!(f, "{}{}%", sign, abs / 100)
        } else {
            write!(f, "{}{}.{:02}%", sign, abs / 100, abs % 100)
        }
    }
}

impl std::iter::Sum for Percentage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

/// Error type for percentage parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PercentageParseError(String);

impl fmt::Display for PercentageParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid percentage: {}", self.0)
    }
}

impl std::error::Error for PercentageParseError {}
