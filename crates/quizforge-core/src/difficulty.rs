//! The `Difficulty` value object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A difficulty level from 1 (very easy) to 5 (very hard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Create a difficulty from an integer level.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::OutOfRange`] unless `level` is in `1..=5`.
    pub fn new(level: i64) -> DomainResult<Self> {
        if !(i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&level) {
            return Err(DomainError::out_of_range(format!(
                "Difficulty level must be an integer between {} and {}, got {level}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(level as u8))
    }

    pub const fn very_easy() -> Self {
        Self(1)
    }

    pub const fn easy() -> Self {
        Self(2)
    }

    pub const fn medium() -> Self {
        Self(3)
    }

    pub const fn hard() -> Self {
        Self(4)
    }

    pub const fn very_hard() -> Self {
        Self(5)
    }

    /// The numeric level.
    pub const fn level(self) -> u8 {
        self.0
    }

    /// The alias for this level, e.g. `very_easy`.
    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "very_easy",
            2 => "easy",
            3 => "medium",
            4 => "hard",
            _ => "very_hard",
        }
    }

    pub fn is_harder_than(self, other: Difficulty) -> bool {
        self > other
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::medium()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.0)
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    /// Accepts a level (`"3"`) or an alias (`"very-easy"`, `"very_easy"`, `"Hard"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "very_easy" => Ok(Self::very_easy()),
            "easy" => Ok(Self::easy()),
            "medium" => Ok(Self::medium()),
            "hard" => Ok(Self::hard()),
            "very_hard" => Ok(Self::very_hard()),
            other => match other.parse::<i64>() {
                Ok(level) => Self::new(level),
                Err(_) => Err(DomainError::validation(format!(
                    "unknown difficulty: {s}"
                ))),
            },
        }
    }
}

impl TryFrom<i64> for Difficulty {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}
