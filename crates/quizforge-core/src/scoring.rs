//! Point validation, rounding, and partial-credit arithmetic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::kind::ProblemType;

/// Upper bound for the point value of a single answer.
pub const MAX_POINTS: f64 = 1000.0;

/// Fail unless `points` is finite and within `0..=MAX_POINTS`.
pub fn validate_points(points: f64) -> DomainResult<()> {
    if !points.is_finite() {
        return Err(DomainError::out_of_range("Points must be a finite number"));
    }
    if !(0.0..=MAX_POINTS).contains(&points) {
        return Err(DomainError::out_of_range(format!(
            "Points must be between 0 and {MAX_POINTS}, got {points}"
        )));
    }
    Ok(())
}

/// How a fractional partial score becomes a stored score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingStrategy {
    #[default]
    Round,
    Floor,
    Ceil,
}

impl RoundingStrategy {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            // Scores are never negative, so half-away-from-zero is half-up.
            RoundingStrategy::Round => value.round(),
            RoundingStrategy::Floor => value.floor(),
            RoundingStrategy::Ceil => value.ceil(),
        }
    }
}

impl fmt::Display for RoundingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingStrategy::Round => write!(f, "round"),
            RoundingStrategy::Floor => write!(f, "floor"),
            RoundingStrategy::Ceil => write!(f, "ceil"),
        }
    }
}

impl FromStr for RoundingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "round" => Ok(RoundingStrategy::Round),
            "floor" => Ok(RoundingStrategy::Floor),
            "ceil" | "ceiling" => Ok(RoundingStrategy::Ceil),
            other => Err(format!("unknown rounding strategy: {other}")),
        }
    }
}

/// `correct / total * max_points`, rounded. Zero when `total` is zero.
pub fn calculate_partial_score(
    correct: usize,
    total: usize,
    max_points: f64,
    rounding: RoundingStrategy,
) -> f64 {
    if total == 0 {
        return 0.0;
    }
    rounding.apply(correct as f64 / total as f64 * max_points)
}

/// Zero out `score` when it is below `threshold` as a fraction of `max_points`.
pub fn apply_minimum_threshold(score: f64, max_points: f64, threshold: f64) -> f64 {
    if max_points <= 0.0 {
        return score;
    }
    if score / max_points < threshold {
        0.0
    } else {
        score
    }
}

/// Options for [`PartialScoringStrategy::calculate`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialScoringOptions {
    pub rounding: RoundingStrategy,
    pub minimum_threshold: Option<f64>,
}

/// Combines the partial-credit rules into one calculation.
pub struct PartialScoringStrategy;

impl PartialScoringStrategy {
    /// Score `correct` of `total` sub-items worth `max_points` together.
    ///
    /// Without partial credit only an exact match earns anything. With it, the
    /// proportional score is rounded and then gated by the optional threshold.
    pub fn calculate(
        correct: usize,
        total: usize,
        max_points: f64,
        allows_partial_credit: bool,
        options: PartialScoringOptions,
    ) -> f64 {
        if !allows_partial_credit {
            return if total > 0 && correct == total {
                max_points
            } else {
                0.0
            };
        }
        let score = calculate_partial_score(correct, total, max_points, options.rounding);
        match options.minimum_threshold {
            Some(threshold) => apply_minimum_threshold(score, max_points, threshold),
            None => score,
        }
    }
}

/// Per-variant partial-credit defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartialCreditPolicy {
    /// All-or-nothing scoring.
    NotEligible,
    /// Partial credit allowed by default, zeroed under `minimum_threshold`.
    Eligible { minimum_threshold: f64 },
    /// Scored by a person; no automatic policy applies.
    Manual,
}

impl PartialCreditPolicy {
    pub fn is_eligible(self) -> bool {
        matches!(self, PartialCreditPolicy::Eligible { .. })
    }

    pub fn minimum_threshold(self) -> Option<f64> {
        match self {
            PartialCreditPolicy::Eligible { minimum_threshold } => Some(minimum_threshold),
            _ => None,
        }
    }
}

/// The default partial-credit policy for each variant.
pub fn partial_credit_defaults(kind: ProblemType) -> PartialCreditPolicy {
    match kind {
        ProblemType::Matching => PartialCreditPolicy::Eligible {
            minimum_threshold: 0.3,
        },
        ProblemType::FillBlank => PartialCreditPolicy::Eligible {
            minimum_threshold: 0.5,
        },
        ProblemType::Ordering => PartialCreditPolicy::Eligible {
            minimum_threshold: 0.4,
        },
        ProblemType::MultipleChoice | ProblemType::ShortAnswer | ProblemType::TrueFalse => {
            PartialCreditPolicy::NotEligible
        }
        ProblemType::LongAnswer => PartialCreditPolicy::Manual,
    }
}
