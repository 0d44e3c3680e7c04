//! Behavioral metrics derived from the user's allocation history

use std::fmt;

use serde::{Deserialize, Serialize};

use super::stats::{mean, std_dev};
use crate::model::Allocation;
use crate::session::Prediction;

/// How much the user re-balanced between rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdaptiveBehavior {
    HighlyAdaptive,
    Adaptive,
    SlowAdapter,
    Static,
}

impl AdaptiveBehavior {
    /// Classify a mean per-round turnover (sum of absolute percentage changes)
    #[must_use]
    pub fn classify(mean_turnover: f64) -> Self {
        if mean_turnover > 120.0 {
            AdaptiveBehavior::HighlyAdaptive
        } else if mean_turnover > 60.0 {
            AdaptiveBehavior::Adaptive
        } else if mean_turnover > 25.0 {
            AdaptiveBehavior::SlowAdapter
        } else {
            AdaptiveBehavior::Static
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            AdaptiveBehavior::HighlyAdaptive => "Highly Adaptive",
            AdaptiveBehavior::Adaptive => "Adaptive",
            AdaptiveBehavior::SlowAdapter => "Slow Adapter",
            AdaptiveBehavior::Static => "Static",
        }
    }
}

impl fmt::Display for AdaptiveBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Investor profile from average equity exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    /// Over 70% in equities on average
    MomentumChaser,
    Balanced,
    /// Under 20% in equities on average
    Defensive,
}

impl Archetype {
    #[must_use]
    pub fn classify(mean_equity_share: f64) -> Self {
        if mean_equity_share > 70.0 {
            Archetype::MomentumChaser
        } else if mean_equity_share < 20.0 {
            Archetype::Defensive
        } else {
            Archetype::Balanced
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Archetype::MomentumChaser => "Momentum Chaser",
            Archetype::Balanced => "Balanced",
            Archetype::Defensive => "Defensive",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Archetype::MomentumChaser => "High equity bias; chases growth",
            Archetype::Balanced => "Spreads risk between growth and safety",
            Archetype::Defensive => "Fearful of drawdowns; hides in safe assets",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `100 - mean over rounds of the cross-asset std dev of percentages`
///
/// Higher means allocations were spread more evenly.
#[must_use]
pub fn diversification_score(allocations: &[Allocation]) -> f64 {
    let spreads: Vec<f64> = allocations.iter().map(|a| std_dev(&a.as_f64())).collect();
    100.0 - mean(&spreads)
}

/// Sum of absolute percentage changes between two allocations
#[must_use]
pub fn turnover(from: &Allocation, to: &Allocation) -> u32 {
    from.0
        .iter()
        .zip(to.0.iter())
        .map(|(&a, &b)| u32::from(a.abs_diff(b)))
        .sum()
}

/// Mean turnover over consecutive round pairs; zero with fewer than two rounds
#[must_use]
pub fn mean_turnover(allocations: &[Allocation]) -> f64 {
    let changes: Vec<f64> = allocations
        .windows(2)
        .map(|w| f64::from(turnover(&w[0], &w[1])))
        .collect();
    mean(&changes)
}

/// Mean combined equity percentage across rounds
#[must_use]
pub fn mean_equity_share(allocations: &[Allocation]) -> f64 {
    let shares: Vec<f64> = allocations
        .iter()
        .map(|a| f64::from(a.equity_share()))
        .collect();
    mean(&shares)
}

/// Fraction of guesses that named the round's best asset
#[must_use]
pub fn prediction_accuracy(predictions: &[Prediction]) -> Option<f64> {
    if predictions.is_empty() {
        return None;
    }
    let hits = predictions.iter().filter(|p| p.is_correct()).count();
    Some(hits as f64 / predictions.len() as f64)
}
