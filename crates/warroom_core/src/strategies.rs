//! Baseline strategies that play alongside the user
//!
//! Both allocators are stateless policies: given the round's regime they
//! return a weight vector. Neither looks at history.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{RegimeStance, RegimeTag, Weights};

/// Produces portfolio weights for a round from its regime alone
pub trait Allocator {
    fn weights_for(&self, regime: RegimeTag) -> Weights;
}

/// Regime-agnostic baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BenchmarkPolicy {
    /// `1/N` in every asset class
    EqualWeight,
    /// A fixed target-weight table
    Fixed { weights: Weights },
}

impl Default for BenchmarkPolicy {
    fn default() -> Self {
        BenchmarkPolicy::Fixed {
            weights: Weights::from_percentages([30.0, 20.0, 25.0, 15.0, 5.0, 5.0]),
        }
    }
}

impl BenchmarkPolicy {
    #[must_use]
    pub fn weights(&self) -> Weights {
        match self {
            BenchmarkPolicy::EqualWeight => Weights::equal(),
            BenchmarkPolicy::Fixed { weights } => *weights,
        }
    }
}

impl Allocator for BenchmarkPolicy {
    fn weights_for(&self, _regime: RegimeTag) -> Weights {
        self.weights()
    }
}

/// Regime-keyed weight table used by the regime-aware strategy
///
/// Regimes missing from `entries` fall back to `neutral`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeTable {
    #[serde(default)]
    pub entries: FxHashMap<RegimeTag, Weights>,
    pub neutral: Weights,
}

impl Default for RegimeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RegimeTable {
    /// Defensive tilt for stress regimes, growth tilt for expansion regimes
    #[must_use]
    pub fn standard() -> Self {
        let defensive = Weights::from_percentages([10.0, 10.0, 35.0, 30.0, 0.0, 15.0]);
        let growth = Weights::from_percentages([35.0, 30.0, 10.0, 5.0, 15.0, 5.0]);

        let mut entries = FxHashMap::default();
        for tag in RegimeTag::ALL {
            match tag.stance() {
                RegimeStance::Stress => {
                    entries.insert(tag, defensive);
                }
                RegimeStance::Expansion => {
                    entries.insert(tag, growth);
                }
                RegimeStance::Neutral => {}
            }
        }
        // Inflation hurts bonds too: gold and cash instead
        entries.insert(
            RegimeTag::Inflation,
            Weights::from_percentages([10.0, 10.0, 10.0, 45.0, 0.0, 25.0]),
        );

        Self {
            entries,
            neutral: Weights::from_percentages([20.0, 20.0, 20.0, 15.0, 10.0, 15.0]),
        }
    }

    /// Table with only the neutral vector; every regime falls back
    #[must_use]
    pub fn neutral_only(neutral: Weights) -> Self {
        Self {
            entries: FxHashMap::default(),
            neutral,
        }
    }

    #[must_use]
    pub fn with_entry(mut self, regime: RegimeTag, weights: Weights) -> Self {
        self.entries.insert(regime, weights);
        self
    }

    /// Every weight vector in the table, neutral included
    pub fn all_weights(&self) -> impl Iterator<Item = &Weights> {
        self.entries.values().chain(std::iter::once(&self.neutral))
    }
}

impl Allocator for RegimeTable {
    fn weights_for(&self, regime: RegimeTag) -> Weights {
        self.entries.get(&regime).copied().unwrap_or(self.neutral)
    }
}
