//! Scenario catalog
//!
//! A catalog holds the ordered scenarios played in the fixed opening rounds
//! and the pool from which later rounds are drawn. The standard catalog is
//! the curriculum every session uses unless a custom one is supplied.

use serde::{Deserialize, Serialize};

use crate::model::{RegimeTag, ReturnVector, Scenario};

/// Fixed opening scenarios plus a pool for randomized rounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    /// Played in order for rounds `1..=fixed.len()`
    pub fixed: Vec<Scenario>,
    /// Sampled for rounds past the fixed ones
    #[serde(default)]
    pub pool: Vec<Scenario>,
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScenarioCatalog {
    #[must_use]
    pub fn new(fixed: Vec<Scenario>, pool: Vec<Scenario>) -> Self {
        Self { fixed, pool }
    }

    /// The built-in curriculum
    ///
    /// Return vectors are ordered Indian Equity, US Equity, Bonds, Gold,
    /// Crypto, Cash.
    #[must_use]
    pub fn standard() -> Self {
        let fixed = vec![
            Scenario::new(
                RegimeTag::RateHike,
                "RBI hikes rates aggressively",
                ReturnVector::new([-0.07, -0.03, 0.02, 0.04, -0.12, 0.01]),
            )
            .with_note("Rate hikes hurt equity valuations."),
            Scenario::new(
                RegimeTag::GrowthRally,
                "AI boom",
                ReturnVector::new([0.06, 0.09, -0.02, -0.03, 0.15, 0.01]),
            )
            .with_note("Growth assets outperform."),
            Scenario::new(
                RegimeTag::Crisis,
                "Geopolitical crisis",
                ReturnVector::new([-0.10, -0.08, 0.05, 0.08, -0.05, 0.01]),
            )
            .with_note("Flight to safety."),
            Scenario::new(
                RegimeTag::Disinflation,
                "Inflation cools",
                ReturnVector::new([0.08, 0.06, 0.07, -0.04, 0.05, 0.01]),
            )
            .with_note("Risk-on recovery."),
            Scenario::new(
                RegimeTag::Recession,
                "Recession fears",
                ReturnVector::new([-0.12, -0.15, 0.06, 0.07, -0.20, 0.01]),
            )
            .with_note("Diversification matters."),
        ];

        let pool = vec![
            Scenario::new(
                RegimeTag::Crisis,
                "Banking crisis",
                ReturnVector::new([-0.11, -0.13, 0.06, 0.09, -0.18, 0.01]),
            )
            .with_note("System stress."),
            Scenario::new(
                RegimeTag::Liquidity,
                "Liquidity injection",
                ReturnVector::new([0.11, 0.13, 0.03, -0.02, 0.20, 0.01]),
            )
            .with_note("Liquidity rally."),
            Scenario::new(
                RegimeTag::Inflation,
                "Oil spike",
                ReturnVector::new([-0.06, -0.05, -0.03, 0.07, -0.04, 0.01]),
            )
            .with_note("Inflation shock."),
            Scenario::new(
                RegimeTag::Mixed,
                "Policy confusion",
                ReturnVector::new([0.01, 0.02, 0.00, 0.01, 0.00, 0.01]),
            )
            .with_note("Mixed signals."),
            Scenario::new(
                RegimeTag::Credit,
                "Corporate bond defaults spread",
                ReturnVector::new([-0.09, -0.07, -0.01, 0.05, -0.14, 0.01]),
            )
            .with_note("Credit stress spills into every risk asset."),
            Scenario::new(
                RegimeTag::GrowthRally,
                "Earnings beat across tech",
                ReturnVector::new([0.07, 0.10, -0.01, -0.02, 0.12, 0.01]),
            )
            .with_note("Momentum rewards growth exposure."),
        ];

        Self { fixed, pool }
    }

    /// Fixed scenario for a 1-based round, if the catalog has one
    #[must_use]
    pub fn fixed_for_round(&self, round: u32) -> Option<&Scenario> {
        let idx = usize::try_from(round).ok()?.checked_sub(1)?;
        self.fixed.get(idx)
    }
}
