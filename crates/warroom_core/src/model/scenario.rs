//! Market regimes and the scenarios that carry them

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ReturnVector;

/// Macro-market regime driving one round's returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegimeTag {
    RateHike,
    GrowthRally,
    Crisis,
    Disinflation,
    Recession,
    Credit,
    Liquidity,
    Inflation,
    Mixed,
}

/// How the regime-aware strategy should lean in a regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegimeStance {
    /// Favor bonds, gold and cash
    Stress,
    /// Favor equities and crypto
    Expansion,
    /// No strong lean
    Neutral,
}

impl RegimeTag {
    pub const ALL: [RegimeTag; 9] = [
        RegimeTag::RateHike,
        RegimeTag::GrowthRally,
        RegimeTag::Crisis,
        RegimeTag::Disinflation,
        RegimeTag::Recession,
        RegimeTag::Credit,
        RegimeTag::Liquidity,
        RegimeTag::Inflation,
        RegimeTag::Mixed,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RegimeTag::RateHike => "Rate Hike",
            RegimeTag::GrowthRally => "Growth Rally",
            RegimeTag::Crisis => "Crisis",
            RegimeTag::Disinflation => "Disinflation",
            RegimeTag::Recession => "Recession",
            RegimeTag::Credit => "Credit",
            RegimeTag::Liquidity => "Liquidity",
            RegimeTag::Inflation => "Inflation",
            RegimeTag::Mixed => "Mixed",
        }
    }

    #[must_use]
    pub const fn stance(self) -> RegimeStance {
        match self {
            RegimeTag::Crisis
            | RegimeTag::Recession
            | RegimeTag::Credit
            | RegimeTag::RateHike
            | RegimeTag::Inflation => RegimeStance::Stress,
            RegimeTag::GrowthRally | RegimeTag::Liquidity => RegimeStance::Expansion,
            RegimeTag::Disinflation | RegimeTag::Mixed => RegimeStance::Neutral,
        }
    }
}

impl fmt::Display for RegimeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One round's market story: a regime, a headline and the returns it produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub regime: RegimeTag,
    pub headline: String,
    pub returns: ReturnVector,
    /// Teaching note revealed after the round is played
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_note: Option<String>,
}

impl Scenario {
    #[must_use]
    pub fn new(regime: RegimeTag, headline: impl Into<String>, returns: ReturnVector) -> Self {
        Self {
            regime,
            headline: headline.into(),
            returns,
            concept_note: None,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.concept_note = Some(note.into());
        self
    }

    #[must_use]
    pub fn regime_label(&self) -> &'static str {
        self.regime.label()
    }
}
