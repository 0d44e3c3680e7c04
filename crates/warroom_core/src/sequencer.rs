//! Round-to-scenario resolution
//!
//! Rounds up to the fixed count always map to the same catalog entries.
//! Later rounds are drawn from the pool once per session, the first time
//! one of them is needed, and the drawn order is cached so repeated lookups
//! (re-renders, reveals, exports) always see the same scenario.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::catalog::ScenarioCatalog;
use crate::error::ScenarioError;
use crate::model::Scenario;

/// How randomized rounds are drawn from the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SamplingPolicy {
    /// Distinct scenarios when the pool is large enough, repeats otherwise
    #[default]
    AllowReplacement,
    /// Always distinct; an undersized pool is an error
    WithoutReplacement,
}

#[derive(Debug, Clone)]
pub struct ScenarioSequencer {
    catalog: ScenarioCatalog,
    fixed_round_count: u32,
    total_rounds: u32,
    policy: SamplingPolicy,
    /// Scenarios for rounds `fixed_round_count + 1..=total_rounds`, once drawn
    sequence: Option<Vec<Scenario>>,
}

impl ScenarioSequencer {
    #[must_use]
    pub fn new(
        catalog: ScenarioCatalog,
        fixed_round_count: u32,
        total_rounds: u32,
        policy: SamplingPolicy,
    ) -> Self {
        Self {
            catalog,
            fixed_round_count,
            total_rounds,
            policy,
            sequence: None,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// The drawn sequence for randomized rounds, if it has been generated
    #[must_use]
    pub fn random_sequence(&self) -> Option<&[Scenario]> {
        self.sequence.as_deref()
    }

    /// Number of rounds served from the pool
    #[must_use]
    pub fn random_round_count(&self) -> usize {
        self.total_rounds.saturating_sub(self.fixed_round_count) as usize
    }

    /// Scenario for a 1-based round
    ///
    /// Fixed rounds never consult `rng`. The first randomized lookup draws
    /// the whole randomized sequence; later lookups reuse it.
    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        round: u32,
        rng: &mut R,
    ) -> Result<&Scenario, ScenarioError> {
        if round == 0 || round > self.total_rounds {
            return Err(ScenarioError::RoundOutOfRange {
                round,
                total_rounds: self.total_rounds,
            });
        }

        if round <= self.fixed_round_count {
            return self
                .catalog
                .fixed_for_round(round)
                .ok_or(ScenarioError::MissingFixedScenario { round });
        }

        if self.sequence.is_none() {
            let drawn = self.draw(rng)?;
            tracing::debug!(
                rounds = drawn.len(),
                regimes = ?drawn.iter().map(|s| s.regime).collect::<Vec<_>>(),
                "Generated randomized scenario sequence"
            );
            self.sequence = Some(drawn);
        }

        let idx = (round - self.fixed_round_count - 1) as usize;
        self.sequence
            .as_ref()
            .and_then(|seq| seq.get(idx))
            .ok_or(ScenarioError::RoundOutOfRange {
                round,
                total_rounds: self.total_rounds,
            })
    }

    /// Discard the cached sequence so the next session draws afresh
    pub fn clear(&mut self) {
        self.sequence = None;
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Scenario>, ScenarioError> {
        let required = self.random_round_count();
        let pool = &self.catalog.pool;

        if pool.is_empty() {
            return Err(ScenarioError::EmptyPool);
        }

        let mut drawn: Vec<Scenario> = if pool.len() >= required {
            pool.choose_multiple(rng, required).cloned().collect()
        } else {
            match self.policy {
                SamplingPolicy::AllowReplacement => (0..required)
                    .filter_map(|_| pool.choose(rng).cloned())
                    .collect(),
                SamplingPolicy::WithoutReplacement => {
                    return Err(ScenarioError::PoolExhausted {
                        required,
                        available: pool.len(),
                    });
                }
            }
        };

        drawn.shuffle(rng);
        Ok(drawn)
    }
}
