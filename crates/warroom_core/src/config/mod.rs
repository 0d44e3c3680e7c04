//! Session configuration
//!
//! `SessionConfig` carries every policy a session needs: round counts, how
//! the randomized rounds are drawn, and the weights of the two baseline
//! strategies. All fields have defaults matching the standard curriculum,
//! so an empty YAML/JSON document deserializes to a playable session.
//!
//! # Builder DSL
//!
//! ```ignore
//! use warroom_core::config::SessionBuilder;
//! use warroom_core::strategies::BenchmarkPolicy;
//!
//! let mut session = SessionBuilder::new()
//!     .total_rounds(10)
//!     .fixed_rounds(5)
//!     .benchmark(BenchmarkPolicy::EqualWeight)
//!     .seed(7)
//!     .build()?;
//! session.start(1_000_000.0)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::ScenarioCatalog;
use crate::error::ConfigError;
use crate::model::Weights;
use crate::sequencer::SamplingPolicy;
use crate::strategies::{BenchmarkPolicy, RegimeTable};

mod builder;

pub use builder::SessionBuilder;

/// Allowed drift of a strategy weight vector's sum from 1.0
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

fn default_fixed_round_count() -> u32 {
    5
}

fn default_total_rounds() -> u32 {
    10
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Rounds served from the catalog's fixed list, in order
    #[serde(default = "default_fixed_round_count")]
    pub fixed_round_count: u32,

    /// Rounds in a full session
    #[serde(default = "default_total_rounds")]
    pub total_rounds: u32,

    #[serde(default)]
    pub sampling: SamplingPolicy,

    #[serde(default)]
    pub benchmark: BenchmarkPolicy,

    #[serde(default)]
    pub regime_table: RegimeTable,

    /// Seed for the scenario RNG; `None` seeds from the OS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fixed_round_count: default_fixed_round_count(),
            total_rounds: default_total_rounds(),
            sampling: SamplingPolicy::default(),
            benchmark: BenchmarkPolicy::default(),
            regime_table: RegimeTable::default(),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Check the config is playable against `catalog`
    pub fn validate(&self, catalog: &ScenarioCatalog) -> Result<(), ConfigError> {
        if self.total_rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        if self.fixed_round_count > self.total_rounds {
            return Err(ConfigError::FixedRoundsExceedTotal {
                fixed: self.fixed_round_count,
                total: self.total_rounds,
            });
        }
        if catalog.fixed.len() < self.fixed_round_count as usize {
            return Err(ConfigError::NotEnoughFixedScenarios {
                required: self.fixed_round_count,
                available: catalog.fixed.len(),
            });
        }

        let required = (self.total_rounds - self.fixed_round_count) as usize;
        let available = catalog.pool.len();
        let starved = match self.sampling {
            SamplingPolicy::AllowReplacement => available == 0,
            SamplingPolicy::WithoutReplacement => available < required,
        };
        if required > 0 && starved {
            return Err(ConfigError::PoolTooSmall {
                required,
                available,
                policy: self.sampling,
            });
        }

        check_weights("benchmark", &self.benchmark.weights())?;
        for weights in self.regime_table.all_weights() {
            check_weights("regime table", weights)?;
        }

        Ok(())
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn check_weights(strategy: &'static str, weights: &Weights) -> Result<(), ConfigError> {
    if weights.is_fully_invested(WEIGHT_TOLERANCE) {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeights {
            strategy,
            sum: weights.sum(),
        })
    }
}
