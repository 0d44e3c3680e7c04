//! Session Builder
//!
//! Fluent construction of a [`SimulationSession`] with validation deferred to
//! `build`.
//!
//! ```ignore
//! let session = SessionBuilder::new()
//!     .catalog(my_catalog)
//!     .sampling(SamplingPolicy::WithoutReplacement)
//!     .seed(42)
//!     .build()?;
//! ```

use rand::Rng;
use rand::rngs::SmallRng;

use super::SessionConfig;
use crate::catalog::ScenarioCatalog;
use crate::error::ConfigError;
use crate::model::{RegimeTag, Weights};
use crate::sequencer::SamplingPolicy;
use crate::session::SimulationSession;
use crate::strategies::{BenchmarkPolicy, RegimeTable};

/// Builder for sessions with a custom catalog or policy set
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    config: SessionConfig,
    catalog: Option<ScenarioCatalog>,
}

impl SessionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing config (e.g. one loaded from disk)
    #[must_use]
    pub fn from_config(config: SessionConfig) -> Self {
        Self {
            config,
            catalog: None,
        }
    }

    // =========================================================================
    // Round structure
    // =========================================================================

    #[must_use]
    pub fn total_rounds(mut self, rounds: u32) -> Self {
        self.config.total_rounds = rounds;
        self
    }

    #[must_use]
    pub fn fixed_rounds(mut self, rounds: u32) -> Self {
        self.config.fixed_round_count = rounds;
        self
    }

    #[must_use]
    pub fn catalog(mut self, catalog: ScenarioCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn sampling(mut self, policy: SamplingPolicy) -> Self {
        self.config.sampling = policy;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    // =========================================================================
    // Baseline strategies
    // =========================================================================

    #[must_use]
    pub fn benchmark(mut self, policy: BenchmarkPolicy) -> Self {
        self.config.benchmark = policy;
        self
    }

    /// Fixed benchmark weights given as whole percentages
    #[must_use]
    pub fn benchmark_percentages(self, percentages: [f64; 6]) -> Self {
        self.benchmark(BenchmarkPolicy::Fixed {
            weights: Weights::from_percentages(percentages),
        })
    }

    #[must_use]
    pub fn regime_table(mut self, table: RegimeTable) -> Self {
        self.config.regime_table = table;
        self
    }

    /// Override the regime strategy's weights for one regime
    #[must_use]
    pub fn regime_weights(mut self, regime: RegimeTag, weights: Weights) -> Self {
        self.config.regime_table.entries.insert(regime, weights);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Resolved config without building a session
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn build(self) -> Result<SimulationSession<SmallRng>, ConfigError> {
        let catalog = self.catalog.unwrap_or_default();
        SimulationSession::with_catalog(self.config, catalog)
    }

    /// Build with a caller-supplied RNG, ignoring any configured seed
    pub fn build_with_rng<R: Rng>(self, rng: R) -> Result<SimulationSession<R>, ConfigError> {
        let catalog = self.catalog.unwrap_or_default();
        SimulationSession::with_rng(self.config, catalog, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssetClass;

    #[test]
    fn test_builder_sets_config_fields() {
        let builder = SessionBuilder::new()
            .total_rounds(8)
            .fixed_rounds(3)
            .sampling(SamplingPolicy::WithoutReplacement)
            .benchmark(BenchmarkPolicy::EqualWeight)
            .seed(3);

        let config = builder.config();
        assert_eq!(config.total_rounds, 8);
        assert_eq!(config.fixed_round_count, 3);
        assert_eq!(config.sampling, SamplingPolicy::WithoutReplacement);
        assert_eq!(config.benchmark, BenchmarkPolicy::EqualWeight);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_builder_rejects_invalid_rounds() {
        let result = SessionBuilder::new().total_rounds(3).fixed_rounds(5).build();
        assert!(matches!(
            result,
            Err(ConfigError::FixedRoundsExceedTotal { fixed: 5, total: 3 })
        ));
    }

    #[test]
    fn test_builder_rejects_catalog_that_cannot_fill_random_rounds() {
        let mut catalog = ScenarioCatalog::standard();
        catalog.pool.truncate(2);

        let result = SessionBuilder::new()
            .catalog(catalog.clone())
            .sampling(SamplingPolicy::WithoutReplacement)
            .seed(1)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::PoolTooSmall {
                required: 5,
                available: 2,
                ..
            })
        ));

        catalog.pool.clear();
        let result = SessionBuilder::new().catalog(catalog).seed(1).build();
        assert!(matches!(
            result,
            Err(ConfigError::PoolTooSmall { available: 0, .. })
        ));
    }

    #[test]
    fn test_builder_benchmark_percentages() {
        let builder =
            SessionBuilder::new().benchmark_percentages([50.0, 0.0, 50.0, 0.0, 0.0, 0.0]);
        let weights = builder.config().benchmark.weights();
        assert!((weights[AssetClass::Bonds] - 0.5).abs() < 1e-12);
        assert!(builder.build().is_ok());
    }
}
