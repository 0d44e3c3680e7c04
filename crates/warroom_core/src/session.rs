//! The round-progression state machine
//!
//! ```text
//! NotStarted --start--> InProgress{1, open} --submit--> InProgress{1, submitted}
//!     --advance--> InProgress{2, open} ... --advance--> Finished
//! ```
//!
//! Every transition either succeeds completely or returns an error and leaves
//! the state untouched. `reset` is valid from any state.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::analytics::{Dataset, DashboardMetrics};
use crate::catalog::ScenarioCatalog;
use crate::config::SessionConfig;
use crate::error::{AllocationError, ConfigError, Result, SessionError, TransitionError};
use crate::model::{
    Allocation, AssetClass, HistoryEntry, PerStrategy, RegimeTag, ReturnVector, Scenario,
    StrategyKind,
};
use crate::sequencer::ScenarioSequencer;
use crate::strategies::Allocator;
use crate::valuation::apply_returns;

/// Coarse lifecycle position of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    InProgress { round: u32, submitted: bool },
    Finished,
}

/// A user's guess at the round's best-performing asset, scored on submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub round: u32,
    pub guess: AssetClass,
    pub best: AssetClass,
}

impl Prediction {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.guess == self.best
    }
}

/// Everything revealed once a round is submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: u32,
    pub scenario: Scenario,
    pub allocation: Allocation,
    /// Values before the round's returns were applied
    pub previous: PerStrategy<f64>,
    /// Values after the round's returns were applied
    pub values: PerStrategy<f64>,
    pub prediction: Option<Prediction>,
}

impl RoundOutcome {
    /// Round-over-round change of one strategy, as a fraction
    #[must_use]
    pub fn change(&self, kind: StrategyKind) -> f64 {
        let prev = *self.previous.get(kind);
        if prev == 0.0 {
            0.0
        } else {
            self.values.get(kind) / prev - 1.0
        }
    }
}

/// Owned, explicitly-passed session data
///
/// Mutated only through [`SimulationSession`] transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub(crate) total_rounds: u32,
    pub(crate) initialized: bool,
    pub(crate) round: u32,
    pub(crate) submitted: bool,
    pub(crate) initial_capital: f64,
    pub(crate) values: PerStrategy<f64>,
    pub(crate) histories: PerStrategy<Vec<HistoryEntry>>,
    pub(crate) allocation_history: Vec<Allocation>,
    pub(crate) regime_labels: Vec<RegimeTag>,
    pub(crate) predictions: Vec<Prediction>,
    pub(crate) revealed: Option<RoundOutcome>,
}

impl SimulationState {
    #[must_use]
    pub fn new(total_rounds: u32) -> Self {
        Self {
            total_rounds,
            initialized: false,
            round: 1,
            submitted: false,
            initial_capital: 0.0,
            values: PerStrategy::default(),
            histories: PerStrategy::default(),
            allocation_history: Vec::new(),
            regime_labels: Vec::new(),
            predictions: Vec::new(),
            revealed: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if !self.initialized {
            Phase::NotStarted
        } else if self.round > self.total_rounds {
            Phase::Finished
        } else {
            Phase::InProgress {
                round: self.round,
                submitted: self.submitted,
            }
        }
    }

    #[must_use]
    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// 1-based round; 1 before the session starts, `total + 1` once finished
    #[must_use]
    pub fn current_round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    #[must_use]
    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    /// Current portfolio value of one strategy
    #[must_use]
    pub fn value(&self, kind: StrategyKind) -> f64 {
        *self.values.get(kind)
    }

    #[must_use]
    pub fn values(&self) -> &PerStrategy<f64> {
        &self.values
    }

    #[must_use]
    pub fn history(&self, kind: StrategyKind) -> &[HistoryEntry] {
        self.histories.get(kind)
    }

    #[must_use]
    pub fn allocation_history(&self) -> &[Allocation] {
        &self.allocation_history
    }

    /// Regime of each completed round, in round order
    #[must_use]
    pub fn regime_labels(&self) -> &[RegimeTag] {
        &self.regime_labels
    }

    #[must_use]
    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    /// Value path of one strategy with the initial capital prepended
    #[must_use]
    pub fn value_path(&self, kind: StrategyKind) -> Vec<f64> {
        std::iter::once(self.initial_capital)
            .chain(self.history(kind).iter().map(|e| e.value))
            .collect()
    }
}

/// One player's simulation: config, scenario sequencing, RNG and state
#[derive(Debug, Clone)]
pub struct SimulationSession<R = SmallRng> {
    config: SessionConfig,
    sequencer: ScenarioSequencer,
    state: SimulationState,
    rng: R,
}

impl SimulationSession<SmallRng> {
    /// Session over the standard catalog
    pub fn new(config: SessionConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_catalog(config, ScenarioCatalog::standard())
    }

    /// Session over a custom catalog, seeded from `config.seed` or the OS
    pub fn with_catalog(
        config: SessionConfig,
        catalog: ScenarioCatalog,
    ) -> std::result::Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self::with_rng(config, catalog, rng)
    }
}

impl<R: Rng> SimulationSession<R> {
    /// Session with an injected RNG
    pub fn with_rng(
        config: SessionConfig,
        catalog: ScenarioCatalog,
        rng: R,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate(&catalog)?;
        let sequencer = ScenarioSequencer::new(
            catalog,
            config.fixed_round_count,
            config.total_rounds,
            config.sampling,
        );
        Ok(Self {
            state: SimulationState::new(config.total_rounds),
            config,
            sequencer,
            rng,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub fn current_round(&self) -> u32 {
        self.state.current_round()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.phase() == Phase::Finished
    }

    /// The drawn randomized sequence, once it exists
    #[must_use]
    pub fn random_sequence(&self) -> Option<&[Scenario]> {
        self.sequencer.random_sequence()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Begin the session with `initial_capital` in every strategy
    pub fn start(&mut self, initial_capital: f64) -> Result<()> {
        if self.state.initialized {
            return Err(self.reject(TransitionError::AlreadyStarted));
        }
        if !initial_capital.is_finite() || initial_capital <= 0.0 {
            tracing::warn!(initial_capital, "Rejected start: invalid capital");
            return Err(SessionError::InvalidCapital(initial_capital));
        }

        let mut state = SimulationState::new(self.config.total_rounds);
        state.initialized = true;
        state.initial_capital = initial_capital;
        state.values = PerStrategy::from_fn(|_| initial_capital);
        self.state = state;

        tracing::info!(
            initial_capital,
            total_rounds = self.config.total_rounds,
            "Session started"
        );
        Ok(())
    }

    /// Scenario for the round being played
    pub fn current_scenario(&mut self) -> Result<&Scenario> {
        let round = self.require_in_progress()?;
        Ok(self.sequencer.resolve(round, &mut self.rng)?)
    }

    /// Apply the user's allocation to the current round
    pub fn submit(&mut self, allocation: Allocation) -> Result<RoundOutcome> {
        self.submit_with_prediction(allocation, None)
    }

    /// Apply the user's allocation and score a best-asset guess
    pub fn submit_with_prediction(
        &mut self,
        allocation: Allocation,
        prediction: Option<AssetClass>,
    ) -> Result<RoundOutcome> {
        let round = self.require_open_round()?;

        if !allocation.is_complete() {
            let total = allocation.total();
            tracing::warn!(round, total, "Rejected submit: allocation does not total 100");
            return Err(AllocationError::SumMismatch { total }.into());
        }

        let scenario = self.sequencer.resolve(round, &mut self.rng)?.clone();

        let previous = self.state.values;
        let weights = PerStrategy {
            user: allocation.to_weights(),
            benchmark: self.config.benchmark.weights_for(scenario.regime),
            regime_ai: self.config.regime_table.weights_for(scenario.regime),
        };
        let values = PerStrategy::from_fn(|kind| {
            apply_returns(*previous.get(kind), weights.get(kind), &scenario.returns)
        });

        for kind in StrategyKind::ALL {
            self.state.histories.get_mut(kind).push(HistoryEntry {
                round,
                value: *values.get(kind),
            });
        }
        self.state.values = values;
        self.state.allocation_history.push(allocation);
        if self.state.regime_labels.len() < round as usize {
            self.state.regime_labels.push(scenario.regime);
        }

        let prediction = prediction.map(|guess| Prediction {
            round,
            guess,
            best: scenario.returns.best_asset(),
        });
        if let Some(p) = prediction {
            self.state.predictions.push(p);
        }

        self.state.submitted = true;

        tracing::debug!(
            round,
            regime = %scenario.regime,
            user = values.user,
            benchmark = values.benchmark,
            regime_ai = values.regime_ai,
            "Round submitted"
        );

        let outcome = RoundOutcome {
            round,
            scenario,
            allocation,
            previous,
            values,
            prediction,
        };
        self.state.revealed = Some(outcome.clone());
        Ok(outcome)
    }

    /// Outcome of the submitted round, available until `advance`
    pub fn revealed(&self) -> Result<&RoundOutcome> {
        self.require_in_progress()?;
        self.state.revealed.as_ref().ok_or_else(|| {
            SessionError::Transition(TransitionError::NotSubmitted {
                round: self.state.round,
            })
        })
    }

    /// Returns of the submitted round, available until `advance`
    pub fn revealed_returns(&self) -> Result<&ReturnVector> {
        self.revealed().map(|outcome| &outcome.scenario.returns)
    }

    /// Move past a submitted round
    pub fn advance(&mut self) -> Result<Phase> {
        let round = self.require_in_progress()?;
        if !self.state.submitted {
            return Err(self.reject(TransitionError::NotSubmitted { round }));
        }

        self.state.round += 1;
        self.state.submitted = false;
        self.state.revealed = None;

        let phase = self.state.phase();
        if phase == Phase::Finished {
            tracing::info!(
                user = self.state.values.user,
                benchmark = self.state.values.benchmark,
                regime_ai = self.state.values.regime_ai,
                "Session finished"
            );
        } else {
            tracing::debug!(round = self.state.round, "Advanced to next round");
        }
        Ok(phase)
    }

    /// Discard everything and return to `NotStarted`
    pub fn reset(&mut self) {
        self.state = SimulationState::new(self.config.total_rounds);
        self.sequencer.clear();
        tracing::info!("Session reset");
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// End-of-game analytics; only once finished
    pub fn dashboard(&self) -> Result<DashboardMetrics> {
        self.require_finished()?;
        Ok(DashboardMetrics::compute(&self.state))
    }

    /// Flattened per-round dataset for offline analysis; only once finished
    pub fn export_dataset(&self) -> Result<Dataset> {
        let dashboard = self.dashboard()?;
        Ok(Dataset::build(&self.state, &dashboard))
    }

    // =========================================================================
    // Guards
    // =========================================================================

    fn reject(&self, err: TransitionError) -> SessionError {
        tracing::warn!(phase = ?self.state.phase(), error = %err, "Rejected transition");
        SessionError::Transition(err)
    }

    fn require_in_progress(&self) -> Result<u32> {
        match self.state.phase() {
            Phase::InProgress { round, .. } => Ok(round),
            Phase::NotStarted => Err(SessionError::Transition(TransitionError::NotStarted)),
            Phase::Finished => Err(SessionError::Transition(TransitionError::Finished)),
        }
    }

    fn require_open_round(&self) -> Result<u32> {
        let round = self
            .require_in_progress()
            .map_err(|e| match e {
                SessionError::Transition(t) => self.reject(t),
                other => other,
            })?;
        if self.state.submitted {
            return Err(self.reject(TransitionError::AlreadySubmitted { round }));
        }
        Ok(round)
    }

    fn require_finished(&self) -> Result<()> {
        match self.state.phase() {
            Phase::Finished => Ok(()),
            Phase::NotStarted => Err(SessionError::Transition(TransitionError::NotStarted)),
            Phase::InProgress { round, .. } => {
                Err(SessionError::Transition(TransitionError::NotFinished { round }))
            }
        }
    }
}
