use serde::{Deserialize, Serialize};

use super::behavior::{
    AdaptiveBehavior, Archetype, diversification_score, mean_equity_share, mean_turnover,
    prediction_accuracy,
};
use super::stats::{max_drawdown_pct, sharpe_ratio, simple_returns, volatility_pct};
use crate::model::{Allocation, PerStrategy, RegimeTag, StrategyKind};
use crate::session::SimulationState;

/// Risk/return summary of one strategy's value path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyMetrics {
    pub final_value: f64,
    /// Whole-session return, in percent
    pub total_return_pct: f64,
    pub sharpe: f64,
    /// Std dev of round returns, in percent
    pub volatility: f64,
    /// Worst peak-to-trough decline, in percent (zero or negative)
    pub max_drawdown: f64,
}

impl StrategyMetrics {
    /// Metrics for a value path that starts with the initial capital
    #[must_use]
    pub fn from_path(path: &[f64], periods: u32) -> Self {
        let returns = simple_returns(path);
        let first = path.first().copied().unwrap_or(0.0);
        let final_value = path.last().copied().unwrap_or(0.0);
        let total_return_pct = if first == 0.0 {
            0.0
        } else {
            (final_value / first - 1.0) * 100.0
        };

        Self {
            final_value,
            total_return_pct,
            sharpe: sharpe_ratio(&returns, periods),
            volatility: volatility_pct(&returns),
            max_drawdown: max_drawdown_pct(path),
        }
    }
}

/// One row of the regime performance table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeRow {
    pub round: u32,
    pub regime: RegimeTag,
    pub values: PerStrategy<f64>,
}

/// One row of the allocation heatmap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub round: u32,
    pub allocation: Allocation,
}

/// End-of-session analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub initial_capital: f64,
    pub strategies: PerStrategy<StrategyMetrics>,
    pub diversification_score: f64,
    pub mean_turnover: f64,
    pub adaptive_behavior: AdaptiveBehavior,
    pub mean_equity_share: f64,
    pub archetype: Archetype,
    /// `None` when the user never made a best-asset guess
    pub prediction_accuracy: Option<f64>,
    pub regime_table: Vec<RegimeRow>,
    pub allocation_table: Vec<AllocationRow>,
}

impl DashboardMetrics {
    /// Derive every metric from a session's accumulated state
    ///
    /// Sharpe is annualized over the configured round count, treating each
    /// round as one period.
    #[must_use]
    pub fn compute(state: &SimulationState) -> Self {
        let periods = state.total_rounds();
        let strategies = PerStrategy::from_fn(|kind| {
            StrategyMetrics::from_path(&state.value_path(kind), periods)
        });

        let allocations = state.allocation_history();
        let turnover = mean_turnover(allocations);
        let equity = mean_equity_share(allocations);

        let regime_table = state
            .regime_labels()
            .iter()
            .enumerate()
            .map(|(i, &regime)| RegimeRow {
                round: i as u32 + 1,
                regime,
                values: PerStrategy::from_fn(|kind| {
                    state.history(kind).get(i).map_or(0.0, |e| e.value)
                }),
            })
            .collect();

        let allocation_table = allocations
            .iter()
            .enumerate()
            .map(|(i, &allocation)| AllocationRow {
                round: i as u32 + 1,
                allocation,
            })
            .collect();

        Self {
            initial_capital: state.initial_capital(),
            strategies,
            diversification_score: diversification_score(allocations),
            mean_turnover: turnover,
            adaptive_behavior: AdaptiveBehavior::classify(turnover),
            mean_equity_share: equity,
            archetype: Archetype::classify(equity),
            prediction_accuracy: prediction_accuracy(state.predictions()),
            regime_table,
            allocation_table,
        }
    }

    #[must_use]
    pub fn user(&self) -> &StrategyMetrics {
        &self.strategies.user
    }

    /// Strategy with the highest final value; earlier kinds win ties
    #[must_use]
    pub fn leader(&self) -> StrategyKind {
        let mut best = StrategyKind::User;
        for kind in StrategyKind::ALL {
            if self.strategies.get(kind).final_value > self.strategies.get(best).final_value {
                best = kind;
            }
        }
        best
    }

    /// Final-value gap between the user and another strategy, in currency
    #[must_use]
    pub fn user_edge_over(&self, kind: StrategyKind) -> f64 {
        self.strategies.user.final_value - self.strategies.get(kind).final_value
    }
}
