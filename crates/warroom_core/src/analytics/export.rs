//! Flattened teaching dataset
//!
//! One row per round combining the user's value, allocation and regime with
//! the session-level Sharpe and volatility repeated on every row, so the
//! table can be analyzed without joining anything.

use serde::{Deserialize, Serialize};

use super::DashboardMetrics;
use crate::model::{Allocation, AssetClass, RegimeTag, StrategyKind};
use crate::session::SimulationState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub round: u32,
    pub value: f64,
    pub allocation: Allocation,
    pub regime: RegimeTag,
    pub sharpe: f64,
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub rows: Vec<DatasetRow>,
}

impl Dataset {
    #[must_use]
    pub fn build(state: &SimulationState, dashboard: &DashboardMetrics) -> Self {
        let user = dashboard.user();
        let rows = state
            .history(StrategyKind::User)
            .iter()
            .zip(state.allocation_history())
            .zip(state.regime_labels())
            .map(|((entry, &allocation), &regime)| DatasetRow {
                round: entry.round,
                value: entry.value,
                allocation,
                regime,
                sharpe: user.sharpe,
                volatility: user.volatility,
            })
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in output order
    #[must_use]
    pub fn header() -> Vec<&'static str> {
        let mut cols = vec!["Round", "Value"];
        cols.extend(AssetClass::ALL.iter().map(|a| a.label()));
        cols.extend(["Regime", "Sharpe", "Volatility"]);
        cols
    }

    /// Comma-separated rendering with a header line
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = Self::header().join(",");
        out.push('\n');

        for row in &self.rows {
            let mut fields = vec![row.round.to_string(), row.value.to_string()];
            fields.extend(row.allocation.0.iter().map(u8::to_string));
            fields.push(csv_field(row.regime.label()));
            fields.push(row.sharpe.to_string());
            fields.push(row.volatility.to_string());

            out.push_str(&fields.join(","));
            out.push('\n');
        }
        out
    }
}

/// Quote a field when it contains a delimiter, quote or newline
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
