//! End-of-session analytics.
//!
//! Everything here is a pure function of a finished [`SimulationState`]:
//!
//! - `stats` - return-series statistics (Sharpe, volatility, drawdown)
//! - `behavior` - allocation-history metrics (diversification, adaptiveness,
//!   archetype, prediction accuracy)
//! - `dashboard` - the assembled [`DashboardMetrics`]
//! - `export` - the flattened per-round [`Dataset`]
//!
//! [`SimulationState`]: crate::session::SimulationState

mod behavior;
mod dashboard;
mod export;
mod stats;

pub use behavior::*;
pub use dashboard::*;
pub use export::*;
pub use stats::*;
