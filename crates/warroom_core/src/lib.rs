//! Market-regime portfolio simulation library
//!
//! This crate provides the engine behind an educational "war room" game in
//! which a player allocates capital across six asset classes over a series of
//! macro scenarios. It supports:
//! - A scenario catalog with fixed opening rounds and a randomized pool
//! - Deterministic compounding of portfolio values from scenario returns
//! - Two baseline strategies (a static benchmark and a regime-aware allocator)
//!   valued side by side with the player
//! - A strict round state machine (start, submit, reveal, advance, reset)
//! - End-of-session analytics: Sharpe, volatility, drawdown, diversification,
//!   adaptiveness, investor archetype and prediction accuracy
//! - A flattened per-round dataset for offline analysis
//!
//! # Example
//!
//! ```ignore
//! use warroom_core::config::SessionBuilder;
//! use warroom_core::model::{Allocation, AssetClass};
//!
//! let mut session = SessionBuilder::new().seed(42).build()?;
//! session.start(1_000_000.0)?;
//! while !session.is_finished() {
//!     let scenario = session.current_scenario()?;
//!     println!("{}", scenario.headline);
//!     session.submit(Allocation::all_in(AssetClass::Gold))?;
//!     session.advance()?;
//! }
//! let dashboard = session.dashboard()?;
//! println!("Sharpe: {:.2}", dashboard.user().sharpe);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analytics;
pub mod catalog;
pub mod error;
pub mod sequencer;
pub mod session;
pub mod strategies;
pub mod valuation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analytics::{Dataset, DashboardMetrics};
pub use catalog::ScenarioCatalog;
pub use config::{SessionBuilder, SessionConfig};
pub use error::{Result, SessionError};
pub use session::{Phase, RoundOutcome, SimulationSession, SimulationState};
