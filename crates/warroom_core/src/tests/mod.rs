//! Integration tests for the war room session engine
//!
//! Tests are organized by topic:
//! - `session` - Round state machine, valuation and reset
//! - `dashboard` - End-of-session analytics over full games
//! - `export` - Flattened dataset built from a finished session

mod export;
mod session;

use crate::config::SessionBuilder;
use crate::model::Allocation;
use crate::session::SimulationSession;

pub(crate) const CAPITAL: f64 = 1_000_000.0;

/// Seeded 10-round session over the standard catalog, already started
pub(crate) fn started_session(seed: u64) -> SimulationSession {
    let mut session = SessionBuilder::new().seed(seed).build().unwrap();
    session.start(CAPITAL).unwrap();
    session
}

/// Submit and advance every remaining round with the same allocation
pub(crate) fn play_out(session: &mut SimulationSession, allocation: Allocation) {
    while !session.is_finished() {
        session.submit(allocation).unwrap();
        session.advance().unwrap();
    }
}
