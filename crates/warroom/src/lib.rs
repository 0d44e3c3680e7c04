//! Terminal front end for the portfolio war room
//!
//! Drives a [`warroom_core::SimulationSession`] from line-based input, writes
//! logs to the data directory and exports finished games as CSV plus a JSON
//! dashboard summary.

pub mod app;
pub mod data;
pub mod logging;
pub mod util;
pub mod view;

pub use app::App;
pub use data::DataDirectory;
pub use logging::init_logging;
