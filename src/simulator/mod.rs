//! Monte Carlo balance simulator.
//!
//! Runs many seeded cultivators through the same session, choice, travel,
//! meditation and breakthrough code the game uses, then aggregates realm
//! pacing, breakthrough odds and stone income.

mod config;
mod report;
mod runner;

pub use config::{ChoicePolicy, SimConfig};
pub use report::SimReport;
pub use runner::{run_simulation, simulate_single_run, RunStats};
