//! The Simulator
//!
//! Responsible for:
//! - Running many independent price paths through a low-gas and a high-gas pool
//! - Collecting per-path LVR, arbitrageur gain and gas burned
//! - Repeating the whole study across fee, volatility or depth values

mod engine;
mod sweep;

pub use engine::{
    run_simulations, run_simulations_with_progress, simulate_path, PathResult, ResultsMatrix,
    Row, Scenario, ScenarioStats, ROWS,
};
pub use sweep::{run_sweep, run_sweep_with_progress, SweepPoint};
