//! LVR vs Gas
//!
//! Monte Carlo study of how a fixed per-transaction gas cost changes what
//! liquidity providers lose to arbitrageurs in a constant-liquidity AMM.
//!
//! - `pool`: the AMM and its gas-gated arbitrage trade
//! - `price_path`: driftless geometric price paths, one point per block
//! - `simulator`: the parallel path loop and parameter sweeps
//! - `report`: averages and derived ratios

pub mod config;
pub mod gas;
pub mod pool;
pub mod price_path;
pub mod report;
pub mod simulator;

pub use config::{ConfigFile, SimulationConfig, SweepConfig, SweepParam};
pub use pool::{Pool, Quote, Trade};
pub use price_path::{PathGenerator, PricePath};
pub use report::Summary;
pub use simulator::{run_simulations, ResultsMatrix, Row};
