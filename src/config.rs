//! Simulation Configuration
//!
//! Every parameter of a run is explicit here; nothing is read from globals or
//! the environment. Configs round-trip through TOML so a study can be rerun
//! exactly, seed included.

use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================
// SIMULATION PARAMETERS
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Proportional swap fee in [0, 1)
    pub fee: f64,

    /// Starting price of the base asset, in quote units
    pub initial_price: f64,

    /// Daily standard deviation of log returns
    pub daily_std: f64,

    /// Blocks per simulated day (7200 = 12s blocks)
    pub blocks_per_day: u32,

    /// Simulated days per path
    pub days: u32,

    /// Number of independent price paths
    pub paths: usize,

    /// Gas cost per arbitrage in the low scenario, in quote units
    pub low_gas_cost: f64,

    /// Gas cost per arbitrage in the high scenario, in quote units
    pub high_gas_cost: f64,

    /// Pool depth: quote liquidity per basis point of price
    pub liquidity_per_bp: f64,

    /// Base seed; path `i` draws from `seed + i`
    pub seed: u64,
}

impl SimulationConfig {
    /// One day of 12s blocks on an ETH/USD-like pool: 5bp fee, 5% daily vol,
    /// 50k of depth per bp, gas of 10 vs 10.5 quote units
    pub fn reference() -> Self {
        Self {
            fee: 0.0005,
            initial_price: 2000.0,
            daily_std: 0.05,
            blocks_per_day: 7200,
            days: 1,
            paths: 10_000,
            low_gas_cost: 10.0,
            high_gas_cost: 10.5,
            liquidity_per_bp: 50_000.0,
            seed: 42,
        }
    }

    /// Path length T in blocks
    pub fn blocks(&self) -> usize {
        self.days as usize * self.blocks_per_day as usize
    }

    /// Per-block volatility
    pub fn block_sigma(&self) -> f64 {
        self.daily_std / f64::from(self.blocks_per_day).sqrt()
    }

    /// Reject anything outside the model's preconditions. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        if !(self.fee.is_finite() && (0.0..1.0).contains(&self.fee)) {
            return Err(eyre!("fee must be in [0, 1) (got {})", self.fee));
        }
        if !(self.initial_price.is_finite() && self.initial_price > 0.0) {
            return Err(eyre!(
                "initial_price must be positive (got {})",
                self.initial_price
            ));
        }
        if !(self.daily_std.is_finite() && self.daily_std >= 0.0) {
            return Err(eyre!(
                "daily_std must be non-negative (got {})",
                self.daily_std
            ));
        }
        if !(self.liquidity_per_bp.is_finite() && self.liquidity_per_bp > 0.0) {
            return Err(eyre!(
                "liquidity_per_bp must be positive (got {})",
                self.liquidity_per_bp
            ));
        }
        if self.blocks_per_day == 0 {
            return Err(eyre!("blocks_per_day must be at least 1"));
        }
        if self.days == 0 {
            return Err(eyre!("days must be at least 1"));
        }
        if self.paths == 0 {
            return Err(eyre!("paths must be at least 1"));
        }
        for (name, cost) in [
            ("low_gas_cost", self.low_gas_cost),
            ("high_gas_cost", self.high_gas_cost),
        ] {
            if !(cost.is_finite() && cost >= 0.0) {
                return Err(eyre!("{} must be non-negative (got {})", name, cost));
            }
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              LVR vs GAS - CONFIGURATION                    ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ POOL                                                       ║");
        println!("║ • Swap Fee:        {:>37.2} bp ║", self.fee * 10_000.0);
        println!("║ • Initial Price:   {:>40.2} ║", self.initial_price);
        println!("║ • Liquidity / bp:  {:>40.0} ║", self.liquidity_per_bp);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ PRICE PROCESS                                              ║");
        println!("║ • Daily Vol:       {:>39.2}% ║", self.daily_std * 100.0);
        println!("║ • Blocks / Day:    {:>40} ║", self.blocks_per_day);
        println!("║ • Days:            {:>40} ║", self.days);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ GAS                                                        ║");
        println!("║ • Low Scenario:    {:>40.4} ║", self.low_gas_cost);
        println!("║ • High Scenario:   {:>40.4} ║", self.high_gas_cost);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ MONTE CARLO                                                ║");
        println!("║ • Paths:           {:>40} ║", self.paths);
        println!("║ • Seed:            {:>40} ║", self.seed);
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

// ============================================
// SWEEPS
// ============================================

/// Which parameter a sweep varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SweepParam {
    Fee,
    DailyStd,
    LiquidityPerBp,
}

impl SweepParam {
    /// Copy of `base` with this parameter replaced by `value`
    pub fn apply(&self, base: &SimulationConfig, value: f64) -> SimulationConfig {
        let mut config = base.clone();
        match self {
            SweepParam::Fee => config.fee = value,
            SweepParam::DailyStd => config.daily_std = value,
            SweepParam::LiquidityPerBp => config.liquidity_per_bp = value,
        }
        config
    }

    pub fn current(&self, config: &SimulationConfig) -> f64 {
        match self {
            SweepParam::Fee => config.fee,
            SweepParam::DailyStd => config.daily_std,
            SweepParam::LiquidityPerBp => config.liquidity_per_bp,
        }
    }
}

impl std::fmt::Display for SweepParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepParam::Fee => write!(f, "fee"),
            SweepParam::DailyStd => write!(f, "daily_std"),
            SweepParam::LiquidityPerBp => write!(f, "liquidity_per_bp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub param: SweepParam,
    pub values: Vec<f64>,
}

// ============================================
// CONFIG FILE
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub simulation: SimulationConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepConfig>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
pub(crate) fn test_config() -> SimulationConfig {
    SimulationConfig {
        paths: 8,
        ..SimulationConfig::reference()
    }
}
