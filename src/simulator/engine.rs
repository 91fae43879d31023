//! Monte Carlo Engine
//!
//! Drives one price path at a time through two pools that differ only in the
//! gas cost their arbitrageur pays, and stores one six-row column per path.
//!
//! Paths are independent, so they run in parallel over disjoint columns of a
//! pre-sized results arena. Path `i` always draws from its own generator seeded
//! with `seed + i`; output does not depend on thread count.

use eyre::Result;
use indicatif::ProgressBar;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::pool::{Pool, Trade};
use crate::price_path::{PathGenerator, PricePath};

/// Rows per path column
pub const ROWS: usize = 6;

/// Row layout of the results matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    LvrLow = 0,
    ArbGainLow = 1,
    GasBurnedLow = 2,
    LvrHigh = 3,
    ArbGainHigh = 4,
    GasBurnedHigh = 5,
}

impl Row {
    pub const ALL: [Row; ROWS] = [
        Row::LvrLow,
        Row::ArbGainLow,
        Row::GasBurnedLow,
        Row::LvrHigh,
        Row::ArbGainHigh,
        Row::GasBurnedHigh,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Row::LvrLow => "lvr_low",
            Row::ArbGainLow => "arb_gain_low",
            Row::GasBurnedLow => "gas_burned_low",
            Row::LvrHigh => "lvr_high",
            Row::ArbGainHigh => "arb_gain_high",
            Row::GasBurnedHigh => "gas_burned_high",
        }
    }
}

// ============================================
// PER-SCENARIO ACCUMULATORS
// ============================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScenarioStats {
    /// LP loss to the arbitrageur: its post-fee, pre-gas profit
    pub lvr: f64,

    /// Arbitrageur profit net of gas
    pub arb_gain: f64,

    /// Gas paid on executed trades
    pub gas_burned: f64,
}

impl ScenarioStats {
    pub fn record(&mut self, trade: &Trade, price: f64, gas_cost: f64) {
        let profit = trade.profit(price);
        self.lvr += profit;

        if trade.is_executed() {
            self.arb_gain += profit - gas_cost;
            self.gas_burned += gas_cost;
        }
    }

    pub fn per_day(&self, days: u32) -> Self {
        let days = f64::from(days);
        Self {
            lvr: self.lvr / days,
            arb_gain: self.arb_gain / days,
            gas_burned: self.gas_burned / days,
        }
    }
}

/// One pool plus the arbitrage statistics collected against it
#[derive(Debug, Clone)]
pub struct Scenario {
    pool: Pool,
    gas_cost: f64,
    stats: ScenarioStats,
    trades: usize,
}

impl Scenario {
    pub fn new(config: &SimulationConfig, gas_cost: f64) -> Result<Self> {
        Ok(Self {
            pool: Pool::new(config.fee, config.initial_price, config.liquidity_per_bp)?,
            gas_cost,
            stats: ScenarioStats::default(),
            trades: 0,
        })
    }

    /// Offer the arbitrageur this block's price
    pub fn step(&mut self, price: f64) {
        let trade = self.pool.trade_to_price_with_gas_fee(price, self.gas_cost);
        if trade.is_executed() {
            self.trades += 1;
        }
        self.stats.record(&trade, price, self.gas_cost);
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn stats(&self) -> ScenarioStats {
        self.stats
    }

    pub fn trades(&self) -> usize {
        self.trades
    }
}

/// Per-day statistics of both scenarios on one path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathResult {
    pub low: ScenarioStats,
    pub high: ScenarioStats,
}

impl PathResult {
    pub fn to_column(&self) -> [f64; ROWS] {
        [
            self.low.lvr,
            self.low.arb_gain,
            self.low.gas_burned,
            self.high.lvr,
            self.high.arb_gain,
            self.high.gas_burned,
        ]
    }
}

/// Run both gas scenarios over `path`, starting from block 1
pub fn simulate_path(config: &SimulationConfig, path: &[f64]) -> Result<PathResult> {
    config.validate()?;

    let mut low = Scenario::new(config, config.low_gas_cost)?;
    let mut high = Scenario::new(config, config.high_gas_cost)?;

    for &price in path.iter().skip(1) {
        low.step(price);
        high.step(price);
    }

    debug!(
        "Path done: {} low-gas trades, {} high-gas trades",
        low.trades(),
        high.trades()
    );

    Ok(PathResult {
        low: low.stats().per_day(config.days),
        high: high.stats().per_day(config.days),
    })
}

// ============================================
// RESULTS ARENA
// ============================================

/// `6 x paths` matrix stored column by column
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsMatrix {
    paths: usize,
    data: Vec<f64>,
}

impl ResultsMatrix {
    pub fn zeros(paths: usize) -> Self {
        Self {
            paths,
            data: vec![0.0; ROWS * paths],
        }
    }

    pub fn paths(&self) -> usize {
        self.paths
    }

    pub fn get(&self, row: Row, path: usize) -> f64 {
        self.data[path * ROWS + row.index()]
    }

    pub fn column(&self, path: usize) -> &[f64] {
        &self.data[path * ROWS..(path + 1) * ROWS]
    }

    pub fn columns(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(ROWS)
    }

    pub fn row(&self, row: Row) -> impl Iterator<Item = f64> + '_ {
        self.columns().map(move |c| c[row.index()])
    }

    pub fn row_mean(&self, row: Row) -> f64 {
        if self.paths == 0 {
            return 0.0;
        }
        self.row(row).sum::<f64>() / self.paths as f64
    }

    fn columns_mut(&mut self) -> rayon::slice::ChunksExactMut<'_, f64> {
        self.data.par_chunks_exact_mut(ROWS)
    }
}

// ============================================
// DRIVER
// ============================================

pub fn run_simulations(config: &SimulationConfig) -> Result<ResultsMatrix> {
    run_simulations_with_progress(config, &ProgressBar::hidden())
}

/// Run every path of `config`, ticking `progress` once per finished path
pub fn run_simulations_with_progress(
    config: &SimulationConfig,
    progress: &ProgressBar,
) -> Result<ResultsMatrix> {
    config.validate()?;

    let blocks = config.blocks();
    let generator = PathGenerator::new(
        config.initial_price,
        config.daily_std,
        config.blocks_per_day,
        blocks,
    )?;

    info!(
        "Simulating {} paths x {} blocks (fee {:.2}bp, gas {:.4}/{:.4})",
        config.paths,
        blocks,
        config.fee * 10_000.0,
        config.low_gas_cost,
        config.high_gas_cost
    );
    let start = Instant::now();

    let mut results = ResultsMatrix::zeros(config.paths);
    results
        .columns_mut()
        .enumerate()
        .try_for_each_init(
            || PricePath::with_capacity(blocks),
            |path, (i, column)| -> Result<()> {
                let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(i as u64));
                generator.fill(&mut rng, path);

                let result = simulate_path(config, path)?;
                column.copy_from_slice(&result.to_column());
                progress.inc(1);
                Ok(())
            },
        )?;

    info!(
        "Simulated {} paths in {:?}",
        config.paths,
        start.elapsed()
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            blocks_per_day: 720,
            paths: 64,
            ..test_config()
        }
    }

    #[test]
    fn test_record_only_counts_gas_on_execution() {
        let mut stats = ScenarioStats::default();
        stats.record(&Trade::NONE, 2000.0, 10.0);
        assert_eq!(stats, ScenarioStats::default());

        let trade = Trade { x: 1.0, y: -1990.0, swap_fee: 1.0 };
        stats.record(&trade, 2015.0, 10.0);
        assert!((stats.lvr - 25.0).abs() < 1e-9);
        assert!((stats.arb_gain - 15.0).abs() < 1e-9);
        assert!((stats.gas_burned - 10.0).abs() < 1e-9);

        let per_day = stats.per_day(5);
        assert!((per_day.lvr - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_path_never_trades() {
        let config = small_config();
        let path = vec![config.initial_price; 100];
        let result = simulate_path(&config, &path).unwrap();
        assert_eq!(result.to_column(), [0.0; ROWS]);
    }

    #[test]
    fn test_single_jump() {
        let config = SimulationConfig {
            low_gas_cost: 0.0,
            high_gas_cost: 1e12,
            ..small_config()
        };
        let path = vec![2000.0, 2100.0];
        let result = simulate_path(&config, &path).unwrap();

        let mut pool = Pool::new(config.fee, 2000.0, config.liquidity_per_bp).unwrap();
        let expected = pool.breakeven_gas(2100.0);
        assert!(pool.trade_to_price_with_gas_fee(2100.0, 1e12) == Trade::NONE);

        assert!((result.low.lvr - expected).abs() < 1e-6 * expected);
        assert!((result.low.arb_gain - expected).abs() < 1e-6 * expected);
        assert_eq!(result.low.gas_burned, 0.0);
        assert_eq!(result.high, ScenarioStats::default());
    }

    #[test]
    fn test_simulate_path_rejects_invalid_config() {
        let path = vec![2000.0, 2100.0];
        let zero_days = SimulationConfig { days: 0, ..small_config() };
        assert!(
            simulate_path(&zero_days, &path).is_err(),
            "days = 0 must fail instead of dividing by zero"
        );
        let bad_gas = SimulationConfig { low_gas_cost: -1.0, ..small_config() };
        assert!(simulate_path(&bad_gas, &path).is_err());
    }

    #[test]
    fn test_first_block_is_skipped() {
        // A jump already in path[0] would be traded if block 0 were stepped
        let config = small_config();
        let path = vec![2500.0];
        let result = simulate_path(&config, &path).unwrap();
        assert_eq!(result.to_column(), [0.0; ROWS]);
    }

    #[test]
    fn test_results_shape_and_identities() {
        let config = small_config();
        let results = run_simulations(&config).unwrap();
        assert_eq!(results.paths(), config.paths);
        assert_eq!(results.columns().count(), config.paths);

        for column in results.columns() {
            let (lvr_low, arb_low, gas_low) = (column[0], column[1], column[2]);
            let (lvr_high, arb_high, gas_high) = (column[3], column[4], column[5]);

            assert!(lvr_low >= 0.0 && lvr_high >= 0.0);
            assert!(arb_low >= 0.0 && arb_high >= 0.0, "Gated trades never lose");
            assert!(gas_low >= 0.0 && gas_high >= 0.0);
            assert!((lvr_low - (arb_low + gas_low)).abs() < 1e-6 * lvr_low.max(1.0));
            assert!((lvr_high - (arb_high + gas_high)).abs() < 1e-6 * lvr_high.max(1.0));

            // Gas burned is a whole number of trades
            let trades = gas_low / config.low_gas_cost;
            assert!((trades - trades.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_reproducible_with_seed() {
        let config = small_config();
        let a = run_simulations(&config).unwrap();
        let b = run_simulations(&config).unwrap();
        assert_eq!(a, b);

        let c = run_simulations(&SimulationConfig { seed: 43, ..config }).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_column_matches_serial_path() {
        let config = small_config();
        let results = run_simulations(&config).unwrap();

        let generator = PathGenerator::new(
            config.initial_price,
            config.daily_std,
            config.blocks_per_day,
            config.blocks(),
        )
        .unwrap();
        let i = 17;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed + i as u64);
        let path = generator.generate(&mut rng);
        let expected = simulate_path(&config, &path).unwrap().to_column();

        assert_eq!(results.column(i), &expected[..]);
        assert_eq!(results.get(Row::GasBurnedHigh, i), expected[5]);
    }

    #[test]
    fn test_normalized_per_day() {
        let one_day = small_config();
        let two_days = SimulationConfig { days: 2, ..small_config() };
        let a = run_simulations(&one_day).unwrap();
        let b = run_simulations(&two_days).unwrap();

        // Per-day LVR over a longer horizon stays in the same ballpark
        let (la, lb) = (a.row_mean(Row::LvrLow), b.row_mean(Row::LvrLow));
        assert!(lb > 0.5 * la && lb < 2.0 * la, "lvr/day {:.2} vs {:.2}", la, lb);
    }

    #[test]
    fn test_identical_gas_gives_identical_scenarios() {
        let config = SimulationConfig {
            low_gas_cost: 0.0,
            high_gas_cost: 0.0,
            ..small_config()
        };
        let results = run_simulations(&config).unwrap();
        for column in results.columns() {
            assert_eq!(column[2], 0.0);
            assert_eq!(column[0], column[3], "Identical gas gives identical scenarios");
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulationConfig { fee: 1.5, ..small_config() };
        assert!(run_simulations(&config).is_err());
    }

    #[test]
    fn test_higher_gas_means_fewer_trades() {
        let config = SimulationConfig {
            low_gas_cost: 1.0,
            high_gas_cost: 50.0,
            ..small_config()
        };
        let results = run_simulations(&config).unwrap();
        let trades_low = results.row_mean(Row::GasBurnedLow) / config.low_gas_cost;
        let trades_high = results.row_mean(Row::GasBurnedHigh) / config.high_gas_cost;
        assert!(
            trades_high < trades_low,
            "Expected fewer trades at higher gas: {:.1} vs {:.1}",
            trades_high,
            trades_low
        );
        assert!(results.row_mean(Row::GasBurnedLow) > 0.0);
    }
}
