//! Reporter
//!
//! Averages the per-path statistics and derives how a gas increase splits
//! between LPs (more LVR) and arbitrageurs (more gas, less net gain).
//! Point estimates only.

use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;
use tracing::warn;

use crate::config::{SimulationConfig, SweepParam};
use crate::simulator::{ResultsMatrix, Row, SweepPoint};

/// Mean of each results row across paths, per simulated day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowMeans {
    pub lvr_low: f64,
    pub arb_gain_low: f64,
    pub gas_burned_low: f64,
    pub lvr_high: f64,
    pub arb_gain_high: f64,
    pub gas_burned_high: f64,
}

impl RowMeans {
    pub fn from_matrix(results: &ResultsMatrix) -> Self {
        Self {
            lvr_low: results.row_mean(Row::LvrLow),
            arb_gain_low: results.row_mean(Row::ArbGainLow),
            gas_burned_low: results.row_mean(Row::GasBurnedLow),
            lvr_high: results.row_mean(Row::LvrHigh),
            arb_gain_high: results.row_mean(Row::ArbGainHigh),
            gas_burned_high: results.row_mean(Row::GasBurnedHigh),
        }
    }
}

/// Derived ratios; `None` where the denominator vanishes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ratios {
    /// Fraction of LVR burned as gas, low scenario
    pub gas_share_low: Option<f64>,

    /// Fraction of LVR burned as gas, high scenario
    pub gas_share_high: Option<f64>,

    /// Extra LP loss per day when moving from low to high gas
    pub incremental_lvr: f64,

    /// Share of the extra LVR that ends up as gas
    pub incremental_gas_share: Option<f64>,

    /// Share of the extra LVR that ends up as arbitrageur gain
    pub incremental_arb_share: Option<f64>,

    pub trades_per_day_low: Option<f64>,
    pub trades_per_day_high: Option<f64>,
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

impl Ratios {
    pub fn from_means(means: &RowMeans, config: &SimulationConfig) -> Self {
        let incremental_lvr = means.lvr_high - means.lvr_low;

        Self {
            gas_share_low: ratio(means.gas_burned_low, means.lvr_low),
            gas_share_high: ratio(means.gas_burned_high, means.lvr_high),
            incremental_lvr,
            incremental_gas_share: ratio(
                means.gas_burned_high - means.gas_burned_low,
                incremental_lvr,
            ),
            incremental_arb_share: ratio(
                means.arb_gain_high - means.arb_gain_low,
                incremental_lvr,
            ),
            trades_per_day_low: ratio(means.gas_burned_low, config.low_gas_cost),
            trades_per_day_high: ratio(means.gas_burned_high, config.high_gas_cost),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub generated_at: DateTime<Utc>,
    pub config: SimulationConfig,
    pub paths: usize,
    pub means: RowMeans,
    pub ratios: Ratios,
}

impl Summary {
    pub fn from_matrix(results: &ResultsMatrix, config: &SimulationConfig) -> Self {
        let means = RowMeans::from_matrix(results);
        let ratios = Ratios::from_means(&means, config);

        if ratios.incremental_gas_share.is_none() {
            warn!("LVR identical in both gas scenarios; incremental shares undefined");
        }

        Self {
            generated_at: Utc::now(),
            config: config.clone(),
            paths: results.paths(),
            means,
            ratios,
        }
    }

    /// Print the summary table
    pub fn print(&self) {
        let m = &self.means;
        let r = &self.ratios;

        println!();
        println!("{}", style("═══ RESULTS (per day, mean over paths) ═══").green().bold());
        println!();
        println!(
            "  {:<22} {:>16} {:>16}",
            "",
            style(format!("gas {:.4}", self.config.low_gas_cost)).cyan(),
            style(format!("gas {:.4}", self.config.high_gas_cost)).cyan()
        );
        println!("  {:<22} {:>16.4} {:>16.4}", "LVR", m.lvr_low, m.lvr_high);
        println!(
            "  {:<22} {:>16.4} {:>16.4}",
            "Arbitrageur gain", m.arb_gain_low, m.arb_gain_high
        );
        println!(
            "  {:<22} {:>16.4} {:>16.4}",
            "Gas burned", m.gas_burned_low, m.gas_burned_high
        );
        println!(
            "  {:<22} {:>16} {:>16}",
            "Trades / day",
            fmt_opt(r.trades_per_day_low, 1),
            fmt_opt(r.trades_per_day_high, 1)
        );
        println!(
            "  {:<22} {:>16} {:>16}",
            "Gas share of LVR",
            fmt_pct(r.gas_share_low),
            fmt_pct(r.gas_share_high)
        );
        println!();
        println!("{}", style("Moving from low to high gas:").magenta().bold());
        println!("  • Extra LVR / day:          {:+.4}", r.incremental_lvr);
        println!(
            "  • Paid as gas:              {}",
            style(fmt_pct(r.incremental_gas_share)).yellow()
        );
        println!(
            "  • Kept by arbitrageurs:     {}",
            style(fmt_pct(r.incremental_arb_share)).yellow()
        );
        println!();
        println!(
            "  {} paths, generated {}",
            self.paths,
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "n/a".to_string())
}

fn fmt_pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}%", v * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}

/// One row per sweep point
pub fn print_sweep_table(param: SweepParam, points: &[SweepPoint]) {
    println!();
    println!(
        "{}",
        style(format!("═══ SWEEP OVER {} ═══", param.to_string().to_uppercase()))
            .green()
            .bold()
    );
    println!();
    println!(
        "  {:>14} {:>14} {:>14} {:>14} {:>12} {:>12}",
        param.to_string(),
        "lvr_low",
        "lvr_high",
        "extra_lvr",
        "gas_share",
        "arb_share"
    );
    println!("  {}", "─".repeat(86));

    for point in points {
        let r = &point.summary.ratios;
        println!(
            "  {:>14.6} {:>14.4} {:>14.4} {:>+14.4} {:>12} {:>12}",
            point.value,
            point.summary.means.lvr_low,
            point.summary.means.lvr_high,
            r.incremental_lvr,
            fmt_pct(r.incremental_gas_share),
            fmt_pct(r.incremental_arb_share)
        );
    }
    println!();
}
