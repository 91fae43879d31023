//! Parameter Sweeps
//!
//! Reruns the full simulation while one parameter (fee, volatility or depth)
//! takes each of a list of values. Every point reuses the base seed, so the
//! points see the same random draws and differences come from the parameter.

use eyre::{eyre, Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use super::engine::run_simulations_with_progress;
use crate::config::{SimulationConfig, SweepParam};
use crate::report::Summary;

#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    pub value: f64,
    pub summary: Summary,
}

pub fn run_sweep(
    base: &SimulationConfig,
    param: SweepParam,
    values: &[f64],
) -> Result<Vec<SweepPoint>> {
    run_sweep_with_progress(base, param, values, false)
}

/// Like `run_sweep`, optionally drawing one progress bar per point
pub fn run_sweep_with_progress(
    base: &SimulationConfig,
    param: SweepParam,
    values: &[f64],
    show_progress: bool,
) -> Result<Vec<SweepPoint>> {
    if values.is_empty() {
        return Err(eyre!("sweep over {} needs at least one value", param));
    }

    // Fail before spending any time on the valid points
    let configs = values
        .iter()
        .map(|&value| -> Result<(f64, SimulationConfig)> {
            let config = param.apply(base, value);
            config
                .validate()
                .wrap_err_with(|| format!("invalid sweep value {} = {}", param, value))?;
            Ok((value, config))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut points = Vec::with_capacity(configs.len());
    for (value, config) in configs {
        let progress = if show_progress {
            let pb = ProgressBar::new(config.paths as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {msg} [{bar:40}] {pos}/{len} ({eta})")?,
            );
            pb.set_message(format!("{} = {}", param, value));
            pb
        } else {
            ProgressBar::hidden()
        };

        let results = run_simulations_with_progress(&config, &progress)?;
        progress.finish_and_clear();

        let summary = Summary::from_matrix(&results, &config);
        debug!(
            "Sweep point {} = {}: lvr {:.2}/{:.2}",
            param, value, summary.means.lvr_low, summary.means.lvr_high
        );
        points.push(SweepPoint { value, summary });
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn sweep_base() -> SimulationConfig {
        SimulationConfig {
            blocks_per_day: 360,
            paths: 32,
            ..test_config()
        }
    }

    #[test]
    fn test_sweep_rejects_bad_values_up_front() {
        let base = sweep_base();
        assert!(run_sweep(&base, SweepParam::Fee, &[0.001, 1.2]).is_err());
        assert!(run_sweep(&base, SweepParam::DailyStd, &[]).is_err());
    }

    #[test]
    fn test_sweep_points_follow_values() {
        let base = sweep_base();
        let values = [0.02, 0.08];
        let points = run_sweep(&base, SweepParam::DailyStd, &values).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, 0.02);
        assert_eq!(points[1].summary.config.daily_std, 0.08);

        // LVR grows with variance
        assert!(
            points[1].summary.means.lvr_low > points[0].summary.means.lvr_low,
            "Expected more LVR at higher vol: {:.2} vs {:.2}",
            points[1].summary.means.lvr_low,
            points[0].summary.means.lvr_low
        );
    }

    #[test]
    fn test_deeper_pool_loses_more_in_absolute_terms() {
        let base = sweep_base();
        let points =
            run_sweep(&base, SweepParam::LiquidityPerBp, &[10_000.0, 100_000.0]).unwrap();
        assert!(points[1].summary.means.lvr_low > points[0].summary.means.lvr_low);
    }
}
