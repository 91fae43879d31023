//! Gas Cost Conversion
//!
//! The simulator treats gas as a fixed, quote-denominated cost per arbitrage
//! transaction. These helpers turn the usual on-chain description (gas units
//! times a gwei price, paid in the native asset) into that unit.

use eyre::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Gas used by a single-pool arbitrage swap
pub const DEFAULT_SWAP_GAS_UNITS: u64 = 150_000;

/// Quote cost of `gas_units` at `gas_price_gwei`, with the native asset worth
/// `native_price` quote units
pub fn gas_cost_in_quote(gas_units: u64, gas_price_gwei: f64, native_price: f64) -> f64 {
    let gas_native = (gas_units as f64) * gas_price_gwei * 1e-9;
    gas_native * native_price
}

/// Low/high gas price pair that the two simulated scenarios pay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasSchedule {
    pub gas_units: u64,
    pub low_gwei: f64,
    pub high_gwei: f64,
}

impl GasSchedule {
    pub fn new(gas_units: u64, low_gwei: f64, high_gwei: f64) -> Result<Self> {
        ensure!(gas_units > 0, "gas_units must be positive");
        ensure!(
            low_gwei.is_finite() && low_gwei >= 0.0,
            "low gas price must be non-negative (got {} gwei)",
            low_gwei
        );
        ensure!(
            high_gwei.is_finite() && high_gwei >= 0.0,
            "high gas price must be non-negative (got {} gwei)",
            high_gwei
        );
        Ok(Self {
            gas_units,
            low_gwei,
            high_gwei,
        })
    }

    /// (low, high) costs in quote units, priced at `native_price`
    pub fn quote_costs(&self, native_price: f64) -> (f64, f64) {
        (
            gas_cost_in_quote(self.gas_units, self.low_gwei, native_price),
            gas_cost_in_quote(self.gas_units, self.high_gwei, native_price),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_cost_in_quote() {
        // 200,000 gas at 20 gwei, ETH = $3500
        // = 0.004 ETH = $14
        let cost = gas_cost_in_quote(200_000, 20.0, 3500.0);
        assert!((cost - 14.0).abs() < 0.01);
    }

    #[test]
    fn test_schedule_costs() {
        let schedule = GasSchedule::new(DEFAULT_SWAP_GAS_UNITS, 33.333, 35.0).unwrap();
        let (low, high) = schedule.quote_costs(2000.0);
        assert!((low - 10.0).abs() < 0.01, "Expected ~$10, got ${:.4}", low);
        assert!((high - 10.5).abs() < 0.01, "Expected ~$10.5, got ${:.4}", high);
    }

    #[test]
    fn test_schedule_validation() {
        assert!(GasSchedule::new(0, 1.0, 2.0).is_err());
        assert!(GasSchedule::new(100, -1.0, 2.0).is_err());
        assert!(GasSchedule::new(100, 1.0, f64::NAN).is_err());
        assert!(GasSchedule::new(100, 0.0, 0.0).is_ok());
    }
}
