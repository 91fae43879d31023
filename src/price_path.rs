//! Synthetic Price Paths
//!
//! Discretized driftless geometric Brownian motion, one sample per block.
//! The `-i * sigma^2 / 2` term keeps the price a martingale, which LVR needs
//! since it is measured against a driftless benchmark.

use eyre::{eyre, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// An immutable block-by-block price sequence; `path[0]` is the initial price
pub type PricePath = Vec<f64>;

#[derive(Debug, Clone)]
pub struct PathGenerator {
    initial_price: f64,
    block_sigma: f64,
    len: usize,
    increments: Normal<f64>,
}

impl PathGenerator {
    /// `len` is the number of blocks; `daily_std` is scaled down to one block
    pub fn new(initial_price: f64, daily_std: f64, blocks_per_day: u32, len: usize) -> Result<Self> {
        if !(initial_price.is_finite() && initial_price > 0.0) {
            return Err(eyre!("initial price must be positive and finite (got {})", initial_price));
        }
        if !(daily_std.is_finite() && daily_std >= 0.0) {
            return Err(eyre!("daily_std must be non-negative (got {})", daily_std));
        }
        if blocks_per_day == 0 {
            return Err(eyre!("blocks_per_day must be at least 1"));
        }
        if len == 0 {
            return Err(eyre!("path length must be at least 1"));
        }

        let block_sigma = daily_std / f64::from(blocks_per_day).sqrt();
        let increments = Normal::new(0.0, block_sigma)
            .map_err(|e| eyre!("invalid daily_std {}: {}", daily_std, e))?;

        Ok(Self {
            initial_price,
            block_sigma,
            len,
            increments,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn block_sigma(&self) -> f64 {
        self.block_sigma
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> PricePath {
        let mut path = Vec::with_capacity(self.len);
        self.fill(rng, &mut path);
        path
    }

    /// Regenerate into an existing buffer, reusing its allocation
    pub fn fill<R: Rng + ?Sized>(&self, rng: &mut R, path: &mut PricePath) {
        path.clear();

        let half_var = 0.5 * self.block_sigma * self.block_sigma;
        let mut z = 0.0;
        let mut log_price_0 = 0.0;

        for i in 0..self.len {
            z += self.increments.sample(rng);
            let log_price = z - i as f64 * half_var;
            if i == 0 {
                log_price_0 = log_price;
            }
            path.push((log_price - log_price_0).exp() * self.initial_price);
        }
    }
}
