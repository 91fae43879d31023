//! Constant-Liquidity Pool
//!
//! A single full-range (Uniswap V2 equivalent) pool described by its square-root
//! price and a fixed liquidity constant. The only state that ever changes is the
//! square-root price, and it only moves when an arbitrageur's trade clears gas.
//!
//! Sign convention for every `Trade`: amounts are from the client's (the
//! arbitrageur's) point of view. Positive means the client receives the asset,
//! negative means the client pays it.

use eyre::{ensure, Result};

/// Price ratio of a one basis point move
const ONE_BP_PRICE_RATIO: f64 = 1.0001;

/// Outcome of a swap against the pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trade {
    /// Base asset amount (positive = client receives base)
    pub x: f64,

    /// Quote asset amount, fee inclusive (positive = client receives quote)
    pub y: f64,

    /// Swap fee collected by the pool, in quote units
    pub swap_fee: f64,
}

impl Trade {
    /// The neutral outcome: nothing traded
    pub const NONE: Trade = Trade {
        x: 0.0,
        y: 0.0,
        swap_fee: 0.0,
    };

    pub fn is_executed(&self) -> bool {
        self.x != 0.0
    }

    /// Client profit marked at `price`, after swap fee and before gas
    pub fn profit(&self, price: f64) -> f64 {
        self.x * price + self.y
    }
}

/// A trade the pool would accept, before any gas gating
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub trade: Trade,
    pub new_sqrt_price: f64,
}

impl Quote {
    pub fn profit(&self, target_price: f64) -> f64 {
        self.trade.profit(target_price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    sqrt_price: f64,
    liquidity: f64,
    fee: f64,
}

impl Pool {
    /// Create a pool whose depth is given as quote liquidity per basis point of price
    pub fn new(fee: f64, price: f64, liquidity_per_bp: f64) -> Result<Self> {
        ensure!(
            liquidity_per_bp.is_finite() && liquidity_per_bp > 0.0,
            "liquidity_per_bp must be positive and finite (got {})",
            liquidity_per_bp
        );
        ensure!(
            price.is_finite() && price > 0.0,
            "initial price must be positive and finite (got {})",
            price
        );

        let sqrt_price = price.sqrt();
        let liquidity = liquidity_per_bp / (sqrt_price * (ONE_BP_PRICE_RATIO.sqrt() - 1.0));
        Self::with_liquidity(fee, price, liquidity)
    }

    /// Create a pool directly from the invariant's liquidity constant
    pub fn with_liquidity(fee: f64, price: f64, liquidity: f64) -> Result<Self> {
        ensure!(
            (0.0..1.0).contains(&fee),
            "fee must be in [0, 1) (got {})",
            fee
        );
        ensure!(
            price.is_finite() && price > 0.0,
            "initial price must be positive and finite (got {})",
            price
        );
        ensure!(
            liquidity.is_finite() && liquidity > 0.0,
            "liquidity must be positive and finite (got {})",
            liquidity
        );

        Ok(Self {
            sqrt_price: price.sqrt(),
            liquidity,
            fee,
        })
    }

    pub fn sqrt_price(&self) -> f64 {
        self.sqrt_price
    }

    pub fn liquidity(&self) -> f64 {
        self.liquidity
    }

    pub fn fee(&self) -> f64 {
        self.fee
    }

    pub fn price(&self) -> f64 {
        self.sqrt_price * self.sqrt_price
    }

    pub fn base_reserves(&self) -> f64 {
        self.liquidity / self.sqrt_price
    }

    pub fn quote_reserves(&self) -> f64 {
        self.liquidity * self.sqrt_price
    }

    /// (base reserves, quote reserves)
    pub fn reserves(&self) -> (f64, f64) {
        (self.base_reserves(), self.quote_reserves())
    }

    /// (bid, ask) inclusive of the swap fee; the no-arbitrage band
    pub fn bid_ask_spread(&self) -> (f64, f64) {
        let price = self.price();
        (price * (1.0 - self.fee), price / (1.0 - self.fee))
    }

    /// The trade that would move the pool's fee-adjusted price onto `target_price`.
    ///
    /// Returns `None` when the target sits inside the band (boundaries included),
    /// where no arbitrage exists at any gas cost. Does not touch pool state.
    pub fn quote(&self, target_price: f64) -> Option<Quote> {
        let (bid, ask) = self.bid_ask_spread();
        let keep = 1.0 - self.fee;

        let buying = if target_price > ask {
            true
        } else if target_price < bid {
            false
        } else {
            return None;
        };

        let new_sqrt_price = if buying {
            (target_price * keep).sqrt()
        } else {
            (target_price / keep).sqrt()
        };

        let delta = new_sqrt_price - self.sqrt_price;
        let raw_y = -delta * self.liquidity;
        let x = delta * self.liquidity / (self.sqrt_price * new_sqrt_price);

        // Fee is charged on the quote side in both directions
        let (y, swap_fee) = if buying {
            let y = raw_y / keep;
            (y, -y * self.fee * keep)
        } else {
            let y = raw_y * keep;
            (y, y * self.fee)
        };

        Some(Quote {
            trade: Trade { x, y, swap_fee },
            new_sqrt_price,
        })
    }

    /// Largest gas cost at which an arbitrageur still trades toward `target_price`
    pub fn breakeven_gas(&self, target_price: f64) -> f64 {
        self.quote(target_price)
            .map(|q| q.profit(target_price))
            .unwrap_or(0.0)
    }

    /// Nearest external prices (below, above) at which an arbitrage clears `gas_cost`.
    ///
    /// Selling into the pool can earn at most the quote reserves, so the lower
    /// trigger is `None` when gas exceeds that.
    pub fn trigger_prices(&self, gas_cost: f64) -> (Option<f64>, Option<f64>) {
        let (bid, ask) = self.bid_ask_spread();
        (
            self.search_trigger(bid, 0.5, gas_cost),
            self.search_trigger(ask, 2.0, gas_cost),
        )
    }

    fn search_trigger(&self, edge: f64, step: f64, gas_cost: f64) -> Option<f64> {
        const MAX_EXPANSIONS: usize = 64;
        const BISECTIONS: usize = 100;

        // Expand outward from the band edge until the trade pays, then bisect
        let mut inner = edge;
        let mut outer = edge * step;
        let mut expansions = 0;
        while self.breakeven_gas(outer) < gas_cost {
            expansions += 1;
            if expansions > MAX_EXPANSIONS {
                return None;
            }
            inner = outer;
            outer *= step;
        }

        for _ in 0..BISECTIONS {
            let mid = 0.5 * (inner + outer);
            if self.breakeven_gas(mid) >= gas_cost {
                outer = mid;
            } else {
                inner = mid;
            }
        }
        Some(outer)
    }

    /// Let an arbitrageur trade the pool toward `target_price` if it pays for gas.
    ///
    /// The trade commits only when its post-fee profit at `target_price` is at
    /// least `gas_cost`; otherwise the pool is untouched and `Trade::NONE` comes
    /// back. Gas itself never touches pool state.
    pub fn trade_to_price_with_gas_fee(&mut self, target_price: f64, gas_cost: f64) -> Trade {
        match self.quote(target_price) {
            Some(quote) if quote.profit(target_price) >= gas_cost => {
                self.sqrt_price = quote.new_sqrt_price;
                quote.trade
            }
            _ => Trade::NONE,
        }
    }
}
