//! Diagnostic tool - Check how wide the no-trade band is
//!
//! Run with: cargo run --bin diagnose -- --config lvr.toml
//!
//! Prints the pool's reserves and fee band, then for each gas level the
//! smallest price moves that make an arbitrage worth paying for.

use clap::Parser;
use color_eyre::eyre::Result;
use console::style;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lvr_gas::config::{ConfigFile, SimulationConfig};
use lvr_gas::pool::Pool;

#[derive(Parser)]
#[command(name = "diagnose", about = "Show the fee band and gas trigger prices of a pool")]
struct Cli {
    /// TOML config file (reference scenario when omitted)
    #[arg(long, short)]
    config: Option<std::path::PathBuf>,
}

fn bps(from: f64, to: f64) -> f64 {
    (to / from - 1.0) * 10_000.0
}

fn fmt_trigger(price: f64, trigger: Option<f64>) -> String {
    match trigger {
        Some(t) => format!("{:>14.4} ({:>+9.2} bp)", t, bps(price, t)),
        None => format!("{:>14} {:>14}", "never", ""),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lvr_gas=info".parse()?)
                .add_directive("diagnose=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            info!("Loaded config from {}", path.display());
            ConfigFile::from_file(path)?.simulation
        }
        None => SimulationConfig::reference(),
    };
    config.validate()?;

    let pool = Pool::new(config.fee, config.initial_price, config.liquidity_per_bp)?;
    let price = pool.price();
    let (bid, ask) = pool.bid_ask_spread();
    let (base, quote) = pool.reserves();

    println!("🔍 LVR/GAS POOL DIAGNOSTIC\n");

    println!("═══════════════════════════════════════════════════");
    println!("                       POOL                         ");
    println!("═══════════════════════════════════════════════════\n");

    println!("  Price:           {:>14.4}", price);
    println!("  Liquidity (L):   {:>14.4}", pool.liquidity());
    println!("  Base reserves:   {:>14.4}", base);
    println!("  Quote reserves:  {:>14.4}", quote);
    println!("  Bid:             {:>14.4} ({:>+9.2} bp)", bid, bps(price, bid));
    println!("  Ask:             {:>14.4} ({:>+9.2} bp)", ask, bps(price, ask));

    let one_sigma = config.block_sigma() * 10_000.0;
    println!("  1σ block move:   {:>14.2} bp", one_sigma);

    println!("\n═══════════════════════════════════════════════════");
    println!("                  GAS TRIGGERS                      ");
    println!("═══════════════════════════════════════════════════\n");

    for (label, gas) in [
        ("low", config.low_gas_cost),
        ("high", config.high_gas_cost),
    ] {
        let (down, up) = pool.trigger_prices(gas);
        println!(
            "  {} gas = {:.4}",
            style(label).cyan().bold(),
            gas
        );
        println!("    └─ sell below: {}", fmt_trigger(price, down));
        println!("    └─ buy above:  {}", fmt_trigger(price, up));

        if let Some(up) = up {
            let sigmas = bps(price, up) / one_sigma;
            if one_sigma > 0.0 && sigmas > 3.0 {
                println!(
                    "    {} trigger is {:.1}σ away; expect few trades per day",
                    style("⚠").yellow(),
                    sigmas
                );
            }
        }
        println!();
    }

    Ok(())
}
