//! LVR vs Gas - Monte Carlo runner
//!
//! Run with: cargo run --release -- run
//!
//! Subcommands:
//! - `run`: one low/high gas comparison
//! - `sweep`: repeat the comparison across fee, volatility or depth values
//! - `init-config`: write the reference scenario to a TOML file

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lvr_gas::config::{ConfigFile, SimulationConfig, SweepConfig, SweepParam};
use lvr_gas::gas::{GasSchedule, DEFAULT_SWAP_GAS_UNITS};
use lvr_gas::report::{print_sweep_table, Summary};
use lvr_gas::simulator::{run_simulations_with_progress, run_sweep_with_progress};

#[derive(Parser)]
#[command(name = "lvr-gas", version, about = "How gas costs split LVR between LPs and arbitrageurs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare the low and high gas scenarios once
    Run {
        #[command(flatten)]
        params: ParamArgs,

        /// Print the summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Repeat the comparison while one parameter varies
    Sweep {
        #[command(flatten)]
        params: ParamArgs,

        /// Parameter to vary (defaults to the config file's [sweep] section)
        #[arg(long, value_enum)]
        param: Option<SweepParam>,

        /// Comma separated values for the swept parameter
        #[arg(long, value_delimiter = ',')]
        values: Vec<f64>,

        #[arg(long)]
        json: bool,
    },

    /// Write the reference scenario as a TOML config
    InitConfig { path: PathBuf },
}

/// Overrides layered on top of the reference scenario and the config file
#[derive(Args)]
struct ParamArgs {
    /// TOML config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[arg(long)]
    fee: Option<f64>,

    #[arg(long)]
    initial_price: Option<f64>,

    #[arg(long)]
    daily_std: Option<f64>,

    #[arg(long)]
    blocks_per_day: Option<u32>,

    #[arg(long)]
    days: Option<u32>,

    #[arg(long)]
    paths: Option<usize>,

    /// Low scenario gas cost in quote units
    #[arg(long, conflicts_with_all = ["low_gwei", "high_gwei"])]
    low_gas: Option<f64>,

    /// High scenario gas cost in quote units
    #[arg(long, conflicts_with_all = ["low_gwei", "high_gwei"])]
    high_gas: Option<f64>,

    /// Gas units per arbitrage, used with --low-gwei/--high-gwei
    #[arg(long)]
    gas_units: Option<u64>,

    /// Low scenario gas price in gwei, converted at the initial price
    #[arg(long, requires = "high_gwei")]
    low_gwei: Option<f64>,

    /// High scenario gas price in gwei, converted at the initial price
    #[arg(long, requires = "low_gwei")]
    high_gwei: Option<f64>,

    #[arg(long)]
    liquidity_per_bp: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,
}

impl ParamArgs {
    fn resolve(&self) -> Result<(SimulationConfig, Option<SweepConfig>)> {
        let (mut config, sweep) = match &self.config {
            Some(path) => {
                let file = ConfigFile::from_file(path)?;
                info!("Loaded config from {}", path.display());
                (file.simulation, file.sweep)
            }
            None => (SimulationConfig::reference(), None),
        };

        if let Some(v) = self.fee {
            config.fee = v;
        }
        if let Some(v) = self.initial_price {
            config.initial_price = v;
        }
        if let Some(v) = self.daily_std {
            config.daily_std = v;
        }
        if let Some(v) = self.blocks_per_day {
            config.blocks_per_day = v;
        }
        if let Some(v) = self.days {
            config.days = v;
        }
        if let Some(v) = self.paths {
            config.paths = v;
        }
        if let Some(v) = self.low_gas {
            config.low_gas_cost = v;
        }
        if let Some(v) = self.high_gas {
            config.high_gas_cost = v;
        }
        if let Some(v) = self.liquidity_per_bp {
            config.liquidity_per_bp = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }

        if let (Some(low), Some(high)) = (self.low_gwei, self.high_gwei) {
            let schedule =
                GasSchedule::new(self.gas_units.unwrap_or(DEFAULT_SWAP_GAS_UNITS), low, high)?;
            let (low_cost, high_cost) = schedule.quote_costs(config.initial_price);
            info!(
                "Gas {} units at {}/{} gwei = {:.4}/{:.4} quote",
                schedule.gas_units, low, high, low_cost, high_cost
            );
            config.low_gas_cost = low_cost;
            config.high_gas_cost = high_cost;
        } else if self.gas_units.is_some() {
            warn!("--gas-units has no effect without --low-gwei/--high-gwei");
        }

        config.validate()?;
        Ok((config, sweep))
    }
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" LVR vs GAS - Who pays when arbitrage gets more expensive?").cyan().bold()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Monte Carlo [{bar:40}] {pos}/{len} ({eta})")?,
    );
    Ok(pb)
}

fn run(params: &ParamArgs, json: bool) -> Result<()> {
    let (config, _) = params.resolve()?;

    if !json {
        print_banner();
        config.print_summary();
        println!();
    }

    let start = Instant::now();
    let pb = if json {
        ProgressBar::hidden()
    } else {
        progress_bar(config.paths as u64)?
    };
    let results = run_simulations_with_progress(&config, &pb)?;
    pb.finish_and_clear();

    let summary = Summary::from_matrix(&results, &config);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print();
        println!(
            "{} Done in {:?}",
            style("✓").green(),
            start.elapsed()
        );
    }

    Ok(())
}

fn sweep(
    params: &ParamArgs,
    param: Option<SweepParam>,
    values: &[f64],
    json: bool,
) -> Result<()> {
    let (config, file_sweep) = params.resolve()?;

    let (param, values) = match (param, values.is_empty(), file_sweep) {
        (Some(param), false, _) => (param, values.to_vec()),
        (Some(param), true, Some(s)) if s.param == param => (param, s.values),
        (None, false, Some(s)) => (s.param, values.to_vec()),
        (None, true, Some(s)) => (s.param, s.values),
        _ => {
            return Err(eyre!(
                "sweep needs --param and --values, or a [sweep] section in the config file"
            ))
        }
    };

    info!(
        "Sweeping {} over {} values (base {})",
        param,
        values.len(),
        param.current(&config)
    );

    if !json {
        print_banner();
        config.print_summary();
    }

    let points = run_sweep_with_progress(&config, param, &values, !json)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else {
        print_sweep_table(param, &points);
    }

    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    let file = ConfigFile {
        simulation: SimulationConfig::reference(),
        sweep: Some(SweepConfig {
            param: SweepParam::Fee,
            values: vec![0.0001, 0.0005, 0.003, 0.01],
        }),
    };
    file.save_to_file(path)?;
    println!(
        "{} Wrote reference config to {}",
        style("✓").green(),
        path.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lvr_gas=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Run { params, json } => run(params, *json),
        Command::Sweep {
            params,
            param,
            values,
            json,
        } => sweep(params, *param, values, *json),
        Command::InitConfig { path } => init_config(path),
    }
}
