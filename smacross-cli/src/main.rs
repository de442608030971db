//! smacross CLI: offline replays of the crossover engine.
//!
//! Commands:
//! - `replay`: drive the engine over CSV or synthetic bars, printing signals as JSON lines
//! - `check-config`: validate a replay config and print the resolved parameters

mod bars;
mod config;
mod logging;
mod replay;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use smacross_core::data::InMemoryHistory;
use smacross_core::domain::Resolution;
use smacross_core::EngineConfig;
use std::path::{Path, PathBuf};

use crate::config::ReplayConfig;

#[derive(Parser)]
#[command(
    name = "smacross",
    about = "smacross: moving-average crossover signals over replayed bars"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay bar history through the engine and print each signal.
    Replay {
        /// Path to a TOML replay config ([engine] and [universe] tables).
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV file with `symbol,timestamp,close` columns.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Generate seeded random-walk bars instead of reading a file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for synthetic bars.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Bars per symbol for synthetic data.
        #[arg(long, default_value_t = 500)]
        bars: usize,

        /// Universe when no config file is given (e.g., SPY QQQ).
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,
    },
    /// Validate a replay config file.
    CheckConfig {
        /// Path to the TOML config.
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Replay {
            config,
            data,
            synthetic,
            seed,
            bars,
            symbols,
        } => run_replay_cmd(config.as_deref(), data.as_deref(), synthetic, seed, bars, symbols),
        Commands::CheckConfig { config } => run_check_config(&config),
    }
}

fn resolve_config(path: Option<&Path>, symbols: Vec<String>) -> Result<ReplayConfig> {
    match (path, symbols.is_empty()) {
        (Some(_), false) => bail!("--config and --symbols are mutually exclusive"),
        (Some(path), true) => ReplayConfig::from_file(path),
        (None, false) => {
            let allow_plots = symbols.len() < config::PLOT_UNIVERSE_LIMIT;
            let engine = EngineConfig::default().with_plots(allow_plots);
            Ok(ReplayConfig::for_symbols(engine, symbols))
        }
        (None, true) => bail!("one of --config or --symbols is required"),
    }
}

fn run_replay_cmd(
    config_path: Option<&Path>,
    data: Option<&Path>,
    synthetic: bool,
    seed: u64,
    bar_count: usize,
    symbols: Vec<String>,
) -> Result<()> {
    let config = resolve_config(config_path, symbols)?;
    let resolution: Resolution = config.engine.resolution;

    let loaded = match (data, synthetic) {
        (Some(_), true) => bail!("--data and --synthetic are mutually exclusive"),
        (Some(path), false) => bars::load_csv(path)?,
        (None, true) => {
            tracing::warn!(seed, "using synthetic bars; signals are not from market data");
            bars::synthetic_bars(&config.symbols, bar_count, resolution, seed)
        }
        (None, false) => bail!("one of --data or --synthetic is required"),
    };

    let mut history = InMemoryHistory::from_bars(resolution, loaded);
    for symbol in &config.symbols {
        if !history.symbols().any(|s| s == symbol) {
            tracing::warn!(%symbol, "no bars for universe symbol");
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = replay::run_replay(&config, &mut history, &mut out)?;

    eprintln!(
        "Cycles: {}  Signals: {} (up {}, down {}, flat {})  Open positions: {}",
        summary.cycles,
        summary.signals,
        summary.up,
        summary.down,
        summary.flat,
        summary.open_positions
    );
    Ok(())
}

fn run_check_config(path: &Path) -> Result<()> {
    let config = ReplayConfig::from_file(path)?;
    let engine = &config.engine;
    println!("Config: {}", path.display());
    println!("  short_period: {}", engine.short_period);
    println!("  long_period:  {}", engine.long_period);
    println!("  resolution:   {}", engine.resolution);
    println!("  allow_plots:  {}", engine.allow_plots);
    println!("  warm-up bars: {}", engine.warmup_bars());
    println!("  signal expiry: {:?}", engine.resolution.signal_expiry());
    println!("  universe ({}): {}", config.symbols.len(), config.symbols.join(", "));
    Ok(())
}
