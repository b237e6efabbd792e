//! BandLab CLI — signal, levels, and trail commands.
//!
//! Commands:
//! - `signal` — evaluate the latest candle and print the signal as JSON
//! - `levels` — print the initial stop-loss and take-profit ladder
//! - `trail` — replay candle closes through the trailing stop, one JSON line per tick

mod logging;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use bandlab_core::data::load_candles_csv;
use bandlab_core::risk::{RiskManager, TrailingContext, TrailingState};
use bandlab_core::{
    build_snapshot, Aggressiveness, Candle, EngineConfig, Side, SignalGenerator, TracingObserver,
};

#[derive(Parser)]
#[command(
    name = "bandlab",
    about = "BandLab CLI — channel-breakout signal engine and position risk"
)]
struct Cli {
    /// Emit logs as JSON.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the latest candle and print the signal as JSON.
    Signal {
        /// Primary timeframe candles (CSV).
        #[arg(long)]
        candles: PathBuf,

        /// Optional confirmation timeframe candles (CSV).
        #[arg(long)]
        confirm: Option<PathBuf>,

        /// Engine config (TOML). Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured aggressiveness tier (1, 2 or 3).
        #[arg(long)]
        aggressiveness: Option<u8>,
    },
    /// Print the initial stop-loss and take-profit ladder for an entry.
    Levels {
        /// Candles ending at the entry candle (CSV).
        #[arg(long)]
        candles: PathBuf,

        /// Position side: long or short.
        #[arg(long)]
        side: Side,

        /// Entry price.
        #[arg(long)]
        entry: f64,

        /// Engine config (TOML).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Replay candle closes through the trailing-stop state machine.
    Trail {
        /// Candles to replay (CSV).
        #[arg(long)]
        candles: PathBuf,

        /// Position side: long or short.
        #[arg(long)]
        side: Side,

        /// Entry price.
        #[arg(long)]
        entry: f64,

        /// Initial stop-loss.
        #[arg(long)]
        stop: f64,

        /// Engine config (TOML).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.json);

    match cli.command {
        Commands::Signal {
            candles,
            confirm,
            config,
            aggressiveness,
        } => cmd_signal(&candles, confirm.as_deref(), config.as_deref(), aggressiveness),
        Commands::Levels {
            candles,
            side,
            entry,
            config,
        } => cmd_levels(&candles, side, entry, config.as_deref()),
        Commands::Trail {
            candles,
            side,
            entry,
            stop,
            config,
        } => cmd_trail(&candles, side, entry, stop, config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    load_candles_csv(path).with_context(|| format!("loading candles {}", path.display()))
}

fn cmd_signal(
    candles: &Path,
    confirm: Option<&Path>,
    config: Option<&Path>,
    aggressiveness: Option<u8>,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(level) = aggressiveness {
        config.aggressiveness = Aggressiveness::try_from(level).map_err(anyhow::Error::msg)?;
    }

    let primary = load_candles(candles)?;
    let confirmation = confirm.map(load_candles).transpose()?;

    let generator = SignalGenerator::new(config).with_observer(TracingObserver);
    let signal = generator.generate(&primary, confirmation.as_deref());

    println!("{}", serde_json::to_string_pretty(&signal)?);
    Ok(())
}

fn cmd_levels(candles: &Path, side: Side, entry: f64, config: Option<&Path>) -> Result<()> {
    if !(entry.is_finite() && entry > 0.0) {
        bail!("--entry must be a positive price, got {entry}");
    }
    let config = load_config(config)?;
    let candles = load_candles(candles)?;

    let Some(snapshot) = build_snapshot(&candles, &config.indicators) else {
        bail!(
            "cannot build an indicator snapshot from {} candles",
            candles.len()
        );
    };

    let levels = RiskManager::from_config(&config).levels(side, entry, &snapshot);
    println!("{}", serde_json::to_string_pretty(&levels)?);
    Ok(())
}

fn cmd_trail(
    candles: &Path,
    side: Side,
    entry: f64,
    stop: f64,
    config: Option<&Path>,
) -> Result<()> {
    if !(entry.is_finite() && stop.is_finite()) {
        bail!("--entry and --stop must be finite prices");
    }
    let wrong_side = match side {
        Side::Long => stop >= entry,
        Side::Short => stop <= entry,
    };
    if wrong_side {
        bail!("--stop {stop} is on the wrong side of a {side} entry at {entry}");
    }

    let config = load_config(config)?;
    let candles = load_candles(candles)?;
    let manager = RiskManager::from_config(&config);
    let ctx = TrailingContext {
        side,
        entry_price: entry,
        initial_stop: stop,
    };

    let mut state = TrailingState::default();
    let mut atr = f64::NAN;
    for (i, candle) in candles.iter().enumerate() {
        if let Some(snapshot) = build_snapshot(&candles[..=i], &config.indicators) {
            atr = snapshot.atr;
        }
        state = manager.update_trailing(&ctx, &state, candle.close, atr);

        let line = serde_json::json!({
            "time": candle.close_time,
            "price": candle.close,
            "atr": if atr.is_finite() { Some(atr) } else { None },
            "extreme_price": state.extreme_price,
            "trailing_stop": state.trailing_stop,
            "active": state.active,
        });
        println!("{line}");
    }

    tracing::info!(
        ticks = candles.len(),
        active = state.active,
        trailing_stop = ?state.trailing_stop,
        "trail replay finished"
    );
    Ok(())
}
