//! MinuteLab CLI — run minute-bar SMA backtests from the command line.
//!
//! Commands:
//! - `run` — execute a backtest over a CSV candle file, print the report,
//!   and optionally write the full outcome as JSON

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use minutelab_runner::{run_backtest_from_csv, BacktestConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "minutelab",
    about = "MinuteLab CLI — minute-resolution SMA backtesting engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest over a CSV candle file.
    Run {
        /// CSV file with timestamp,open,high,low,close,volume rows.
        #[arg(long)]
        data: PathBuf,

        /// Path to a TOML config file. Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Start date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: Option<String>,

        /// Starting cash balance.
        #[arg(long)]
        initial_balance: Option<f64>,

        /// Fraction of the initial balance invested per trade.
        #[arg(long)]
        invest_fraction: Option<f64>,

        /// Per-side fee rate (e.g. 0.001 for 0.1%).
        #[arg(long)]
        fee_rate: Option<f64>,

        /// Maximum concurrently open positions.
        #[arg(long)]
        max_open: Option<usize>,

        /// Minimum profit fraction baked into the target price.
        #[arg(long)]
        target_profit: Option<f64>,

        /// Forced-exit holding duration in minutes.
        #[arg(long)]
        max_hold: Option<i64>,

        /// SMA window length in records.
        #[arg(long)]
        sma_period: Option<usize>,

        /// Sampling interval of the input in minutes.
        #[arg(long)]
        interval: Option<u32>,

        /// Write the full outcome (report + trades) as pretty JSON.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            data,
            config,
            start,
            end,
            initial_balance,
            invest_fraction,
            fee_rate,
            max_open,
            target_profit,
            max_hold,
            sma_period,
            interval,
            output,
        } => {
            let mut cfg = match config {
                Some(path) => BacktestConfig::from_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => BacktestConfig::default(),
            };

            if let Some(date) = start {
                cfg.start_date = Some(parse_date(&date)?);
            }
            if let Some(date) = end {
                cfg.end_date = Some(parse_date(&date)?);
            }
            if let Some(value) = initial_balance {
                cfg.initial_balance = value;
            }
            if let Some(value) = invest_fraction {
                cfg.invest_fraction = value;
            }
            if let Some(value) = fee_rate {
                cfg.fee_rate = value;
            }
            if let Some(value) = max_open {
                cfg.max_open_positions = value;
            }
            if let Some(value) = target_profit {
                cfg.target_profit = value;
            }
            if let Some(value) = max_hold {
                cfg.max_hold_minutes = value;
            }
            if let Some(value) = sma_period {
                cfg.sma_period = value;
            }
            if let Some(value) = interval {
                cfg.interval_minutes = value;
            }

            let outcome = run_backtest_from_csv(&cfg, &data)
                .with_context(|| format!("backtest over {}", data.display()))?;

            println!("{}", outcome.report);
            println!(
                "segments: {} admitted, {} dropped; forced liquidations: {}",
                outcome.segment_count, outcome.dropped_days, outcome.forced_liquidations
            );
            println!("run id: {}", outcome.run_id);

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&outcome)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("wrote {}", path.display());
            }
            Ok(())
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{value}', expected YYYY-MM-DD"))
}
