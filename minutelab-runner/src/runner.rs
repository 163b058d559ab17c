//! Backtest runner — wires together loader, segmenter, engine, and report.
//!
//! Two entry points:
//! - `run_backtest()`: takes pre-loaded candles. Used by tests and embedders.
//! - `run_backtest_from_csv()`: loads candles from a CSV file first. Used by
//!   the CLI.

use minutelab_core::domain::{Candle, ClosedTrade};
use minutelab_core::engine::{run_simulation, EngineError, EngineParams};
use minutelab_core::segment::segment_days;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{load_candles, LoadError};
use crate::report::TradeReport;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestOutcome {
    pub run_id: String,
    pub config: BacktestConfig,
    pub report: TradeReport,
    pub trades: Vec<ClosedTrade>,
    pub final_balance: f64,
    pub segment_count: usize,
    pub dropped_days: usize,
    pub forced_liquidations: usize,
}

/// Run a backtest over pre-loaded, date-filtered candles.
pub fn run_backtest(
    config: &BacktestConfig,
    candles: Vec<Candle>,
) -> Result<BacktestOutcome, RunError> {
    config.validate()?;

    let series = segment_days(candles, config.interval_minutes, config.sma_period);
    if !series.dropped.is_empty() {
        info!(
            dropped_days = series.dropped.len(),
            admitted_days = series.segments.len(),
            "segmenter dropped incomplete days"
        );
    }

    let params = EngineParams {
        initial_balance: config.initial_balance,
        invest_amount: config.invest_amount(),
        fee_rate: config.fee_rate,
        max_open: config.max_open_positions,
        target_profit: config.target_profit,
        max_hold_minutes: config.max_hold_minutes,
    };
    let result = run_simulation(&series, &params)?;

    let report = TradeReport::compute(&result.trades, config.initial_balance, result.final_balance);
    info!(
        trades = report.trade_count,
        final_balance = result.final_balance,
        forced_liquidations = result.forced_liquidations,
        "backtest complete"
    );

    Ok(BacktestOutcome {
        run_id: config.run_id(),
        config: config.clone(),
        report,
        trades: result.trades,
        final_balance: result.final_balance,
        segment_count: series.segments.len(),
        dropped_days: series.dropped.len(),
        forced_liquidations: result.forced_liquidations,
    })
}

/// Load candles from a CSV file, then run the backtest.
pub fn run_backtest_from_csv(
    config: &BacktestConfig,
    path: &Path,
) -> Result<BacktestOutcome, RunError> {
    config.validate()?;
    let candles = load_candles(path, config)?;
    info!(records = candles.len(), path = %path.display(), "loaded candle series");
    run_backtest(config, candles)
}
