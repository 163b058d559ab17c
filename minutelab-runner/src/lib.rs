//! MinuteLab Runner — backtest orchestration on top of `minutelab-core`.
//!
//! This crate provides:
//! - Serializable TOML backtest configuration with validation and a
//!   deterministic run id
//! - CSV candle loading with date filtering and precondition validation
//! - The closed-trade report aggregator
//! - The high-level `run_backtest` entry point used by the CLI

pub mod config;
pub mod data_loader;
pub mod report;
pub mod runner;

pub use config::{BacktestConfig, ConfigError};
pub use data_loader::{load_candles, LoadError};
pub use report::{TradeReport, YearBreakdown};
pub use runner::{run_backtest, run_backtest_from_csv, BacktestOutcome, RunError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_is_send_sync() {
        assert_send::<BacktestConfig>();
        assert_sync::<BacktestConfig>();
    }

    #[test]
    fn report_is_send_sync() {
        assert_send::<TradeReport>();
        assert_sync::<TradeReport>();
    }

    #[test]
    fn outcome_is_send_sync() {
        assert_send::<BacktestOutcome>();
        assert_sync::<BacktestOutcome>();
    }
}
