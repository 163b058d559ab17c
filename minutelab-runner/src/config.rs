//! Serializable backtest configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a single backtest run.
///
/// Captures every parameter needed to reproduce a run. Defaults mirror the
/// reference strategy parameters: 0.1% per-side fee, at most 6 concurrent
/// positions, 3% profit target, 90-day forced exit, 650-minute SMA.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacktestConfig {
    /// Starting cash balance.
    pub initial_balance: f64,

    /// Fraction of the initial balance invested per trade. The resulting
    /// invest amount is fixed at configuration time, not re-derived per
    /// trade.
    pub invest_fraction: f64,

    /// Per-side fee rate (applied at entry and again at exit).
    pub fee_rate: f64,

    /// Cap on concurrently open positions.
    pub max_open_positions: usize,

    /// Minimum profit fraction baked into the target exit price.
    pub target_profit: f64,

    /// Forced-exit holding duration in minutes.
    pub max_hold_minutes: i64,

    /// Rolling SMA window length, in records.
    pub sma_period: usize,

    /// Sampling interval of the input series, in minutes. Must divide 1440.
    pub interval_minutes: u32,

    /// Inclusive lower bound on input dates, if any.
    pub start_date: Option<NaiveDate>,

    /// Inclusive upper bound on input dates, if any.
    pub end_date: Option<NaiveDate>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_balance: 100.0,
            invest_fraction: 0.5,
            fee_rate: 0.001,
            max_open_positions: 6,
            target_profit: 0.03,
            max_hold_minutes: 60 * 24 * 90,
            sma_period: 650,
            interval_minutes: 1,
            start_date: None,
            end_date: None,
        }
    }
}

impl BacktestConfig {
    /// Parse a config from a TOML string and validate it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file and validate it.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let toml_str = std::fs::read_to_string(path)?;
        Self::from_toml(&toml_str)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |message: String| Err(ConfigError::Invalid(message));
        if !(self.initial_balance > 0.0) {
            return fail(format!(
                "initial_balance must be positive, got {}",
                self.initial_balance
            ));
        }
        if !(self.invest_fraction > 0.0 && self.invest_fraction <= 1.0) {
            return fail(format!(
                "invest_fraction must be in (0, 1], got {}",
                self.invest_fraction
            ));
        }
        if !(self.fee_rate >= 0.0 && self.fee_rate < 1.0) {
            return fail(format!("fee_rate must be in [0, 1), got {}", self.fee_rate));
        }
        if self.max_open_positions == 0 {
            return fail("max_open_positions must be at least 1".into());
        }
        if !(self.target_profit >= 0.0) {
            return fail(format!(
                "target_profit must be non-negative, got {}",
                self.target_profit
            ));
        }
        if self.max_hold_minutes <= 0 {
            return fail(format!(
                "max_hold_minutes must be positive, got {}",
                self.max_hold_minutes
            ));
        }
        if self.sma_period == 0 {
            return fail("sma_period must be at least 1".into());
        }
        if self.interval_minutes == 0 || 1440 % self.interval_minutes != 0 {
            return fail(format!(
                "interval_minutes must divide 1440, got {}",
                self.interval_minutes
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return fail(format!("start_date {start} is after end_date {end}"));
            }
        }
        Ok(())
    }

    /// The fixed per-trade invest amount.
    pub fn invest_amount(&self) -> f64 {
        self.initial_balance * self.invest_fraction
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share a RunId, so result artifacts
    /// can be correlated across repeated runs.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("BacktestConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        hash.to_hex().to_string()
    }
}
