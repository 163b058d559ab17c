//! MinuteLab Core — the backtest simulation engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (candles, positions, closed trades)
//! - Rolling SMA indicator with a no-lookahead contract
//! - Calendar-day segmenter with carry-over indicator continuity
//! - Pure entry/exit strategy rules
//! - Position ledger with balance and open-position-cap invariants
//! - Chronological simulation loop with terminal forced liquidation
//!
//! The core is single-threaded and synchronous: records are processed
//! strictly in chronological order because the ledger and cash balance are
//! shared mutable state with cross-record dependencies. Given identical
//! input and parameters, a run is bit-for-bit reproducible.

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod segment;
pub mod strategy;
