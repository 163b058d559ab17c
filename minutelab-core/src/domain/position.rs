//! Positions and closed trades.
//!
//! A `Position` is an open simulated trade awaiting an exit condition; it is
//! created only by the ledger and consumed exactly once, at close, to produce
//! an immutable `ClosedTrade`. There is no other state: OPEN → CLOSED is the
//! single allowed transition.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque position identifier, assigned by the ledger from a monotonically
/// increasing counter. Only used for external correlation in the archive;
/// it carries no simulation semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionId(pub u64);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An open position: entry fields plus the precomputed target exit price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub open_time: NaiveDateTime,
    pub open_price: f64,
    pub quantity: f64,
    pub entry_fee: f64,
    /// Exit price at which the minimum profit is realized after round-trip
    /// fees: open_price * (1 + target_profit + 2 * fee_rate).
    pub target_price: f64,
}

/// A completed round-trip trade: entry → exit, with realized profit.
///
/// Immutable once archived. The report aggregator consumes these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub id: PositionId,
    pub open_time: NaiveDateTime,
    pub open_price: f64,
    pub quantity: f64,
    pub entry_fee: f64,
    pub target_price: f64,
    pub exit_time: NaiveDateTime,
    pub exit_price: f64,
    pub exit_fee: f64,
    pub profit: f64,
}

impl ClosedTrade {
    /// Holding time in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.exit_time - self.open_time).num_minutes()
    }

    pub fn is_winner(&self) -> bool {
        self.profit > 0.0
    }

    /// Combined entry + exit transaction cost of the trade.
    pub fn round_trip_fees(&self) -> f64 {
        self.entry_fee + self.exit_fee
    }
}
