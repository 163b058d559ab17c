//! Strategy rules — pure entry/exit predicates.
//!
//! Both predicates are deterministic functions of their arguments only: no
//! hidden state, no mutation. The simulation loop evaluates the entry
//! predicate once per record and the exit predicate for every open position
//! on every record.

use crate::domain::{Candle, Position};

/// Entry rule: the close has crossed above the trailing SMA.
///
/// Records without a defined SMA never signal entry; the segmenter
/// guarantees admitted days are fully enriched, so `None` only occurs on
/// raw candles handed in by tests or callers bypassing the segmenter.
pub fn entry_signal(candle: &Candle) -> bool {
    match candle.sma {
        Some(sma) => candle.close > sma,
        None => false,
    }
}

/// Exit rule: profit target reached, or the position has been held for at
/// least `max_hold_minutes`.
///
/// The target check is evaluated first; when both conditions hold on the
/// same record the result is the same close either way.
pub fn exit_signal(candle: &Candle, position: &Position, max_hold_minutes: i64) -> bool {
    if candle.close >= position.target_price {
        return true;
    }
    (candle.timestamp - position.open_time).num_minutes() >= max_hold_minutes
}
