//! Simulation loop — chronological record walk over the segmented series.
//!
//! Per record: one entry check, then an exit check for every open position.
//! Exits are decided on a snapshot of the open set and applied after the
//! scan, so the ledger is never mutated while being iterated. After the last
//! record, any still-open positions are force-closed at that record's close
//! price; the archive is therefore always the complete record of opens.

use crate::domain::{Candle, ClosedTrade, PositionId};
use crate::engine::Ledger;
use crate::segment::SegmentedSeries;
use crate::strategy::{entry_signal, exit_signal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters for one simulation run. The invest amount is fixed for the
/// whole run; it is never re-derived from the current balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineParams {
    pub initial_balance: f64,
    pub invest_amount: f64,
    pub fee_rate: f64,
    pub max_open: usize,
    pub target_profit: f64,
    pub max_hold_minutes: i64,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no usable data: every day segment was empty or dropped")]
    NoUsableData,
}

/// Outcome of a run: the complete closed-trade archive in close order,
/// the final cash balance, and how many positions the terminal sweep closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub trades: Vec<ClosedTrade>,
    pub final_balance: f64,
    pub forced_liquidations: usize,
}

/// Run the simulation over admitted day segments in chronological order.
///
/// Deterministic: identical `series` and `params` produce an identical
/// archive and final balance.
pub fn run_simulation(
    series: &SegmentedSeries,
    params: &EngineParams,
) -> Result<SimulationResult, EngineError> {
    let mut ledger = Ledger::new(params.initial_balance, params.max_open);
    let mut trades: Vec<ClosedTrade> = Vec::new();
    let mut last_candle: Option<&Candle> = None;

    for segment in &series.segments {
        for candle in &segment.candles {
            if ledger.can_open(params.invest_amount) && entry_signal(candle) {
                ledger.open(
                    candle,
                    params.invest_amount,
                    params.fee_rate,
                    params.target_profit,
                );
            }

            // Two-phase exit: snapshot the ids due to close, then close them.
            let due: Vec<PositionId> = ledger
                .open_positions()
                .iter()
                .filter(|p| exit_signal(candle, p, params.max_hold_minutes))
                .map(|p| p.id)
                .collect();
            for id in due {
                trades.push(ledger.close(id, candle, params.fee_rate));
            }

            last_candle = Some(candle);
        }
    }

    let last_candle = last_candle.ok_or(EngineError::NoUsableData)?;

    // Terminal sweep: force-close whatever is still open at the final price,
    // regardless of the exit predicate.
    let remaining: Vec<PositionId> = ledger.open_positions().iter().map(|p| p.id).collect();
    let forced_liquidations = remaining.len();
    for id in remaining {
        trades.push(ledger.close(id, last_candle, params.fee_rate));
    }

    Ok(SimulationResult {
        trades,
        final_balance: ledger.balance(),
        forced_liquidations,
    })
}
