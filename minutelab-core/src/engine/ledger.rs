//! Position ledger — cash balance and the bounded set of open positions.
//!
//! The ledger is the single owner of the evolving simulation state. Opening
//! a position debits the full invest amount; closing credits the net sale
//! proceeds. Preconditions (cap not reached, balance sufficient, known
//! position id) are the caller's contract: the simulation loop checks them
//! before calling, so a violation here is a bug and fails fast via
//! `assert!` rather than corrupting the balance silently.

use crate::domain::{Candle, ClosedTrade, Position, PositionId};

#[derive(Debug, Clone)]
pub struct Ledger {
    balance: f64,
    max_open: usize,
    next_id: u64,
    open: Vec<Position>,
}

impl Ledger {
    pub fn new(initial_balance: f64, max_open: usize) -> Self {
        Self {
            balance: initial_balance,
            max_open,
            next_id: 0,
            open: Vec::with_capacity(max_open),
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn open_positions(&self) -> &[Position] {
        &self.open
    }

    /// True if the cap leaves room and the balance covers the invest amount.
    pub fn can_open(&self, invest_amount: f64) -> bool {
        self.open.len() < self.max_open && self.balance >= invest_amount
    }

    /// Open a position at `candle.close`, debiting `invest_amount`.
    ///
    /// Entry fee is `invest_amount * fee_rate`; the remainder buys
    /// `(invest_amount - fee) / close` units. The target exit price bakes in
    /// the minimum profit plus both sides of the round-trip fee.
    ///
    /// Panics if the cap is reached or the balance is insufficient; callers
    /// must check `can_open` first.
    pub fn open(
        &mut self,
        candle: &Candle,
        invest_amount: f64,
        fee_rate: f64,
        target_profit: f64,
    ) -> PositionId {
        assert!(
            self.open.len() < self.max_open,
            "ledger: open-position cap ({}) already reached",
            self.max_open
        );
        assert!(
            self.balance >= invest_amount,
            "ledger: balance {} cannot cover invest amount {}",
            self.balance,
            invest_amount
        );

        let entry_fee = invest_amount * fee_rate;
        let quantity = (invest_amount - entry_fee) / candle.close;
        let target_price = candle.close * (1.0 + target_profit + 2.0 * fee_rate);

        let id = PositionId(self.next_id);
        self.next_id += 1;
        self.balance -= invest_amount;
        self.open.push(Position {
            id,
            open_time: candle.timestamp,
            open_price: candle.close,
            quantity,
            entry_fee,
            target_price,
        });
        id
    }

    /// Close the position `id` at `candle.close`, crediting net proceeds.
    ///
    /// The OPEN → CLOSED transition is terminal: the position leaves the
    /// ledger and the returned `ClosedTrade` is immutable. Panics if `id` is
    /// not currently open (double close is a programming error).
    pub fn close(&mut self, id: PositionId, candle: &Candle, fee_rate: f64) -> ClosedTrade {
        let index = self
            .open
            .iter()
            .position(|p| p.id == id)
            .unwrap_or_else(|| panic!("ledger: position {id} is not open"));
        let position = self.open.swap_remove(index);

        let exit_price = candle.close;
        let exit_fee = exit_price * position.quantity * fee_rate;
        let net_proceeds = exit_price * position.quantity - exit_fee;
        let profit =
            net_proceeds - (position.open_price * position.quantity + position.entry_fee);
        self.balance += net_proceeds;

        ClosedTrade {
            id: position.id,
            open_time: position.open_time,
            open_price: position.open_price,
            quantity: position.quantity,
            entry_fee: position.entry_fee,
            target_price: position.target_price,
            exit_time: candle.timestamp,
            exit_price,
            exit_fee,
            profit,
        }
    }
}
