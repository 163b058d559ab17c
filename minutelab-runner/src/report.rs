//! Report aggregation — pure reduction over the closed-trade archive.
//!
//! Every figure is derived from the archive and the run's balances; nothing
//! here touches the engine. Empty archives and empty winner/loser subsets
//! reduce to zeros, never to a division by zero.

use chrono::Datelike;
use minutelab_core::domain::ClosedTrade;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-year slice of the archive, keyed by the year the trade was opened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearBreakdown {
    pub year: i32,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub avg_duration_minutes: f64,
}

/// Aggregate statistics for one completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeReport {
    pub initial_balance: f64,
    pub final_balance: f64,

    pub total_entry_fees: f64,
    pub total_exit_fees: f64,
    pub total_fees: f64,
    pub total_profit: f64,

    pub trade_count: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Winning trades as a percentage of all trades; 0 for an empty archive.
    pub win_rate: f64,
    pub avg_profit_per_trade: f64,

    pub avg_trade_duration_minutes: f64,
    pub avg_winning_duration_minutes: f64,
    pub avg_losing_duration_minutes: f64,

    /// Trade count divided by the number of distinct exit years.
    pub avg_trades_per_year: f64,
    /// Ordered by year; grouped by the year each trade was opened.
    pub per_year: Vec<YearBreakdown>,
}

impl TradeReport {
    pub fn compute(trades: &[ClosedTrade], initial_balance: f64, final_balance: f64) -> Self {
        let total_entry_fees: f64 = trades.iter().map(|t| t.entry_fee).sum();
        let total_exit_fees: f64 = trades.iter().map(|t| t.exit_fee).sum();
        let total_profit: f64 = trades.iter().map(|t| t.profit).sum();

        let trade_count = trades.len();
        let winning_trades = trades.iter().filter(|t| t.is_winner()).count();
        let losing_trades = trade_count - winning_trades;

        let win_rate = if trade_count > 0 {
            winning_trades as f64 / trade_count as f64 * 100.0
        } else {
            0.0
        };
        let avg_profit_per_trade = if trade_count > 0 {
            total_profit / trade_count as f64
        } else {
            0.0
        };

        let avg_trade_duration_minutes = mean_duration(trades.iter());
        let avg_winning_duration_minutes = mean_duration(trades.iter().filter(|t| t.is_winner()));
        let avg_losing_duration_minutes = mean_duration(trades.iter().filter(|t| !t.is_winner()));

        let exit_years: std::collections::BTreeSet<i32> =
            trades.iter().map(|t| t.exit_time.year()).collect();
        let avg_trades_per_year = if exit_years.is_empty() {
            0.0
        } else {
            trade_count as f64 / exit_years.len() as f64
        };

        let mut by_open_year: BTreeMap<i32, Vec<&ClosedTrade>> = BTreeMap::new();
        for trade in trades {
            by_open_year
                .entry(trade.open_time.year())
                .or_default()
                .push(trade);
        }
        let per_year = by_open_year
            .into_iter()
            .map(|(year, group)| {
                let wins = group.iter().filter(|t| t.is_winner()).count();
                YearBreakdown {
                    year,
                    trades: group.len(),
                    wins,
                    losses: group.len() - wins,
                    avg_duration_minutes: mean_duration(group.iter().copied()),
                }
            })
            .collect();

        Self {
            initial_balance,
            final_balance,
            total_entry_fees,
            total_exit_fees,
            total_fees: total_entry_fees + total_exit_fees,
            total_profit,
            trade_count,
            winning_trades,
            losing_trades,
            win_rate,
            avg_profit_per_trade,
            avg_trade_duration_minutes,
            avg_winning_duration_minutes,
            avg_losing_duration_minutes,
            avg_trades_per_year,
            per_year,
        }
    }
}

fn mean_duration<'a>(trades: impl Iterator<Item = &'a ClosedTrade>) -> f64 {
    let durations: Vec<f64> = trades.map(|t| t.duration_minutes() as f64).collect();
    if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<f64>() / durations.len() as f64
    }
}

/// Render a minute count as `Xd Yh Zm`.
pub fn format_duration_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0) as i64;
    let days = total / (24 * 60);
    let hours = (total % (24 * 60)) / 60;
    let mins = total % 60;
    format!("{days}d {hours}h {mins}m")
}

impl fmt::Display for TradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Backtest report")?;
        writeln!(f, "  initial balance : {:.2}", self.initial_balance)?;
        writeln!(f, "  final balance   : {:.2}", self.final_balance)?;
        writeln!(f, "  total profit    : {:.2}", self.total_profit)?;
        writeln!(
            f,
            "  total fees      : {:.4} (entry {:.4}, exit {:.4})",
            self.total_fees, self.total_entry_fees, self.total_exit_fees
        )?;
        writeln!(
            f,
            "  trades          : {} ({} winners, {} losers, win rate {:.2}%)",
            self.trade_count, self.winning_trades, self.losing_trades, self.win_rate
        )?;
        writeln!(
            f,
            "  avg profit/trade: {:.4}",
            self.avg_profit_per_trade
        )?;
        writeln!(
            f,
            "  avg duration    : {} ({:.2} min)",
            format_duration_minutes(self.avg_trade_duration_minutes),
            self.avg_trade_duration_minutes
        )?;
        writeln!(
            f,
            "  avg win/loss dur: {} / {}",
            format_duration_minutes(self.avg_winning_duration_minutes),
            format_duration_minutes(self.avg_losing_duration_minutes)
        )?;
        writeln!(f, "  trades per year : {:.2}", self.avg_trades_per_year)?;
        for year in &self.per_year {
            writeln!(
                f,
                "    {}: {} trades ({} wins, {} losses), avg {}",
                year.year,
                year.trades,
                year.wins,
                year.losses,
                format_duration_minutes(year.avg_duration_minutes)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use minutelab_core::domain::PositionId;

    fn trade(
        id: u64,
        open: (i32, u32, u32),
        minutes_held: i64,
        profit: f64,
        entry_fee: f64,
        exit_fee: f64,
    ) -> ClosedTrade {
        let open_time = NaiveDate::from_ymd_opt(open.0, open.1, open.2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        ClosedTrade {
            id: PositionId(id),
            open_time,
            open_price: 100.0,
            quantity: 0.5,
            entry_fee,
            target_price: 103.2,
            exit_time: open_time + Duration::minutes(minutes_held),
            exit_price: 100.0 + profit,
            exit_fee,
            profit,
        }
    }

    #[test]
    fn empty_archive_reports_zeros() {
        let report = TradeReport::compute(&[], 100.0, 100.0);
        assert_eq!(report.trade_count, 0);
        assert_eq!(report.win_rate, 0.0);
        assert_eq!(report.total_fees, 0.0);
        assert_eq!(report.total_profit, 0.0);
        assert_eq!(report.avg_trades_per_year, 0.0);
        assert_eq!(report.avg_trade_duration_minutes, 0.0);
        assert!(report.per_year.is_empty());
    }

    #[test]
    fn all_winners_has_zero_losing_duration() {
        let trades = [
            trade(0, (2020, 1, 10), 60, 1.5, 0.05, 0.05),
            trade(1, (2020, 2, 10), 120, 2.0, 0.05, 0.05),
        ];
        let report = TradeReport::compute(&trades, 100.0, 103.5);
        assert_eq!(report.win_rate, 100.0);
        assert_eq!(report.avg_losing_duration_minutes, 0.0);
        assert!((report.avg_winning_duration_minutes - 90.0).abs() < 1e-10);
    }

    #[test]
    fn aggregates_fees_profit_and_win_rate() {
        let trades = [
            trade(0, (2020, 1, 10), 60, 1.5, 0.05, 0.06),
            trade(1, (2020, 3, 10), 30, -0.5, 0.05, 0.04),
            trade(2, (2021, 1, 10), 90, 0.0, 0.05, 0.05),
            trade(3, (2021, 6, 10), 240, 2.5, 0.05, 0.07),
        ];
        let report = TradeReport::compute(&trades, 100.0, 103.5);

        assert_eq!(report.trade_count, 4);
        assert_eq!(report.winning_trades, 2); // profit 0.0 is not a win
        assert_eq!(report.losing_trades, 2);
        assert!((report.win_rate - 50.0).abs() < 1e-10);
        assert!((report.total_entry_fees - 0.20).abs() < 1e-12);
        assert!((report.total_exit_fees - 0.22).abs() < 1e-12);
        assert!((report.total_profit - 3.5).abs() < 1e-12);
        assert!((report.avg_profit_per_trade - 0.875).abs() < 1e-12);
        // Two distinct exit years.
        assert!((report.avg_trades_per_year - 2.0).abs() < 1e-12);
    }

    #[test]
    fn per_year_breakdown_is_ordered_by_open_year() {
        let trades = [
            trade(0, (2021, 1, 10), 60, 1.0, 0.05, 0.05),
            trade(1, (2020, 1, 10), 30, -1.0, 0.05, 0.05),
            trade(2, (2020, 7, 10), 90, 2.0, 0.05, 0.05),
        ];
        let report = TradeReport::compute(&trades, 100.0, 102.0);
        let years: Vec<i32> = report.per_year.iter().map(|y| y.year).collect();
        assert_eq!(years, [2020, 2021]);
        assert_eq!(report.per_year[0].trades, 2);
        assert_eq!(report.per_year[0].wins, 1);
        assert_eq!(report.per_year[0].losses, 1);
        assert!((report.per_year[0].avg_duration_minutes - 60.0).abs() < 1e-10);
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration_minutes(0.0), "0d 0h 0m");
        assert_eq!(format_duration_minutes(61.0), "0d 1h 1m");
        assert_eq!(format_duration_minutes(1501.0), "1d 1h 1m");
        assert_eq!(format_duration_minutes(129_600.0), "90d 0h 0m");
    }

    #[test]
    fn report_serialization_roundtrip() {
        let trades = [trade(0, (2020, 1, 10), 60, 1.5, 0.05, 0.05)];
        let report = TradeReport::compute(&trades, 100.0, 101.5);
        let json = serde_json::to_string(&report).unwrap();
        let deser: TradeReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report.trade_count, deser.trade_count);
        assert_eq!(report.per_year, deser.per_year);
    }
}
