//! Calendar-day segmentation with carry-over indicator continuity.
//!
//! The continuous minute series is partitioned into day buckets. The SMA for
//! each day is computed over `carry-over ⧺ day`, where the carry-over buffer
//! holds the trailing `sma_period` records seen so far, so the indicator
//! stays continuous across day boundaries and is never recomputed from a
//! cold start mid-series.
//!
//! A day is admitted only if its record count equals the expected full-day
//! count for the sampling interval AND every record receives a defined SMA.
//! Days failing either test are dropped whole; the carry-over buffer is
//! still refreshed from their tail so later valid days keep continuity.

use crate::domain::Candle;
use crate::indicators::Sma;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of enriched candles, in chronological order.
///
/// Owned exclusively until consumed by the simulation loop; immutable
/// history afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySegment {
    pub date: NaiveDate,
    pub candles: Vec<Candle>,
}

/// Ordered output of the segmenter: admitted day segments plus the dates
/// that were dropped by the completeness predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentedSeries {
    pub segments: Vec<DaySegment>,
    pub dropped: Vec<NaiveDate>,
}

impl SegmentedSeries {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.segments.iter().map(|s| s.candles.len()).sum()
    }
}

/// Expected number of records in a complete day at the given sampling
/// interval (1440 for one-minute bars).
pub fn expected_day_records(interval_minutes: u32) -> usize {
    assert!(
        interval_minutes >= 1 && 1440 % interval_minutes == 0,
        "sampling interval must divide a day"
    );
    (1440 / interval_minutes) as usize
}

/// Partition `candles` (assumed sorted by timestamp) into enriched, filtered
/// day segments.
///
/// Stateful over the carry-over buffer: the output is produced in a single
/// forward pass and is not restartable.
pub fn segment_days(
    candles: Vec<Candle>,
    interval_minutes: u32,
    sma_period: usize,
) -> SegmentedSeries {
    let expected = expected_day_records(interval_minutes);
    let sma = Sma::new(sma_period);

    let mut segments = Vec::new();
    let mut dropped = Vec::new();
    // Trailing raw candles carried across day boundaries for SMA continuity.
    let mut carry: Vec<Candle> = Vec::new();

    for (date, day) in group_by_day(candles) {
        if day.len() != expected {
            dropped.push(date);
            refresh_carry(&mut carry, &day, sma_period);
            continue;
        }

        let closes: Vec<f64> = carry
            .iter()
            .chain(day.iter())
            .map(|c| c.close)
            .collect();
        let values = sma.compute(&closes);
        let day_values = &values[carry.len()..];

        if day_values.iter().any(|v| v.is_nan()) {
            dropped.push(date);
            refresh_carry(&mut carry, &day, sma_period);
            continue;
        }

        refresh_carry(&mut carry, &day, sma_period);

        let enriched = day
            .into_iter()
            .zip(day_values)
            .map(|(mut candle, &value)| {
                candle.sma = Some(value);
                candle
            })
            .collect();
        segments.push(DaySegment {
            date,
            candles: enriched,
        });
    }

    SegmentedSeries { segments, dropped }
}

/// Group consecutive candles sharing a calendar date, preserving input
/// order. An explicit ordered sequence, never a map keyed by date.
fn group_by_day(candles: Vec<Candle>) -> Vec<(NaiveDate, Vec<Candle>)> {
    let mut days: Vec<(NaiveDate, Vec<Candle>)> = Vec::new();
    for candle in candles {
        let date = candle.timestamp.date();
        match days.last_mut() {
            Some((d, bucket)) if *d == date => bucket.push(candle),
            _ => days.push((date, vec![candle])),
        }
    }
    days
}

/// Keep the trailing `sma_period` records of `carry ⧺ day`.
///
/// Refreshed after every day, dropped or admitted, so a short day extends
/// the context instead of truncating it.
fn refresh_carry(carry: &mut Vec<Candle>, day: &[Candle], sma_period: usize) {
    carry.extend(day.iter().cloned());
    if carry.len() > sma_period {
        carry.drain(..carry.len() - sma_period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    /// Build `count` one-minute candles starting at midnight of `date`,
    /// closing at `close(i)`.
    fn make_day(date: NaiveDate, count: usize, close: impl Fn(usize) -> f64) -> Vec<Candle> {
        let start = date.and_hms_opt(0, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let c = close(i);
                Candle {
                    timestamp: start + Duration::minutes(i as i64),
                    open: c,
                    high: c,
                    low: c,
                    close: c,
                    volume: 1.0,
                    sma: None,
                }
            })
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn expected_counts_per_interval() {
        assert_eq!(expected_day_records(1), 1440);
        assert_eq!(expected_day_records(5), 288);
        assert_eq!(expected_day_records(60), 24);
    }

    #[test]
    #[should_panic(expected = "divide a day")]
    fn rejects_non_dividing_interval() {
        expected_day_records(7);
    }

    #[test]
    fn drops_short_day() {
        // Day 1 is dropped by the warm-up (no prior carry), day 3 is short.
        let mut candles = make_day(date(2020, 1, 1), 1440, |_| 100.0);
        candles.extend(make_day(date(2020, 1, 2), 1440, |_| 100.0));
        candles.extend(make_day(date(2020, 1, 3), 100, |_| 100.0));
        candles.extend(make_day(date(2020, 1, 4), 1440, |_| 100.0));

        let series = segment_days(candles, 1, 3);
        let dates: Vec<_> = series.segments.iter().map(|s| s.date).collect();
        assert_eq!(dates, [date(2020, 1, 2), date(2020, 1, 4)]);
        assert_eq!(series.dropped, [date(2020, 1, 1), date(2020, 1, 3)]);
    }

    #[test]
    fn drops_days_inside_warmup() {
        // Period longer than a day: day 1 has no defined SMA at all, and
        // day 2's head is still inside the 1999-record warm-up. Day 3 is the
        // first with a full carry buffer behind every row.
        let mut candles = make_day(date(2020, 1, 1), 1440, |i| i as f64);
        candles.extend(make_day(date(2020, 1, 2), 1440, |i| 2000.0 + i as f64));
        candles.extend(make_day(date(2020, 1, 3), 1440, |i| 4000.0 + i as f64));

        let series = segment_days(candles, 1, 2000);
        assert_eq!(series.dropped, [date(2020, 1, 1), date(2020, 1, 2)]);
        assert_eq!(series.segments.len(), 1);
        assert_eq!(series.segments[0].date, date(2020, 1, 3));
        assert!(series.segments[0]
            .candles
            .iter()
            .all(|c| c.sma.is_some()));
    }

    #[test]
    fn sma_continuous_across_day_boundary() {
        // Period 3: day 1 is consumed by the warm-up, but the first rows of
        // day 2 must average across the boundary, not restart.
        let mut candles = make_day(date(2020, 1, 1), 1440, |_| 10.0);
        candles.extend(make_day(date(2020, 1, 2), 1440, |_| 40.0));

        let series = segment_days(candles, 1, 3);
        assert_eq!(series.dropped, [date(2020, 1, 1)]);
        assert_eq!(series.segments.len(), 1);
        let day2 = &series.segments[0];
        // First row of day 2: mean(10, 10, 40) = 20.
        assert!((day2.candles[0].sma.unwrap() - 20.0).abs() < 1e-10);
        // Second row: mean(10, 40, 40) = 30.
        assert!((day2.candles[1].sma.unwrap() - 30.0).abs() < 1e-10);
        // Third row onward: pure day-2 window.
        assert!((day2.candles[2].sma.unwrap() - 40.0).abs() < 1e-10);
    }

    #[test]
    fn carry_refreshed_by_dropped_day() {
        // Day 2 is short and dropped, but its records still feed the SMA of
        // day 3's first rows. Day 1 itself falls inside the warm-up.
        let mut candles = make_day(date(2020, 1, 1), 1440, |_| 10.0);
        candles.extend(make_day(date(2020, 1, 2), 2, |_| 70.0));
        candles.extend(make_day(date(2020, 1, 3), 1440, |_| 10.0));

        let series = segment_days(candles, 1, 3);
        assert_eq!(series.dropped, [date(2020, 1, 1), date(2020, 1, 2)]);
        assert_eq!(series.segments.len(), 1);
        let day3 = &series.segments[0];
        // First row of day 3: mean(70, 70, 10) = 50.
        assert!((day3.candles[0].sma.unwrap() - 50.0).abs() < 1e-10);
    }

    #[test]
    fn drop_set_is_deterministic() {
        let mut candles = make_day(date(2020, 1, 1), 1440, |i| (i % 17) as f64);
        candles.extend(make_day(date(2020, 1, 2), 77, |_| 5.0));
        candles.extend(make_day(date(2020, 1, 3), 1440, |i| (i % 5) as f64));

        let a = segment_days(candles.clone(), 1, 650);
        let b = segment_days(candles, 1, 650);
        assert_eq!(a.dropped, b.dropped);
        assert_eq!(
            a.segments.iter().map(|s| s.date).collect::<Vec<_>>(),
            b.segments.iter().map(|s| s.date).collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let series = segment_days(Vec::new(), 1, 650);
        assert!(series.is_empty());
        assert!(series.dropped.is_empty());
        assert_eq!(series.total_records(), 0);
    }
}
