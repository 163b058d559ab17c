//! CSV candle loading and precondition validation.
//!
//! Data acquisition (exchange fetch, retry/backoff, gap repair) lives
//! upstream; this loader consumes its output file and defensively verifies
//! the properties the engine assumes: strictly increasing timestamps, sane
//! OHLCV values, and a non-empty series after date filtering.
//!
//! Expected format, one record per sampling interval:
//! `timestamp,open,high,low,close,volume` with timestamps like
//! `2020-01-01 00:01:00`.

use chrono::NaiveDateTime;
use minutelab_core::domain::Candle;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::config::BacktestConfig;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: bad timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: timestamp {timestamp} is not after the previous row (input must be sorted and duplicate-free)")]
    OutOfOrder { row: usize, timestamp: NaiveDateTime },

    #[error("row {row}: insane OHLCV values at {timestamp}")]
    InsaneRow { row: usize, timestamp: NaiveDateTime },

    #[error("no data available for the selected date range")]
    EmptyRange,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Load candles from `path`, applying the config's inclusive date bounds.
///
/// Fatal before simulation: an empty filtered series is `EmptyRange`, and
/// any ordering or sanity violation aborts the load rather than admitting a
/// corrupted series.
pub fn load_candles(path: &Path, config: &BacktestConfig) -> Result<Vec<Candle>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let mut candles: Vec<Candle> = Vec::new();
    // Ordering is checked against the previous *unfiltered* row, so disorder
    // outside the date window is still rejected.
    let mut previous: Option<NaiveDateTime> = None;

    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        // Header is row 0 in the file; data rows are 1-based for messages.
        let row_number = index + 1;

        let timestamp = NaiveDateTime::parse_from_str(&row.timestamp, TIMESTAMP_FORMAT)
            .map_err(|_| LoadError::BadTimestamp {
                row: row_number,
                value: row.timestamp.clone(),
            })?;

        if let Some(prev) = previous {
            if timestamp <= prev {
                return Err(LoadError::OutOfOrder {
                    row: row_number,
                    timestamp,
                });
            }
        }
        previous = Some(timestamp);

        let candle = Candle {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            sma: None,
        };
        if !candle.is_sane() {
            return Err(LoadError::InsaneRow {
                row: row_number,
                timestamp,
            });
        }

        let date = timestamp.date();
        if let Some(start) = config.start_date {
            if date < start {
                continue;
            }
        }
        if let Some(end) = config.end_date {
            if date > end {
                continue;
            }
        }
        candles.push(candle);
    }

    if candles.is_empty() {
        return Err(LoadError::EmptyRange);
    }
    Ok(candles)
}
