//! Candle — the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLCV candle for a single sampling interval (typically one minute).
///
/// `sma` is the trailing simple moving average attached by the segmenter.
/// It is `None` on raw input and on records inside the indicator's warm-up
/// region; the segmenter only admits days where every record has a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default)]
    pub sma: Option<f64>,
}

impl Candle {
    /// Basic OHLCV sanity check: finite, non-negative, high >= low and
    /// high/low bracket open and close.
    pub fn is_sane(&self) -> bool {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        if fields.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}
