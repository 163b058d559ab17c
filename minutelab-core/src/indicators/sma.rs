//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a trailing window.
//! Warm-up: period - 1 (first valid value at index period-1).

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Number of leading positions with no defined value.
    pub fn warmup(&self) -> usize {
        self.period - 1
    }

    /// Compute the SMA over `closes`, returning a same-length vector.
    ///
    /// `result[i]` is the arithmetic mean of the `period` most recent values
    /// ending at `i`, and `NAN` for `i < period - 1`. The value at `i` never
    /// depends on any index greater than `i`.
    pub fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let mut sum: f64 = closes.iter().take(self.period).sum();
        result[self.period - 1] = sum / self.period as f64;

        for i in self.period..n {
            sum = sum - closes[i - self.period] + closes[i];
            result[i] = sum / self.period as f64;
        }

        result
    }
}
