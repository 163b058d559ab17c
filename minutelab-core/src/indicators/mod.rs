//! Indicator engine.
//!
//! Indicators are computed without lookahead: the value at index `i` depends
//! only on indices `<= i`. Warm-up positions (fewer than `period` inputs
//! available) are `NAN`; the segmenter maps those to `sma: None` and treats
//! any `None` inside a day as grounds for dropping the day.

pub mod sma;

pub use sma::Sma;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
