//! Incremental indicator primitives.
//!
//! Everything here is updated one value at a time: there is no precomputed
//! series, only a bounded window per symbol that grows until full and then
//! slides forward bar by bar.

pub mod rolling_window;

pub use rolling_window::{RollingWindow, WindowError};

/// Create synthetic daily bars from close prices for testing.
///
/// Bar `i` is stamped at 16:00 on 2024-01-02 plus `i` days.
#[cfg(test)]
pub fn make_bars(symbol: &str, closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(16, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar::new(symbol, base + chrono::Duration::days(i as i64), close))
        .collect()
}

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
