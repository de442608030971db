//! Bar: the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single closing-price bar for one symbol.
///
/// The close is optional: providers that return a row without a usable close
/// still hand the row through, and the symbol update treats it as bad data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub close: Option<f64>,
}

impl Bar {
    pub fn new(symbol: impl Into<String>, timestamp: NaiveDateTime, close: f64) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            close: Some(close),
        }
    }

    /// A bar with no close value.
    pub fn without_close(symbol: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            close: None,
        }
    }

    /// The close, if present and not NaN.
    pub fn close_value(&self) -> Option<f64> {
        self.close.filter(|c| !c.is_nan())
    }

    /// Returns true if the bar carries no usable close (void bar).
    pub fn is_void(&self) -> bool {
        self.close_value().is_none()
    }
}
