//! Per-symbol moving-average state.
//!
//! One rolling window of closes, sized `long_period + 1` so that both the
//! current averages and the averages one bar earlier can be read from it.

use crate::data::DataError;
use crate::domain::{Bar, Symbol};
use crate::indicators::{RollingWindow, WindowError};
use std::num::NonZeroUsize;

/// Direction of a moving-average crossover on the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cross {
    /// Short average moved from below to above the long average.
    Above,
    /// Short average moved from above to below the long average.
    Below,
}

/// Short and long averages now and one bar ago.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverages {
    pub current_short: f64,
    pub current_long: f64,
    pub before_short: f64,
    pub before_long: f64,
}

impl MovingAverages {
    pub fn cross_above(&self) -> bool {
        self.current_short > self.current_long && self.before_short < self.before_long
    }

    pub fn cross_below(&self) -> bool {
        self.current_short < self.current_long && self.before_short > self.before_long
    }

    /// At most one of the two predicates can hold, since they demand opposite
    /// strict orderings of the same pair.
    pub fn cross(&self) -> Option<Cross> {
        if self.cross_above() {
            Some(Cross::Above)
        } else if self.cross_below() {
            Some(Cross::Below)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolState {
    symbol: Symbol,
    short_period: usize,
    long_period: usize,
    closes: RollingWindow,
}

impl SymbolState {
    /// Caller guarantees `0 < short_period < long_period`.
    pub fn new(symbol: impl Into<Symbol>, short_period: usize, long_period: usize) -> Self {
        debug_assert!(short_period >= 1 && short_period < long_period);
        Self {
            symbol: symbol.into(),
            short_period,
            long_period,
            closes: RollingWindow::new(NonZeroUsize::MIN.saturating_add(long_period)),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn window(&self) -> &RollingWindow {
        &self.closes
    }

    pub fn is_ready(&self) -> bool {
        self.closes.is_ready()
    }

    /// Feed this symbol's bars (oldest first) from a history response.
    ///
    /// `None` means the response had no entry for this symbol. On error the
    /// closes added before the bad bar stay in the window.
    pub fn update_with_history(&mut self, bars: Option<&[Bar]>) -> Result<usize, DataError> {
        let bars = match bars {
            Some(bars) if !bars.is_empty() => bars,
            _ => {
                return Err(DataError::SymbolAbsent {
                    symbol: self.symbol.clone(),
                })
            }
        };

        for bar in bars {
            let close = bar.close_value().ok_or_else(|| DataError::MissingClose {
                symbol: self.symbol.clone(),
                timestamp: bar.timestamp,
            })?;
            self.closes.add(close);
        }
        Ok(bars.len())
    }

    pub fn current_short_sma(&self) -> Result<f64, WindowError> {
        self.closes.mean_from(0, self.short_period)
    }

    pub fn current_long_sma(&self) -> Result<f64, WindowError> {
        self.closes.mean_from(0, self.long_period)
    }

    pub fn before_short_sma(&self) -> Result<f64, WindowError> {
        self.closes.mean_from(1, self.short_period)
    }

    pub fn before_long_sma(&self) -> Result<f64, WindowError> {
        self.closes.mean_from(1, self.long_period)
    }

    pub fn averages(&self) -> Result<MovingAverages, WindowError> {
        Ok(MovingAverages {
            current_short: self.current_short_sma()?,
            current_long: self.current_long_sma()?,
            before_short: self.before_short_sma()?,
            before_long: self.before_long_sma()?,
        })
    }

    pub fn cross_above(&self) -> Result<bool, WindowError> {
        self.averages().map(|a| a.cross_above())
    }

    pub fn cross_below(&self) -> Result<bool, WindowError> {
        self.averages().map(|a| a.cross_below())
    }
}
