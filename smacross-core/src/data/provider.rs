//! History provider trait and structured error types.
//!
//! The `HistoryProvider` trait abstracts over wherever bars come from (a
//! broker API, a CSV replay, a test fixture). The engine issues at most two
//! batched requests per cycle through it.

use crate::domain::{Bar, Resolution, Symbol};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use thiserror::Error;

/// Per-symbol data problems found while applying a history response.
///
/// Always recovered inside the engine: the symbol's state is dropped and the
/// cycle carries on with everything else.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("missing close for {symbol} at {timestamp}")]
    MissingClose {
        symbol: Symbol,
        timestamp: NaiveDateTime,
    },

    #[error("symbol absent from history response: {symbol}")]
    SymbolAbsent { symbol: Symbol },
}

/// Whole-request failures reported by a provider.
///
/// The engine never propagates these. A failed request is logged and then
/// handled exactly like a response that contains no symbols.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("resolution {requested} not served (provider holds {available} bars)")]
    UnsupportedResolution {
        requested: Resolution,
        available: Resolution,
    },
}

/// One batched history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbols: Vec<Symbol>,
    pub bar_count: usize,
    pub resolution: Resolution,
}

impl HistoryRequest {
    pub fn new(symbols: Vec<Symbol>, bar_count: usize, resolution: Resolution) -> Self {
        Self {
            symbols,
            bar_count,
            resolution,
        }
    }
}

/// Bars per symbol, oldest first. Symbols without data may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryResponse {
    bars: HashMap<Symbol, Vec<Bar>>,
}

impl HistoryResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<Symbol>, bars: Vec<Bar>) {
        self.bars.insert(symbol.into(), bars);
    }

    pub fn bars_for(&self, symbol: &str) -> Option<&[Bar]> {
        self.bars.get(symbol).map(|v| v.as_slice())
    }

    pub fn symbol_count(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Source of historical bars.
pub trait HistoryProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the most recent `request.bar_count` bars for every requested symbol.
    fn fetch(&self, request: &HistoryRequest) -> Result<HistoryResponse, ProviderError>;
}
