//! In-memory history with a replay cursor.
//!
//! Holds the full bar series per symbol and answers requests as if "now" were
//! the cursor timestamp: only bars at or before the cursor are visible. This
//! is what the CLI replays through and what the integration tests drive.

use super::provider::{HistoryProvider, HistoryRequest, HistoryResponse, ProviderError};
use crate::components::DataSlice;
use crate::domain::{Bar, Resolution, Symbol};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub struct InMemoryHistory {
    resolution: Resolution,
    series: BTreeMap<Symbol, Vec<Bar>>,
    cursor: Option<NaiveDateTime>,
}

impl InMemoryHistory {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            series: BTreeMap::new(),
            cursor: None,
        }
    }

    /// Build from an unordered bag of bars; each symbol's series is sorted by time.
    pub fn from_bars(resolution: Resolution, bars: impl IntoIterator<Item = Bar>) -> Self {
        let mut history = Self::new(resolution);
        for bar in bars {
            history.series.entry(bar.symbol.clone()).or_default().push(bar);
        }
        for series in history.series.values_mut() {
            series.sort_by_key(|b| b.timestamp);
        }
        history
    }

    /// Append bars for one symbol, keeping the series time-ordered.
    pub fn extend(&mut self, symbol: &str, bars: impl IntoIterator<Item = Bar>) {
        let series = self.series.entry(symbol.to_string()).or_default();
        series.extend(bars);
        series.sort_by_key(|b| b.timestamp);
    }

    /// Move "now". `None` exposes the whole series.
    pub fn set_cursor(&mut self, cursor: Option<NaiveDateTime>) {
        self.cursor = cursor;
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|s| s.as_str())
    }

    /// All distinct bar timestamps across every symbol, ascending.
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.series
            .values()
            .flat_map(|bars| bars.iter().map(|b| b.timestamp))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Symbols that have a bar stamped exactly at `at`.
    pub fn slice_at(&self, at: NaiveDateTime) -> DataSlice {
        self.series
            .iter()
            .filter(|(_, bars)| bars.binary_search_by_key(&at, |b| b.timestamp).is_ok())
            .map(|(symbol, _)| symbol.clone())
            .collect()
    }

    fn visible(&self, symbol: &str) -> &[Bar] {
        let Some(bars) = self.series.get(symbol) else {
            return &[];
        };
        match self.cursor {
            None => bars,
            Some(cursor) => {
                let end = bars.partition_point(|b| b.timestamp <= cursor);
                &bars[..end]
            }
        }
    }
}

impl HistoryProvider for InMemoryHistory {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn fetch(&self, request: &HistoryRequest) -> Result<HistoryResponse, ProviderError> {
        if request.resolution != self.resolution {
            return Err(ProviderError::UnsupportedResolution {
                requested: request.resolution,
                available: self.resolution,
            });
        }

        let mut response = HistoryResponse::new();
        for symbol in &request.symbols {
            let visible = self.visible(symbol);
            if visible.is_empty() {
                continue;
            }
            let start = visible.len().saturating_sub(request.bar_count);
            response.insert(symbol.clone(), visible[start..].to_vec());
        }
        Ok(response)
    }
}
