//! Diagnostic side channels: the log port and the plot port.
//!
//! Neither affects signals. Both are handed to the engine at construction so
//! the core never reaches for global state.

use std::sync::{Arc, Mutex, PoisonError};

/// Free-text diagnostics for exclusions and evictions.
pub trait EngineLog: Send {
    fn log(&self, message: &str);
}

/// Forwards messages to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl EngineLog for TracingLog {
    fn log(&self, message: &str) {
        tracing::info!(target: "smacross::engine", "{message}");
    }
}

/// Keeps every message; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl EngineLog for MemoryLog {
    fn log(&self, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// Chart output. A no-op implementation is always acceptable.
pub trait PlotSink: Send {
    fn record(&self, chart: &str, series: &str, value: f64);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlotSink;

impl PlotSink for NoopPlotSink {
    fn record(&self, _chart: &str, _series: &str, _value: f64) {}
}

/// One recorded plot point.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub chart: String,
    pub series: String,
    pub value: f64,
}

/// Keeps every plot point; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryPlotSink {
    points: Arc<Mutex<Vec<PlotPoint>>>,
}

impl MemoryPlotSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> Vec<PlotPoint> {
        self.points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Points recorded to one series of one chart, in recording order.
    pub fn series(&self, chart: &str, series: &str) -> Vec<f64> {
        self.points()
            .into_iter()
            .filter(|p| p.chart == chart && p.series == series)
            .map(|p| p.value)
            .collect()
    }
}

impl PlotSink for MemoryPlotSink {
    fn record(&self, chart: &str, series: &str, value: f64) {
        self.points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PlotPoint {
                chart: chart.to_string(),
                series: series.to_string(),
                value,
            });
    }
}
