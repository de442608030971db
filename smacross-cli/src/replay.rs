//! Offline replay: drive the engine once per distinct bar timestamp.
//!
//! The replay plays the scheduler's role. It subscribes the configured
//! universe, advances the history cursor bar by bar, and writes every
//! emitted signal to `out` as one JSON object per line. A unit position
//! book follows the signals (up goes long, down goes short, flat holds)
//! so held positions keep producing signals between crosses.

use crate::config::ReplayConfig;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use smacross_core::components::{
    CycleContext, NoopPlotSink, PlotSink, PositionBook, TracingLog, UniverseChanges,
};
use smacross_core::data::InMemoryHistory;
use smacross_core::domain::{Signal, SignalDirection};
use smacross_core::{AlphaModel, SignalEngine};
use std::io::Write;

/// Plot points routed to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPlotSink;

impl PlotSink for TracingPlotSink {
    fn record(&self, chart: &str, series: &str, value: f64) {
        tracing::debug!(target: "smacross::plot", chart, series, value);
    }
}

#[derive(Debug, Serialize)]
struct SignalLine<'a> {
    time: NaiveDateTime,
    symbol: &'a str,
    direction: SignalDirection,
    expiry_secs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub cycles: usize,
    pub signals: usize,
    pub up: usize,
    pub down: usize,
    pub flat: usize,
    pub open_positions: usize,
}

impl ReplaySummary {
    fn count(&mut self, signal: &Signal) {
        self.signals += 1;
        match signal.direction {
            SignalDirection::Up => self.up += 1,
            SignalDirection::Down => self.down += 1,
            SignalDirection::Flat => self.flat += 1,
        }
    }
}

fn follow_signal(book: &mut PositionBook, signal: &Signal) {
    match signal.direction {
        SignalDirection::Up => book.set_quantity(&signal.symbol, 1.0),
        SignalDirection::Down => book.set_quantity(&signal.symbol, -1.0),
        SignalDirection::Flat => {}
    }
}

pub fn run_replay<W: Write>(
    config: &ReplayConfig,
    history: &mut InMemoryHistory,
    out: &mut W,
) -> Result<ReplaySummary> {
    let plots: Box<dyn PlotSink> = if config.engine.allow_plots {
        Box::new(TracingPlotSink)
    } else {
        Box::new(NoopPlotSink)
    };
    let mut engine = SignalEngine::with_sinks(config.engine.clone(), Box::new(TracingLog), plots)?;
    engine.on_universe_changed(&UniverseChanges::added(config.symbols.iter().cloned()));

    let mut book = PositionBook::new();
    let mut summary = ReplaySummary::default();

    tracing::info!(
        symbols = config.symbols.len(),
        short = config.engine.short_period,
        long = config.engine.long_period,
        resolution = %config.engine.resolution,
        "starting replay"
    );

    for at in history.timestamps() {
        history.set_cursor(Some(at));
        let slice = history.slice_at(at);
        let signals = {
            let ctx = CycleContext::new(&*history, &book, &slice);
            engine.update(&ctx)
        };
        summary.cycles += 1;

        for signal in &signals {
            let line = SignalLine {
                time: at,
                symbol: &signal.symbol,
                direction: signal.direction,
                expiry_secs: signal.expiry.as_secs_f64(),
            };
            serde_json::to_writer(&mut *out, &line).context("write signal")?;
            writeln!(out).context("write signal")?;
            summary.count(signal);
            follow_signal(&mut book, signal);
        }
    }

    summary.open_positions = book.open_count();
    tracing::info!(
        cycles = summary.cycles,
        signals = summary.signals,
        open_positions = summary.open_positions,
        "replay finished"
    );
    Ok(summary)
}
