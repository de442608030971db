//! The crossover signal engine.
//!
//! Owns the managed universe and one `SymbolState` per tracked symbol. Each
//! cycle issues at most two batched history requests: one bar for symbols it
//! already tracks, `long_period + 1` bars for symbols it has to warm up.

use crate::components::{
    AlphaModel, CycleContext, EngineLog, NoopPlotSink, PlotSink, TracingLog, UniverseChanges,
};
use crate::config::{ConfigError, EngineConfig};
use crate::data::{HistoryProvider, HistoryRequest, HistoryResponse};
use crate::domain::{PositionSide, Signal, SignalDirection, Symbol};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, warn};

use super::symbol_state::{Cross, MovingAverages, SymbolState};

/// Where a symbol stands in the warm-up lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPhase {
    /// No state held: never fetched, evicted after bad data, or removed.
    Untracked,
    /// State exists but the window is not full yet.
    Warming,
    /// Window full; averages and crosses are computable.
    Ready,
}

impl fmt::Display for SymbolPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolPhase::Untracked => "untracked",
            SymbolPhase::Warming => "warming",
            SymbolPhase::Ready => "ready",
        };
        f.write_str(s)
    }
}

/// Pick a direction: a fresh cross wins, otherwise hold the current side.
pub fn decide_direction(cross: Option<Cross>, position: PositionSide) -> SignalDirection {
    match (cross, position) {
        (Some(Cross::Above), _) => SignalDirection::Up,
        (Some(Cross::Below), _) => SignalDirection::Down,
        (None, PositionSide::Long) => SignalDirection::Up,
        (None, PositionSide::Short) => SignalDirection::Down,
        (None, PositionSide::Flat) => SignalDirection::Flat,
    }
}

/// Chart that carries one symbol's averages and cross markers.
pub fn chart_name(symbol: &str) -> String {
    format!("Moving Average Crossover {symbol}")
}

pub struct SignalEngine {
    config: EngineConfig,
    universe: BTreeSet<Symbol>,
    states: BTreeMap<Symbol, SymbolState>,
    log: Box<dyn EngineLog>,
    plots: Box<dyn PlotSink>,
}

impl fmt::Debug for SignalEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalEngine")
            .field("config", &self.config)
            .field("universe", &self.universe)
            .field("tracked", &self.states.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SignalEngine {
    /// Engine logging through `tracing` with plotting disabled at the sink.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_sinks(config, Box::new(TracingLog), Box::new(NoopPlotSink))
    }

    pub fn with_sinks(
        config: EngineConfig,
        log: Box<dyn EngineLog>,
        plots: Box<dyn PlotSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            universe: BTreeSet::new(),
            states: BTreeMap::new(),
            log,
            plots,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Managed symbols in iteration order.
    pub fn universe(&self) -> impl Iterator<Item = &str> {
        self.universe.iter().map(|s| s.as_str())
    }

    pub fn is_managed(&self, symbol: &str) -> bool {
        self.universe.contains(symbol)
    }

    /// Number of symbols currently holding state.
    pub fn tracked_count(&self) -> usize {
        self.states.len()
    }

    pub fn symbol_state(&self, symbol: &str) -> Option<&SymbolState> {
        self.states.get(symbol)
    }

    pub fn phase(&self, symbol: &str) -> SymbolPhase {
        match self.states.get(symbol) {
            None => SymbolPhase::Untracked,
            Some(state) if state.is_ready() => SymbolPhase::Ready,
            Some(_) => SymbolPhase::Warming,
        }
    }

    /// Run one cycle: refresh every managed symbol, then emit signals.
    pub fn run_cycle(&mut self, ctx: &CycleContext<'_>) -> Vec<Signal> {
        let (tracked, fresh): (Vec<Symbol>, Vec<Symbol>) = self
            .universe
            .iter()
            .cloned()
            .partition(|s| self.states.contains_key(s));

        let tracked_history = self.fetch_batch(ctx.history, &tracked, 1);
        let fresh_history = self.fetch_batch(ctx.history, &fresh, self.config.warmup_bars());

        self.apply_history(&tracked, &tracked_history);
        self.apply_history(&fresh, &fresh_history);

        let signals = self.emit_signals(ctx);
        debug!(
            tracked = tracked.len(),
            warming = fresh.len(),
            live = self.states.len(),
            signals = signals.len(),
            "cycle complete"
        );
        signals
    }

    /// Add then remove. Removal drops accumulated history immediately.
    pub fn apply_universe_changes(&mut self, changes: &UniverseChanges) {
        for symbol in &changes.added {
            if self.universe.insert(symbol.clone()) {
                debug!(%symbol, "added to universe");
            }
        }
        for symbol in &changes.removed {
            if self.universe.remove(symbol) {
                debug!(%symbol, "removed from universe");
            }
            self.states.remove(symbol);
        }
    }

    fn fetch_batch(
        &self,
        history: &dyn HistoryProvider,
        symbols: &[Symbol],
        bar_count: usize,
    ) -> HistoryResponse {
        if symbols.is_empty() {
            return HistoryResponse::new();
        }
        let request = HistoryRequest::new(symbols.to_vec(), bar_count, self.config.resolution);
        match history.fetch(&request) {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    provider = history.name(),
                    symbols = symbols.len(),
                    bar_count,
                    error = %err,
                    "history request failed; treating as empty"
                );
                HistoryResponse::new()
            }
        }
    }

    fn apply_history(&mut self, symbols: &[Symbol], response: &HistoryResponse) {
        let (short, long) = (self.config.short_period, self.config.long_period);
        for symbol in symbols {
            let state = self
                .states
                .entry(symbol.clone())
                .or_insert_with(|| SymbolState::new(symbol.clone(), short, long));
            if let Err(err) = state.update_with_history(response.bars_for(symbol)) {
                self.states.remove(symbol);
                self.log.log(&format!("removing {symbol} from calculations due to {err}"));
            }
        }
    }

    fn emit_signals(&self, ctx: &CycleContext<'_>) -> Vec<Signal> {
        let expiry = self.config.resolution.signal_expiry();
        let mut signals = Vec::new();

        for (symbol, state) in &self.states {
            let position = ctx.positions.current_position(symbol);
            if !ctx.slice.contains(symbol) && !position.is_open() {
                self.log.log(&format!("excluding {symbol} due to missing data"));
                continue;
            }

            let averages = match state.averages() {
                Ok(averages) => averages,
                Err(err) => {
                    self.log.log(&format!("skipping {symbol} while warming up: {err}"));
                    continue;
                }
            };

            let cross = averages.cross();
            let direction = decide_direction(cross, position);
            if self.config.allow_plots {
                self.plot(symbol, cross, &averages);
            }
            signals.push(Signal::new(symbol.clone(), direction, expiry));
        }
        signals
    }

    fn plot(&self, symbol: &str, cross: Option<Cross>, averages: &MovingAverages) {
        let chart = chart_name(symbol);
        match cross {
            Some(Cross::Above) => self.plots.record(&chart, "Buy", averages.current_short),
            Some(Cross::Below) => self.plots.record(&chart, "Sell Short", averages.current_short),
            None => {}
        }
        self.plots.record(&chart, "Short SMA", averages.current_short);
        self.plots.record(&chart, "Long SMA", averages.current_long);
    }
}

impl AlphaModel for SignalEngine {
    fn name(&self) -> &str {
        "sma_crossover"
    }

    fn update(&mut self, ctx: &CycleContext<'_>) -> Vec<Signal> {
        self.run_cycle(ctx)
    }

    fn on_universe_changed(&mut self, changes: &UniverseChanges) {
        self.apply_universe_changes(changes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{DataSlice, MemoryLog, MemoryPlotSink, NoPositions, PositionBook};
    use crate::data::InMemoryHistory;
    use crate::domain::Resolution;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn config() -> EngineConfig {
        EngineConfig::new(3, 5, Resolution::Day)
    }

    fn engine_with_log() -> (SignalEngine, MemoryLog) {
        let log = MemoryLog::new();
        let engine =
            SignalEngine::with_sinks(config(), Box::new(log.clone()), Box::new(NoopPlotSink))
                .unwrap();
        (engine, log)
    }

    fn slice(symbols: &[&str]) -> DataSlice {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn direction_priority() {
        use PositionSide::*;
        assert_eq!(decide_direction(Some(Cross::Above), Short), SignalDirection::Up);
        assert_eq!(decide_direction(Some(Cross::Below), Long), SignalDirection::Down);
        assert_eq!(decide_direction(None, Long), SignalDirection::Up);
        assert_eq!(decide_direction(None, Short), SignalDirection::Down);
        assert_eq!(decide_direction(None, Flat), SignalDirection::Flat);
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let bad = EngineConfig::new(5, 3, Resolution::Day);
        assert!(SignalEngine::new(bad).is_err());
    }

    #[test]
    fn oversized_long_period_rejected_at_construction() {
        let huge = EngineConfig::new(3, usize::MAX, Resolution::Day);
        assert!(matches!(
            SignalEngine::new(huge),
            Err(ConfigError::LongPeriodTooLarge { .. })
        ));
    }

    #[test]
    fn universe_add_is_idempotent() {
        let (mut engine, _) = engine_with_log();
        engine.apply_universe_changes(&UniverseChanges::added(["SPY", "SPY"]));
        engine.apply_universe_changes(&UniverseChanges::added(["SPY"]));
        assert_eq!(engine.universe().collect::<Vec<_>>(), vec!["SPY"]);
    }

    #[test]
    fn warm_symbol_reaches_ready_and_emits() {
        let (mut engine, _) = engine_with_log();
        engine.apply_universe_changes(&UniverseChanges::added(["SPY"]));
        let history = InMemoryHistory::from_bars(
            Resolution::Day,
            make_bars("SPY", &[10.0, 10.0, 10.0, 12.0, 12.0, 1.0]),
        );
        let signals =
            engine.run_cycle(&CycleContext::new(&history, &NoPositions, &slice(&["SPY"])));

        assert_eq!(engine.phase("SPY"), SymbolPhase::Ready);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].direction, SignalDirection::Down);
        assert_eq!(signals[0].expiry, Resolution::Day.signal_expiry());
    }

    #[test]
    fn short_history_leaves_symbol_warming_and_silent() {
        let (mut engine, log) = engine_with_log();
        engine.apply_universe_changes(&UniverseChanges::added(["SPY"]));
        let history =
            InMemoryHistory::from_bars(Resolution::Day, make_bars("SPY", &[10.0, 11.0]));
        let signals =
            engine.run_cycle(&CycleContext::new(&history, &NoPositions, &slice(&["SPY"])));

        assert!(signals.is_empty());
        assert_eq!(engine.phase("SPY"), SymbolPhase::Warming);
        assert!(log.contains("warming up"));
    }

    #[test]
    fn missing_symbol_is_evicted_and_logged() {
        let (mut engine, log) = engine_with_log();
        engine.apply_universe_changes(&UniverseChanges::added(["SPY"]));
        let history = InMemoryHistory::new(Resolution::Day);
        let signals = engine.run_cycle(&CycleContext::new(&history, &NoPositions, &slice(&[])));

        assert!(signals.is_empty());
        assert_eq!(engine.phase("SPY"), SymbolPhase::Untracked);
        assert!(engine.is_managed("SPY"));
        assert!(log.contains("removing SPY from calculations"));
    }

    #[test]
    fn no_new_data_and_flat_is_excluded() {
        let (mut engine, log) = engine_with_log();
        engine.apply_universe_changes(&UniverseChanges::added(["SPY"]));
        let history = InMemoryHistory::from_bars(Resolution::Day, make_bars("SPY", &[5.0; 6]));
        let signals = engine.run_cycle(&CycleContext::new(&history, &NoPositions, &slice(&[])));

        assert!(signals.is_empty());
        assert!(log.contains("excluding SPY due to missing data"));
    }

    #[test]
    fn open_position_without_new_data_persists() {
        let (mut engine, _) = engine_with_log();
        engine.apply_universe_changes(&UniverseChanges::added(["SPY"]));
        let history = InMemoryHistory::from_bars(Resolution::Day, make_bars("SPY", &[5.0; 6]));
        let mut book = PositionBook::new();
        book.set_quantity("SPY", -10.0);
        let signals = engine.run_cycle(&CycleContext::new(&history, &book, &slice(&[])));

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].direction, SignalDirection::Down);
    }

    #[test]
    fn removal_discards_state() {
        let (mut engine, _) = engine_with_log();
        engine.apply_universe_changes(&UniverseChanges::added(["SPY"]));
        let history = InMemoryHistory::from_bars(Resolution::Day, make_bars("SPY", &[5.0; 6]));
        engine.run_cycle(&CycleContext::new(&history, &NoPositions, &slice(&["SPY"])));
        assert_eq!(engine.tracked_count(), 1);

        engine.apply_universe_changes(&UniverseChanges::removed(["SPY"]));
        assert_eq!(engine.tracked_count(), 0);
        assert!(!engine.is_managed("SPY"));
        assert!(engine.symbol_state("SPY").is_none());
    }

    #[test]
    fn plots_recorded_only_when_allowed() {
        let sink = MemoryPlotSink::new();
        let mut engine = SignalEngine::with_sinks(
            config().with_plots(true),
            Box::new(MemoryLog::new()),
            Box::new(sink.clone()),
        )
        .unwrap();
        engine.apply_universe_changes(&UniverseChanges::added(["SPY"]));
        let history = InMemoryHistory::from_bars(
            Resolution::Day,
            make_bars("SPY", &[10.0, 10.0, 10.0, 8.0, 8.0, 20.0]),
        );
        engine.run_cycle(&CycleContext::new(&history, &NoPositions, &slice(&["SPY"])));

        let chart = chart_name("SPY");
        assert_eq!(sink.series(&chart, "Buy"), vec![12.0]);
        assert_eq!(sink.series(&chart, "Short SMA"), vec![12.0]);
        assert_eq!(sink.series(&chart, "Long SMA").len(), 1);
        assert!(sink.series(&chart, "Sell Short").is_empty());

        let quiet = MemoryPlotSink::new();
        let mut engine = SignalEngine::with_sinks(
            config(),
            Box::new(MemoryLog::new()),
            Box::new(quiet.clone()),
        )
        .unwrap();
        engine.apply_universe_changes(&UniverseChanges::added(["SPY"]));
        engine.run_cycle(&CycleContext::new(&history, &NoPositions, &slice(&["SPY"])));
        assert!(quiet.points().is_empty());
    }

    #[test]
    fn cross_below_plots_sell_short_marker() {
        let sink = MemoryPlotSink::new();
        let mut engine = SignalEngine::with_sinks(
            config().with_plots(true),
            Box::new(MemoryLog::new()),
            Box::new(sink.clone()),
        )
        .unwrap();
        engine.apply_universe_changes(&UniverseChanges::added(["SPY"]));
        let history = InMemoryHistory::from_bars(
            Resolution::Day,
            make_bars("SPY", &[10.0, 10.0, 10.0, 12.0, 12.0, 1.0]),
        );
        let signals =
            engine.run_cycle(&CycleContext::new(&history, &NoPositions, &slice(&["SPY"])));
        assert_eq!(signals[0].direction, SignalDirection::Down);

        let chart = chart_name("SPY");
        let sell = sink.series(&chart, "Sell Short");
        assert_eq!(sell.len(), 1);
        assert_approx(sell[0], 25.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(sink.series(&chart, "Long SMA")[0], 9.0, DEFAULT_EPSILON);
        assert!(sink.series(&chart, "Buy").is_empty());
    }
}
