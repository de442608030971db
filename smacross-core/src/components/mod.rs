//! Component traits: the seams between the engine and its host.
//!
//! - Alpha model: the scheduler-facing capability (`update`, `on_universe_changed`)
//! - Position oracle: read-only view of current holdings
//! - Log and plot sinks: diagnostic side channels injected at construction
//!
//! The history provider port lives in `data`.

pub mod alpha;
pub mod oracle;
pub mod sinks;

pub use alpha::{AlphaModel, CycleContext, DataSlice, UniverseChanges};
pub use oracle::{NoPositions, PositionBook, PositionOracle};
pub use sinks::{
    EngineLog, MemoryLog, MemoryPlotSink, NoopPlotSink, PlotPoint, PlotSink, TracingLog,
};
