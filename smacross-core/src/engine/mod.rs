//! Crossover engine: per-symbol state and the cycle driver.
//!
//! One cycle, driven by an external scheduler:
//!
//! 1. Partition the managed universe into tracked and new symbols
//! 2. Fetch one bar for tracked symbols and `long_period + 1` for new ones (two batches at most)
//! 3. Feed each symbol's bars into its state, evicting symbols with bad data
//! 4. Emit a signal for every ready symbol that has new data or an open position

pub mod signal_engine;
pub mod symbol_state;

pub use signal_engine::{chart_name, decide_direction, SignalEngine, SymbolPhase};
pub use symbol_state::{Cross, MovingAverages, SymbolState};
