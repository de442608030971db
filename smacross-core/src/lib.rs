//! smacross core: incremental moving-average crossover signals.
//!
//! This crate contains:
//! - Domain types (bars, positions, resolutions, signals)
//! - A fixed-capacity rolling window of closes
//! - Per-symbol short/long SMA state with one-bar look-back cross detection
//! - The signal engine: universe lifecycle, two-batch history fetches, signal emission
//! - Ports for history, positions, logging, and plotting

pub mod components;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;

pub use components::{AlphaModel, CycleContext, DataSlice, UniverseChanges};
pub use config::{ConfigError, EngineConfig};
pub use engine::{SignalEngine, SymbolPhase};
