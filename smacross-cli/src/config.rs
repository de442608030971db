//! Replay configuration file.
//!
//! ```toml
//! [engine]
//! short_period = 50
//! long_period = 200
//! resolution = "day"
//! # allow_plots defaults to true for universes of fewer than 5 symbols
//!
//! [universe]
//! symbols = ["SPY", "QQQ"]
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use smacross_core::domain::Resolution;
use smacross_core::EngineConfig;
use std::path::Path;

/// Universes below this size get chart output unless the file says otherwise.
pub const PLOT_UNIVERSE_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
struct RawReplayConfig {
    #[serde(default)]
    engine: RawEngineSection,
    universe: UniverseSection,
}

#[derive(Debug, Default, Deserialize)]
struct RawEngineSection {
    short_period: Option<usize>,
    long_period: Option<usize>,
    resolution: Option<Resolution>,
    allow_plots: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct UniverseSection {
    symbols: Vec<String>,
}

/// Engine parameters plus the symbols the replay subscribes to.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    pub engine: EngineConfig,
    pub symbols: Vec<String>,
}

impl ReplayConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawReplayConfig = toml::from_str(content).context("parse replay config")?;
        if raw.universe.symbols.is_empty() {
            bail!("[universe] symbols must list at least one symbol");
        }

        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            short_period: raw.engine.short_period.unwrap_or(defaults.short_period),
            long_period: raw.engine.long_period.unwrap_or(defaults.long_period),
            resolution: raw.engine.resolution.unwrap_or(defaults.resolution),
            allow_plots: raw
                .engine
                .allow_plots
                .unwrap_or(raw.universe.symbols.len() < PLOT_UNIVERSE_LIMIT),
        };
        engine.validate()?;

        Ok(Self {
            engine,
            symbols: raw.universe.symbols,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Config used when no file is given: engine defaults over `symbols`.
    pub fn for_symbols(engine: EngineConfig, symbols: Vec<String>) -> Self {
        Self { engine, symbols }
    }
}
