//! Signal: the engine's only output.
//!
//! A signal is a directional prediction for one symbol with a short expiry.
//! It is immutable once emitted and lives only for the cycle that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Directional prediction carried by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalDirection {
    Up,
    Down,
    Flat,
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalDirection::Up => "up",
            SignalDirection::Down => "down",
            SignalDirection::Flat => "flat",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub direction: SignalDirection,
    pub expiry: Duration,
}

impl Signal {
    pub fn new(symbol: impl Into<String>, direction: SignalDirection, expiry: Duration) -> Self {
        Self {
            symbol: symbol.into(),
            direction,
            expiry,
        }
    }
}
