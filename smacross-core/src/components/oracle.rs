//! Position oracle: read-only view of what the portfolio currently holds.

use crate::domain::{Position, PositionSide, Symbol};
use std::collections::HashMap;

pub trait PositionOracle {
    /// Current side for `symbol`. Unknown symbols are flat.
    fn current_position(&self, symbol: &str) -> PositionSide;
}

/// Oracle backed by signed quantities per symbol.
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    positions: HashMap<Symbol, Position>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signed quantity held in `symbol`. Zero closes the position.
    pub fn set_quantity(&mut self, symbol: &str, quantity: f64) {
        if quantity == 0.0 {
            self.positions.remove(symbol);
        } else {
            self.positions
                .insert(symbol.to_string(), Position::new(symbol, quantity));
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol).filter(|p| !p.is_flat())
    }

    /// Number of open positions.
    pub fn open_count(&self) -> usize {
        self.positions.values().filter(|p| !p.is_flat()).count()
    }
}

impl PositionOracle for PositionBook {
    fn current_position(&self, symbol: &str) -> PositionSide {
        self.get(symbol).map_or(PositionSide::Flat, Position::side)
    }
}

/// Oracle that reports every symbol as flat.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPositions;

impl PositionOracle for NoPositions {
    fn current_position(&self, _symbol: &str) -> PositionSide {
        PositionSide::Flat
    }
}
