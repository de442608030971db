//! Alpha model capability: the two entry points a scheduler drives.
//!
//! A scheduler calls `update` once per cycle and `on_universe_changed` between
//! cycles. Both take `&mut self`, so a model can never see the two overlap.

use crate::data::HistoryProvider;
use crate::domain::{Signal, Symbol};
use std::collections::BTreeSet;

use super::oracle::PositionOracle;

/// Symbols that received a fresh bar in the current cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSlice {
    symbols: BTreeSet<Symbol>,
}

impl DataSlice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `symbol` has new data this cycle.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl FromIterator<Symbol> for DataSlice {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

/// Universe additions and removals delivered between cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniverseChanges {
    pub added: Vec<Symbol>,
    pub removed: Vec<Symbol>,
}

impl UniverseChanges {
    pub fn added<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        Self {
            added: symbols.into_iter().map(Into::into).collect(),
            removed: Vec::new(),
        }
    }

    pub fn removed<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        Self {
            added: Vec::new(),
            removed: symbols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Everything one cycle reads from the outside world.
pub struct CycleContext<'a> {
    pub history: &'a dyn HistoryProvider,
    pub positions: &'a dyn PositionOracle,
    pub slice: &'a DataSlice,
}

impl<'a> CycleContext<'a> {
    pub fn new(
        history: &'a dyn HistoryProvider,
        positions: &'a dyn PositionOracle,
        slice: &'a DataSlice,
    ) -> Self {
        Self {
            history,
            positions,
            slice,
        }
    }
}

/// Trait for alpha models.
pub trait AlphaModel {
    /// Human-readable name (e.g., "sma_crossover").
    fn name(&self) -> &str;

    /// Run one cycle and return the signals it produced, in a deterministic order.
    fn update(&mut self, ctx: &CycleContext<'_>) -> Vec<Signal>;

    /// Apply universe additions and removals.
    fn on_universe_changed(&mut self, changes: &UniverseChanges);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_membership() {
        let slice: DataSlice = ["SPY".to_string(), "QQQ".to_string()].into_iter().collect();
        assert!(slice.contains("SPY"));
        assert!(!slice.contains("IWM"));
        assert_eq!(slice.len(), 2);
    }

    #[test]
    fn universe_changes_builders() {
        let changes = UniverseChanges::added(["SPY", "QQQ"]);
        assert_eq!(changes.added, vec!["SPY".to_string(), "QQQ".to_string()]);
        assert!(changes.removed.is_empty());
        assert!(!changes.is_empty());
        assert!(UniverseChanges::default().is_empty());
    }
}
