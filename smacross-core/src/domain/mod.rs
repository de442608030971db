//! Domain types for the crossover engine.

pub mod bar;
pub mod position;
pub mod resolution;
pub mod signal;

pub use bar::Bar;
pub use position::{Position, PositionSide};
pub use resolution::Resolution;
pub use signal::{Signal, SignalDirection};

/// Symbol type alias
pub type Symbol = String;
