//! Bar resolution and its wall-clock span.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Time granularity of one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Tick,
    Second,
    Minute,
    Hour,
    #[default]
    Day,
}

impl Resolution {
    /// Span covered by one bar. Ticks have no fixed span and map to zero.
    pub fn interval(&self) -> Duration {
        match self {
            Resolution::Tick => Duration::ZERO,
            Resolution::Second => Duration::from_secs(1),
            Resolution::Minute => Duration::from_secs(60),
            Resolution::Hour => Duration::from_secs(60 * 60),
            Resolution::Day => Duration::from_secs(24 * 60 * 60),
        }
    }

    /// How long a signal produced at this resolution stays valid: a quarter bar.
    pub fn signal_expiry(&self) -> Duration {
        self.interval() / 4
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resolution::Tick => "tick",
            Resolution::Second => "second",
            Resolution::Minute => "minute",
            Resolution::Hour => "hour",
            Resolution::Day => "day",
        };
        f.write_str(name)
    }
}
