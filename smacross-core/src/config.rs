//! Engine configuration.

use crate::domain::Resolution;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted `long_period`. Each tracked symbol holds `long_period + 1`
/// closes, so this also bounds per-symbol memory.
pub const MAX_LONG_PERIOD: usize = 100_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("short_period must be >= 1")]
    ZeroShortPeriod,

    #[error("long_period ({long}) must be greater than short_period ({short})")]
    PeriodOrder { short: usize, long: usize },

    #[error("long_period ({long}) exceeds the supported maximum of {max}")]
    LongPeriodTooLarge { long: usize, max: usize },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parameters of the crossover engine.
///
/// ```toml
/// short_period = 50
/// long_period = 200
/// resolution = "day"
/// allow_plots = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_short_period")]
    pub short_period: usize,

    #[serde(default = "default_long_period")]
    pub long_period: usize,

    #[serde(default)]
    pub resolution: Resolution,

    /// Emit chart points through the plot sink.
    #[serde(default)]
    pub allow_plots: bool,
}

fn default_short_period() -> usize {
    50
}

fn default_long_period() -> usize {
    200
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            short_period: default_short_period(),
            long_period: default_long_period(),
            resolution: Resolution::default(),
            allow_plots: false,
        }
    }
}

impl EngineConfig {
    pub fn new(short_period: usize, long_period: usize, resolution: Resolution) -> Self {
        Self {
            short_period,
            long_period,
            resolution,
            allow_plots: false,
        }
    }

    pub fn with_plots(mut self, allow_plots: bool) -> Self {
        self.allow_plots = allow_plots;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_period == 0 {
            return Err(ConfigError::ZeroShortPeriod);
        }
        if self.long_period <= self.short_period {
            return Err(ConfigError::PeriodOrder {
                short: self.short_period,
                long: self.long_period,
            });
        }
        if self.long_period > MAX_LONG_PERIOD {
            return Err(ConfigError::LongPeriodTooLarge {
                long: self.long_period,
                max: MAX_LONG_PERIOD,
            });
        }
        Ok(())
    }

    /// Bars requested when a symbol is warmed from scratch.
    pub fn warmup_bars(&self) -> usize {
        self.long_period.saturating_add(1)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_golden_cross() {
        let c = EngineConfig::default();
        assert_eq!(c.short_period, 50);
        assert_eq!(c.long_period, 200);
        assert_eq!(c.resolution, Resolution::Day);
        assert!(!c.allow_plots);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_short_period_rejected() {
        let c = EngineConfig::new(0, 5, Resolution::Day);
        assert!(matches!(c.validate(), Err(ConfigError::ZeroShortPeriod)));
    }

    #[test]
    fn long_must_exceed_short() {
        let c = EngineConfig::new(5, 5, Resolution::Day);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::PeriodOrder { short: 5, long: 5 })
        ));
    }

    #[test]
    fn oversized_long_period_rejected() {
        let c = EngineConfig::new(3, usize::MAX, Resolution::Day);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::LongPeriodTooLarge { long: usize::MAX, .. })
        ));
        assert_eq!(c.warmup_bars(), usize::MAX);

        let err = EngineConfig::from_toml("short_period = 3\nlong_period = 9223372036854775807")
            .unwrap_err();
        assert!(matches!(err, ConfigError::LongPeriodTooLarge { .. }), "got {err}");

        let at_limit = EngineConfig::new(3, MAX_LONG_PERIOD, Resolution::Day);
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let c =
            EngineConfig::from_toml("short_period = 3\nlong_period = 5\nresolution = \"minute\"")
                .unwrap();
        assert_eq!(c.short_period, 3);
        assert_eq!(c.long_period, 5);
        assert_eq!(c.resolution, Resolution::Minute);
        assert_eq!(c.warmup_bars(), 6);
    }

    #[test]
    fn invalid_toml_periods_rejected() {
        let err = EngineConfig::from_toml("short_period = 20\nlong_period = 10").unwrap_err();
        assert!(err.to_string().contains("must be greater"));
    }
}
