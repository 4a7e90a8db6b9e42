use crate::{ConfigError, DEFAULT_WAIT};
use std::fmt;
use std::time::Duration;

/// Pause a simulated user takes between two tasks.
///
/// The harness draws a uniformly distributed value in `[min, max]` after every task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WaitTime {
    pub min: Duration,
    pub max: Duration,
}

impl WaitTime {
    pub const fn between(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Shorthand for whole-second windows, e.g. `WaitTime::between_secs(1, 5)`.
    pub const fn between_secs(min: u64, max: u64) -> Self {
        Self::between(Duration::from_secs(min), Duration::from_secs(max))
    }

    pub const fn constant(wait: Duration) -> Self {
        Self::between(wait, wait)
    }

    pub const fn none() -> Self {
        Self::constant(Duration::ZERO)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            Err(ConfigError::InvertedWait {
                min: self.min,
                max: self.max,
            })
        } else {
            Ok(())
        }
    }

    pub fn is_constant(&self) -> bool {
        self.min == self.max
    }
}

impl Default for WaitTime {
    fn default() -> Self {
        Self::constant(DEFAULT_WAIT)
    }
}

impl fmt::Display for WaitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            humantime::format_duration(self.min),
            humantime::format_duration(self.max)
        )
    }
}
