use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;

/// Number of simulated users when none is configured.
pub const DEFAULT_USERS: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(1) };

/// Users started per second when no spawn rate is configured.
pub const DEFAULT_SPAWN_RATE: NonZeroU32 = unsafe { NonZeroU32::new_unchecked(1) };

/// Pause used by `WaitTime::default()`.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(1);

/// Latency quantiles reported in `RunStatistics`.
pub const REPORTED_QUANTILES: [f64; 3] = [0.5, 0.9, 0.99];
