use crate::{ConfigError, WaitTime, DEFAULT_SPAWN_RATE, DEFAULT_USERS};
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;

#[doc(hidden)]
#[derive(Clone, Debug)]
pub struct ScenarioConfig {
    pub name: String,
    pub users: usize,
    pub spawn_rate: u32,
    pub duration: Option<Duration>,
    pub iterations: Option<u64>,
    pub wait_time: Option<WaitTime>,
}

impl ScenarioConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            users: DEFAULT_USERS.get(),
            spawn_rate: DEFAULT_SPAWN_RATE.get(),
            duration: None,
            iterations: None,
            wait_time: None,
        }
    }

    /// Checks the values a builder may have set and returns them in their non-zero form.
    pub fn validate(&self) -> Result<(NonZeroUsize, NonZeroU32), ConfigError> {
        let users = NonZeroUsize::new(self.users).ok_or(ConfigError::NoUsers)?;
        let spawn_rate = NonZeroU32::new(self.spawn_rate).ok_or(ConfigError::ZeroSpawnRate)?;
        if let Some(wait) = &self.wait_time {
            wait.validate()?;
        }
        Ok((users, spawn_rate))
    }

    /// Whether the run only ends on an external signal.
    pub fn is_unbounded(&self) -> bool {
        self.duration.is_none() && self.iterations.is_none()
    }
}
