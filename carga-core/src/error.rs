use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("A scenario needs at least one user.")]
    NoUsers,

    #[error("Spawn rate must be greater than zero.")]
    ZeroSpawnRate,

    #[error("Wait window is inverted: min {min:?} is greater than max {max:?}.")]
    InvertedWait { min: Duration, max: Duration },

    #[error("User type declares no tasks with a non-zero weight.")]
    NoTasks,
}
