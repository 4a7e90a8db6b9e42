#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod recorder;
pub mod scenario;
mod swarm;
#[doc(hidden)]
pub mod transaction;
pub mod user;

pub use carga_core as core;
pub use carga_core::{ConfigError, RunStatistics, TransactionStatistics, WaitTime};
pub use carga_macros::transaction;
pub use recorder::Recorder;
pub use scenario::Scenario;
pub use user::User;

pub mod prelude {
    pub use crate::scenario::{ConfigurableScenario, Scenario};
    pub use crate::user::User;
    pub use crate::Recorder;
    pub use carga_core::{ConfigError, RunStatistics, WaitTime};
    pub use carga_macros::transaction;
}
