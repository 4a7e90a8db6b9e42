//! Simulated user contract
use carga_core::WaitTime;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::Debug;
use std::future::Future;

/// A simulated user.
///
/// Each instance is owned by exactly one task for the whole run, so any state it keeps (cached
/// identifiers, counters) needs no synchronisation. The harness calls [`User::on_start`] once,
/// then repeatedly picks a task from [`User::TASKS`] by weight, runs it and pauses for a random
/// duration drawn from [`User::WAIT_TIME`]. When the run ends [`User::on_stop`] is called once.
///
/// Failures are the user's own business: tasks return nothing and are expected to log what
/// went wrong and carry on.
pub trait User: Send + 'static {
    type Task: Copy + Debug + Send + Sync + 'static;

    /// Tasks with their relative weights. Zero-weight tasks are never picked.
    const TASKS: &'static [(Self::Task, u32)];

    const WAIT_TIME: WaitTime;

    fn on_start(&mut self) -> impl Future<Output = ()> + Send {
        async {}
    }

    fn run(&mut self, task: Self::Task) -> impl Future<Output = ()> + Send;

    fn on_stop(&mut self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

pub(crate) fn has_tasks<U: User>() -> bool {
    U::TASKS.iter().any(|(_, weight)| *weight > 0)
}

pub(crate) fn pick_task<U: User, R: Rng + ?Sized>(rng: &mut R) -> Option<U::Task> {
    U::TASKS
        .choose_weighted(rng, |(_, weight)| *weight)
        .ok()
        .map(|(task, _)| *task)
}

pub(crate) fn pick_wait<R: Rng + ?Sized>(wait: &WaitTime, rng: &mut R) -> std::time::Duration {
    if wait.is_constant() {
        wait.min
    } else {
        rng.gen_range(wait.min..=wait.max)
    }
}
