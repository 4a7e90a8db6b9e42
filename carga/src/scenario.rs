//! Scenario logic and configuration
use crate::swarm::run_scenario;
use crate::User;
use carga_core::{ConfigError, RunStatistics, ScenarioConfig, WaitTime};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

type RunnerFut = Pin<Box<dyn Future<Output = Result<RunStatistics, ConfigError>> + Send>>;

/// Load test scenario structure
///
/// Spawns simulated users built by `factory` and drives them until the run ends. A scenario is
/// a future: configure it with the [`ConfigurableScenario`] methods and `.await` it to get the
/// [`RunStatistics`].
#[pin_project::pin_project]
pub struct Scenario<T> {
    factory: T,
    runner_fut: Option<RunnerFut>,
    config: ScenarioConfig,
}

impl<T> Scenario<T> {
    pub fn new(name: &str, factory: T) -> Self {
        Self {
            factory,
            runner_fut: None,
            config: ScenarioConfig::new(name),
        }
    }
}

impl<T, U> Future for Scenario<T>
where
    T: Fn() -> U + Send + Sync + Clone + 'static,
    U: User,
{
    type Output = Result<RunStatistics, ConfigError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let runner = this.runner_fut.get_or_insert_with(|| {
            let factory = this.factory.clone();
            let config = this.config.clone();
            Box::pin(async move { run_scenario(factory, config).await })
        });

        runner.as_mut().poll(cx)
    }
}

pub trait ConfigurableScenario<T: Send>: Future<Output = T> + Sized + Send {
    fn users(self, users: usize) -> Self;
    fn spawn_rate(self, users_per_sec: u32) -> Self;
    fn duration(self, duration: Duration) -> Self;
    fn iterations(self, iterations: u64) -> Self;
    fn wait_time(self, wait_time: WaitTime) -> Self;
}

impl<T, U> ConfigurableScenario<Result<RunStatistics, ConfigError>> for Scenario<T>
where
    T: Fn() -> U + Send + Sync + Clone + 'static,
    U: User,
{
    /// Number of simulated users to start.
    ///
    /// # Example
    /// ```ignore
    /// my_scenario()
    ///     .users(50)
    ///     .duration(Duration::from_secs(120))
    ///     .await?;
    /// ```
    fn users(mut self, users: usize) -> Self {
        self.config.users = users;
        self
    }

    /// Users started per second until all of them are running.
    fn spawn_rate(mut self, users_per_sec: u32) -> Self {
        self.config.spawn_rate = users_per_sec;
        self
    }

    /// Stop every user once `duration` has elapsed.
    ///
    /// Users finish the task they are running and then run their `on_stop`.
    fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = Some(duration);
        self
    }

    /// Stop each user after it has run `iterations` tasks.
    fn iterations(mut self, iterations: u64) -> Self {
        self.config.iterations = Some(iterations);
        self
    }

    /// Override the user's own `WAIT_TIME`.
    fn wait_time(mut self, wait_time: WaitTime) -> Self {
        self.config.wait_time = Some(wait_time);
        self
    }
}
