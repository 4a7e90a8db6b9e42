use crate::user::{has_tasks, pick_task, pick_wait};
use crate::{Recorder, User};
use carga_core::{ConfigError, RunStatistics, ScenarioConfig, WaitTime};
use governor::{Quota, RateLimiter};
use humantime::format_duration;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, error, info, info_span, instrument, trace, warn, Instrument};

#[instrument(name="scenario", skip_all, fields(name=config.name))]
pub(crate) async fn run_scenario<T, U>(
    factory: T,
    config: ScenarioConfig,
) -> Result<RunStatistics, ConfigError>
where
    T: Fn() -> U + Send + Sync + 'static,
    U: User,
{
    let (users, spawn_rate) = config.validate()?;
    if !has_tasks::<U>() {
        return Err(ConfigError::NoTasks);
    }
    let wait = config.wait_time.unwrap_or(U::WAIT_TIME);
    wait.validate()?;

    info!("Running {} with config {:?}", config.name, &config);
    if config.is_unbounded() {
        info!("No run time or iteration limit set; stop with Ctrl-C.");
    }

    let start = Instant::now();
    let recorder = Recorder::new();
    let (stop_tx, stop_rx) = watch::channel(false);
    // NOTE: A burst of 1 spreads user starts evenly across each second.
    let limiter =
        RateLimiter::direct(Quota::per_second(spawn_rate).allow_burst(NonZeroU32::MIN));

    let stop = stop_signal(config.duration);
    tokio::pin!(stop);
    let mut stopped = false;

    let mut swarm = JoinSet::new();
    for index in 0..users.get() {
        tokio::select! {
            _ = &mut stop => {
                stopped = true;
                let _ = stop_tx.send(true);
                warn!("Run ended while spawning; {index} of {users} users started.");
                break;
            }
            _ = limiter.until_ready() => {}
        }

        let user = factory();
        let runner = recorder.scope(run_user(index, user, wait, config.iterations, stop_rx.clone()));
        swarm.spawn(runner.instrument(info_span!("user", index)));
    }

    if !stopped {
        info!("All {users} users spawned in {}", format_duration(round(start.elapsed())));
    }

    let mut iterations = 0;
    loop {
        tokio::select! {
            _ = &mut stop, if !stopped => {
                stopped = true;
                info!("Stopping {} users", swarm.len());
                let _ = stop_tx.send(true);
            }
            joined = swarm.join_next() => match joined {
                Some(Ok(count)) => iterations += count,
                Some(Err(err)) => error!("Simulated user failed: {err}"),
                None => break,
            },
        }
    }

    info!("Scenario complete");

    Ok(RunStatistics {
        name: config.name.clone(),
        users: users.get(),
        iterations,
        elapsed: start.elapsed(),
        transactions: recorder.statistics(),
    })
}

async fn run_user<U: User>(
    index: usize,
    mut user: U,
    wait: WaitTime,
    iterations: Option<u64>,
    mut stop: watch::Receiver<bool>,
) -> u64 {
    debug!("Starting user {index}");
    user.on_start().await;

    let mut count = 0;
    while !is_stopping(&stop) && iterations.map_or(true, |max| count < max) {
        let task = {
            let mut rng = rand::thread_rng();
            pick_task::<U, _>(&mut rng)
        };
        let Some(task) = task else {
            break;
        };

        trace!("Running {task:?}");
        user.run(task).await;
        count += 1;

        if iterations.is_some_and(|max| count >= max) {
            break;
        }

        let pause = {
            let mut rng = rand::thread_rng();
            pick_wait(&wait, &mut rng)
        };
        tokio::select! {
            _ = tokio::time::sleep(pause) => {}
            _ = stop.changed() => {}
        }
    }

    user.on_stop().await;
    debug!("User {index} stopped after {count} iterations");
    count
}

fn is_stopping(stop: &watch::Receiver<bool>) -> bool {
    *stop.borrow()
}

/// Resolves when the configured run time has elapsed or the process receives Ctrl-C.
async fn stop_signal(duration: Option<Duration>) {
    let elapsed = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(elapsed);

    tokio::select! {
        _ = &mut elapsed => {
            if let Some(duration) = duration {
                info!("Run time of {} elapsed", format_duration(duration));
            }
        }
        res = tokio::signal::ctrl_c() => match res {
            Ok(()) => warn!("Interrupted; stopping users"),
            Err(err) => {
                error!("Unable to listen for Ctrl-C: {err}");
                elapsed.await;
            }
        },
    }
}

fn round(dur: Duration) -> Duration {
    Duration::from_millis(dur.as_millis() as u64)
}
