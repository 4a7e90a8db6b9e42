use crate::transaction::TRANSACTION_HOOK;
use carga_core::{TransactionStatistics, REPORTED_QUANTILES};
use metrics_util::AtomicBucket;
use pdatastructs::tdigest::{TDigest, K1};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, PoisonError, RwLock,
};
use std::time::Duration;
use tracing::error;

const TDIGEST_BACKLOG_SIZE: usize = 100;

/// Collects transaction outcomes for every simulated user of a scenario.
///
/// Cloning is cheap and every clone records into the same tables. Users pick up the recorder
/// through a task-local installed by [`Recorder::scope`].
#[derive(Clone, Default)]
pub struct Recorder {
    transactions: Arc<RwLock<HashMap<&'static str, Arc<TransactionCounters>>>>,
}

struct TransactionCounters {
    success: AtomicU64,
    error: AtomicU64,
    latency: AtomicBucket<Duration>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `fut` with this recorder installed as the transaction hook.
    pub fn scope<F: Future>(&self, fut: F) -> impl Future<Output = F::Output> {
        TRANSACTION_HOOK.scope(self.clone(), fut)
    }

    pub fn record(&self, label: &'static str, success: bool, elapsed: Duration) {
        let counters = self.counters(label);
        if success {
            counters.success.fetch_add(1, Ordering::Relaxed);
        } else {
            counters.error.fetch_add(1, Ordering::Relaxed);
        }
        counters.latency.push(elapsed);
    }

    /// Number of transactions recorded so far, across all labels.
    pub fn total(&self) -> u64 {
        self.transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|c| c.success.load(Ordering::Relaxed) + c.error.load(Ordering::Relaxed))
            .sum()
    }

    pub fn statistics(&self) -> BTreeMap<&'static str, TransactionStatistics> {
        self.transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(label, counters)| (*label, counters.statistics()))
            .collect()
    }

    fn counters(&self, label: &'static str) -> Arc<TransactionCounters> {
        if let Some(counters) = self
            .transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(label)
        {
            return counters.clone();
        }

        self.transactions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(label)
            .or_insert_with(|| Arc::new(TransactionCounters::new()))
            .clone()
    }
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("total", &self.total())
            .finish()
    }
}

impl TransactionCounters {
    fn new() -> Self {
        Self {
            success: AtomicU64::new(0),
            error: AtomicU64::new(0),
            latency: AtomicBucket::new(),
        }
    }

    fn statistics(&self) -> TransactionStatistics {
        let mut digest = TDigest::new(K1::new(10.), TDIGEST_BACKLOG_SIZE);
        let mut samples = 0usize;
        self.latency.data_with(|chunk| {
            for latency in chunk {
                digest.insert(latency.as_secs_f64());
                samples += 1;
            }
        });

        let [p50, p90, p99] = REPORTED_QUANTILES.map(|q| quantile(&digest, samples, q));
        TransactionStatistics {
            success: self.success.load(Ordering::Relaxed),
            error: self.error.load(Ordering::Relaxed),
            latency_p50: p50,
            latency_p90: p90,
            latency_p99: p99,
        }
    }
}

fn quantile(digest: &TDigest<K1>, samples: usize, q: f64) -> Duration {
    if samples == 0 {
        return Duration::ZERO;
    }

    let secs = digest.quantile(q);
    if secs.is_finite() && secs >= 0. {
        Duration::from_secs_f64(secs)
    } else {
        error!("Invalid latency quantile {q} computed from {samples} samples.");
        Duration::ZERO
    }
}
