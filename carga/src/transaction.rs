use crate::Recorder;
use std::future::Future;
use std::time::{Duration, Instant};

/// Transaction hook used by the `#[transaction]` macro. Not intended to be used manually.
pub async fn transaction_hook<T, R, E>(label: &'static str, func: T) -> T::Output
where
    T: Future<Output = Result<R, E>>,
{
    if let Ok(recorder) = TRANSACTION_HOOK.try_with(|v| v.clone()) {
        let start = Instant::now();
        let res = func.await;
        let elapsed = start.elapsed();

        recorder.record(label, res.is_ok(), elapsed);
        emit_metrics(label, res.is_ok(), elapsed);

        res
    } else {
        tracing::warn!("No hook available for transaction {label}.");
        func.await
    }
}

#[cfg(feature = "metrics")]
fn emit_metrics(label: &'static str, success: bool, elapsed: Duration) {
    metrics::histogram!("carga_transaction_latency", "transaction" => label)
        .record(elapsed.as_secs_f64());

    if success {
        metrics::counter!("carga_transaction_success", "transaction" => label).increment(1);
    } else {
        metrics::counter!("carga_transaction_error", "transaction" => label).increment(1);
    }
}

#[cfg(not(feature = "metrics"))]
fn emit_metrics(_label: &'static str, _success: bool, _elapsed: Duration) {}

tokio::task_local! {
    pub(crate) static TRANSACTION_HOOK: Recorder;
}
