use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Outcome counts and latency quantiles for a single transaction label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionStatistics {
    pub success: u64,
    pub error: u64,
    pub latency_p50: Duration,
    pub latency_p90: Duration,
    pub latency_p99: Duration,
}

impl TransactionStatistics {
    pub fn total(&self) -> u64 {
        self.success + self.error
    }

    pub fn error_rate(&self) -> f64 {
        if self.total() == 0 {
            0.
        } else {
            self.error as f64 / self.total() as f64
        }
    }
}

/// Run Statistics for a given Scenario
///
/// Aggregated once every simulated user has stopped. Transactions are keyed by the label the
/// `#[transaction]` macro assigned them (the function name).
#[derive(Clone, Debug, Default)]
pub struct RunStatistics {
    pub name: String,
    pub users: usize,
    pub iterations: u64,
    pub elapsed: Duration,
    pub transactions: BTreeMap<&'static str, TransactionStatistics>,
}

impl RunStatistics {
    pub fn total_success(&self) -> u64 {
        self.transactions.values().map(|t| t.success).sum()
    }

    pub fn total_error(&self) -> u64 {
        self.transactions.values().map(|t| t.error).sum()
    }

    pub fn total(&self) -> u64 {
        self.total_success() + self.total_error()
    }

    pub fn error_rate(&self) -> f64 {
        if self.total() == 0 {
            0.
        } else {
            self.total_error() as f64 / self.total() as f64
        }
    }

    /// Transactions completed per second over the whole run.
    pub fn tps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0. {
            0.
        } else {
            self.total() as f64 / secs
        }
    }

    pub fn transaction(&self, label: &str) -> Option<&TransactionStatistics> {
        self.transactions.get(label)
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} users, {} iterations in {} (TPS={:.2}, ErrorRate={:.2})",
            self.name,
            self.users,
            self.iterations,
            humantime::format_duration(round_millis(self.elapsed)),
            self.tps(),
            self.error_rate(),
        )?;
        writeln!(
            f,
            "{:<32} {:>8} {:>8} {:>10} {:>10} {:>10}",
            "transaction", "ok", "err", "p50", "p90", "p99"
        )?;
        for (label, stats) in &self.transactions {
            writeln!(
                f,
                "{:<32} {:>8} {:>8} {:>10} {:>10} {:>10}",
                label,
                stats.success,
                stats.error,
                humantime::format_duration(round_millis(stats.latency_p50)).to_string(),
                humantime::format_duration(round_millis(stats.latency_p90)).to_string(),
                humantime::format_duration(round_millis(stats.latency_p99)).to_string(),
            )?;
        }
        Ok(())
    }
}

fn round_millis(dur: Duration) -> Duration {
    Duration::from_millis(dur.as_millis() as u64)
}
