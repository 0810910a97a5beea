use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::config::RunConfig;
use crate::dispatch::DispatchReport;
use crate::metrics::MetricsSnapshot;
use crate::shutdown::StopReason;

/// Run facts that do not come from the metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryContext {
    pub target: String,
    pub method: String,
    pub concurrency: usize,
    /// `None` for runs without a request ceiling.
    pub requested: Option<u64>,
}

impl SummaryContext {
    #[must_use]
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            target: config.target.to_string(),
            method: config.method.to_string(),
            concurrency: config.concurrency.get(),
            requested: config.budget.requested(),
        }
    }
}

/// Final statistics, computed once from a frozen snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub target: String,
    pub method: String,
    pub concurrency: usize,
    pub requested: Option<u64>,
    pub completed: u64,
    pub success: u64,
    pub failure: u64,
    /// Percent of completed requests that got an HTTP response, 0..=100.
    pub success_rate: f64,
    pub status_histogram: BTreeMap<u16, u64>,
    #[serde(rename = "avg_latency_s", serialize_with = "as_secs")]
    pub avg_latency: Duration,
    #[serde(rename = "min_latency_s", serialize_with = "as_secs")]
    pub min_latency: Duration,
    #[serde(rename = "max_latency_s", serialize_with = "as_secs")]
    pub max_latency: Duration,
    #[serde(rename = "p50_latency_s", serialize_with = "as_secs")]
    pub p50_latency: Duration,
    #[serde(rename = "p90_latency_s", serialize_with = "as_secs")]
    pub p90_latency: Duration,
    #[serde(rename = "p99_latency_s", serialize_with = "as_secs")]
    pub p99_latency: Duration,
    #[serde(rename = "duration_s", serialize_with = "as_secs")]
    pub duration: Duration,
    /// Completed requests per second of wall-clock time.
    pub throughput: f64,
    /// Little's-Law estimate `throughput * avg_latency`. This is an
    /// approximation of how many requests were in flight on average, not a
    /// measured value.
    pub estimated_concurrent_users: f64,
    pub stop_reason: Option<StopReason>,
}

impl RunSummary {
    #[must_use]
    pub fn from_run(config: &RunConfig, report: &DispatchReport) -> Self {
        Self::compute(
            SummaryContext::from_config(config),
            &report.snapshot,
            report.elapsed,
            report.stop_reason,
        )
    }

    /// Latency statistics only cover successful requests; with no successes
    /// they are all zero.
    #[must_use]
    pub fn compute(
        context: SummaryContext,
        snapshot: &MetricsSnapshot,
        duration: Duration,
        stop_reason: Option<StopReason>,
    ) -> Self {
        let completed = snapshot.completed();

        let mut sorted = snapshot.latencies.clone();
        sorted.sort_unstable();
        let min_latency = sorted.first().copied().unwrap_or_default();
        let max_latency = sorted.last().copied().unwrap_or_default();
        let avg_latency = mean(&sorted);

        let success_rate = if completed > 0 {
            snapshot.success_count as f64 / completed as f64 * 100.0
        } else {
            0.0
        };
        let duration_secs = duration.as_secs_f64();
        let throughput = if duration_secs > 0.0 {
            completed as f64 / duration_secs
        } else {
            0.0
        };
        let estimated_concurrent_users = throughput * avg_latency.as_secs_f64();

        Self {
            target: context.target,
            method: context.method,
            concurrency: context.concurrency,
            requested: context.requested,
            completed,
            success: snapshot.success_count,
            failure: snapshot.failure_count,
            success_rate,
            status_histogram: snapshot.status_histogram.clone(),
            avg_latency,
            min_latency,
            max_latency,
            p50_latency: percentile(&sorted, 50),
            p90_latency: percentile(&sorted, 90),
            p99_latency: percentile(&sorted, 99),
            duration,
            throughput,
            estimated_concurrent_users,
            stop_reason,
        }
    }
}

// Averaged in whole nanoseconds so equal samples give back the same value.
fn mean(values: &[Duration]) -> Duration {
    let count = u128::try_from(values.len()).unwrap_or(u128::MAX);
    let total: u128 = values
        .iter()
        .fold(0u128, |acc, value| acc.saturating_add(value.as_nanos()));
    let nanos = total.checked_div(count).unwrap_or(0);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

fn percentile(sorted: &[Duration], percentile: u64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let count = u64::try_from(sorted.len().saturating_sub(1)).unwrap_or(u64::MAX);
    let index = percentile
        .saturating_mul(count)
        .saturating_add(50)
        .checked_div(100)
        .unwrap_or(0);
    let idx = usize::try_from(index).unwrap_or_else(|_| sorted.len().saturating_sub(1));
    sorted.get(idx).copied().unwrap_or_default()
}

fn as_secs<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(value.as_secs_f64())
}
