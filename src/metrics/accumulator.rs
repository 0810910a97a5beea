use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{MetricsSnapshot, RequestOutcome};

/// Thread-safe sink for request outcomes.
///
/// All mutation goes through [`MetricsAccumulator::record`] under one lock;
/// callers never see the inner state directly.
#[derive(Debug, Default)]
pub struct MetricsAccumulator {
    state: Mutex<MetricsSnapshot>,
}

impl MetricsAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: RequestOutcome) {
        let mut state = self.lock();
        if outcome.succeeded {
            state.success_count = state.success_count.saturating_add(1);
            state.latencies.push(outcome.elapsed);
            if let Some(status) = outcome.status_code {
                let entry = state.status_histogram.entry(status).or_insert(0);
                *entry = entry.saturating_add(1);
            }
        } else {
            state.failure_count = state.failure_count.saturating_add(1);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.lock().clone()
    }

    // A panic while holding the lock cannot leave the counters half-updated,
    // so a poisoned lock is still safe to read.
    fn lock(&self) -> MutexGuard<'_, MetricsSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
