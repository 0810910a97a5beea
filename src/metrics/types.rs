use std::collections::BTreeMap;
use std::time::Duration;

/// Result of one request attempt.
///
/// `succeeded` means an HTTP exchange completed, whatever the status code.
/// Transport failures carry an error message and no status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub succeeded: bool,
    pub status_code: Option<u16>,
    pub elapsed: Duration,
    pub error_message: Option<String>,
}

impl RequestOutcome {
    #[must_use]
    pub const fn success(status_code: u16, elapsed: Duration) -> Self {
        Self {
            succeeded: true,
            status_code: Some(status_code),
            elapsed,
            error_message: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>, elapsed: Duration) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            "unknown transport error".to_owned()
        } else {
            message
        };
        Self {
            succeeded: false,
            status_code: None,
            elapsed,
            error_message: Some(message),
        }
    }

    /// Outcome for a worker task that died before producing a result.
    #[must_use]
    pub fn fault(description: impl Into<String>) -> Self {
        Self::failure(description, Duration::ZERO)
    }
}

/// Point-in-time copy of the accumulated metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub success_count: u64,
    pub failure_count: u64,
    /// Successful-request latencies in completion order.
    pub latencies: Vec<Duration>,
    pub status_histogram: BTreeMap<u16, u64>,
}

impl MetricsSnapshot {
    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.success_count.saturating_add(self.failure_count)
    }
}
