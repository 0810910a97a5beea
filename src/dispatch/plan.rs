use std::num::{NonZeroU64, NonZeroUsize};

use crate::config::RequestBudget;

/// Tasks submitted per worker slot in each batch.
const BATCH_FACTOR: u64 = 5;

/// The subset of the run configuration the dispatcher needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPlan {
    pub budget: RequestBudget,
    pub concurrency: NonZeroUsize,
    pub max_requests: Option<NonZeroU64>,
}

impl DispatchPlan {
    /// Total number of tasks this plan may submit.
    #[must_use]
    pub fn limit(&self) -> u64 {
        let budget = self.budget.limit();
        self.max_requests
            .map_or(budget, |cap| budget.min(cap.get()))
    }

    #[must_use]
    pub fn batch_size(&self) -> u64 {
        u64::try_from(self.concurrency.get())
            .unwrap_or(u64::MAX)
            .saturating_mul(BATCH_FACTOR)
            .max(1)
    }

    /// Connection context for a task, assigned round-robin.
    #[must_use]
    pub fn slot_for(&self, index: u64) -> usize {
        let contexts = u64::try_from(self.concurrency.get()).unwrap_or(u64::MAX);
        index
            .checked_rem(contexts)
            .and_then(|slot| usize::try_from(slot).ok())
            .unwrap_or(0)
    }

    pub(crate) fn cap_reached(&self, submitted: u64) -> bool {
        self.max_requests
            .is_some_and(|cap| submitted >= cap.get())
    }
}
