use std::num::{NonZeroU64, NonZeroUsize};
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::HeaderMap;
use url::Url;

use crate::dispatch::DispatchPlan;

/// How many requests a run may submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestBudget {
    Fixed(NonZeroU64),
    /// Paranoid mode without a cap: runs until interrupted.
    Unbounded,
}

impl RequestBudget {
    #[must_use]
    pub const fn limit(self) -> u64 {
        match self {
            Self::Fixed(total) => total.get(),
            Self::Unbounded => u64::MAX,
        }
    }

    /// `None` when unbounded.
    #[must_use]
    pub const fn requested(self) -> Option<u64> {
        match self {
            Self::Fixed(total) => Some(total.get()),
            Self::Unbounded => None,
        }
    }
}

/// Immutable settings for one run. Only built through
/// [`build_run_config`](super::build_run_config), so counts and the timeout
/// are always positive.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target: Url,
    pub method: Method,
    pub budget: RequestBudget,
    pub concurrency: NonZeroUsize,
    pub timeout: Duration,
    pub body: Option<String>,
    pub headers: HeaderMap,
    pub paranoid: bool,
    pub max_requests: Option<NonZeroU64>,
    pub save_report: bool,
    pub report_dir: PathBuf,
}

impl RunConfig {
    #[must_use]
    pub const fn plan(&self) -> DispatchPlan {
        DispatchPlan {
            budget: self.budget,
            concurrency: self.concurrency,
            max_requests: self.max_requests,
        }
    }
}
