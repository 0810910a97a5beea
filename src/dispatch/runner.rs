use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::http::{Job, RequestExecutor};
use crate::metrics::{MetricsAccumulator, MetricsSnapshot, RequestOutcome};
use crate::progress::{ProgressCounter, setup_progress_indicator};
use crate::shutdown::{StopReason, StopSignal};
use crate::shutdown_handlers::{
    KeyListener, NoopKeyListener, setup_interrupt_handler, shutdown_channel,
};

use super::DispatchPlan;

/// What a finished run hands to the reporter.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub snapshot: MetricsSnapshot,
    pub elapsed: Duration,
    /// Tasks submitted; every one of them is in `snapshot`.
    pub submitted: u64,
    /// `None` when the run used its whole budget without being stopped.
    pub stop_reason: Option<StopReason>,
}

pub struct Dispatcher {
    plan: DispatchPlan,
    executor: Arc<dyn RequestExecutor>,
    signal: StopSignal,
    key_listener: Arc<dyn KeyListener>,
    handle_interrupts: bool,
    show_progress: bool,
}

impl Dispatcher {
    /// A dispatcher with no background activities: no key listener, no
    /// interrupt handler, no progress line.
    #[must_use]
    pub fn new(
        plan: DispatchPlan,
        executor: Arc<dyn RequestExecutor>,
        signal: StopSignal,
    ) -> Self {
        Self {
            plan,
            executor,
            signal,
            key_listener: Arc::new(NoopKeyListener),
            handle_interrupts: false,
            show_progress: false,
        }
    }

    #[must_use]
    pub fn with_key_listener(mut self, key_listener: Arc<dyn KeyListener>) -> Self {
        self.key_listener = key_listener;
        self
    }

    #[must_use]
    pub const fn with_interrupt_handler(mut self, enabled: bool) -> Self {
        self.handle_interrupts = enabled;
        self
    }

    #[must_use]
    pub const fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub async fn run(self) -> DispatchReport {
        let Self {
            plan,
            executor,
            signal,
            key_listener,
            handle_interrupts,
            show_progress,
        } = self;

        let accumulator = Arc::new(MetricsAccumulator::new());
        let permits = Arc::new(Semaphore::new(plan.concurrency.get()));
        let progress = ProgressCounter::new(plan.budget.requested());
        let (shutdown_tx, _) = shutdown_channel();

        let mut background = vec![key_listener.spawn(&signal, &shutdown_tx)];
        if handle_interrupts {
            background.push(setup_interrupt_handler(&signal, &shutdown_tx));
        }
        let run_start = Instant::now();
        if show_progress {
            background.push(setup_progress_indicator(&progress, run_start, &shutdown_tx));
        }

        let limit = plan.limit();
        let batch_size = plan.batch_size();
        let mut submitted: u64 = 0;
        debug!(limit, batch_size, "dispatch: submitting");

        while submitted < limit && !signal.is_set() {
            let take = batch_size.min(limit.saturating_sub(submitted));
            let end = submitted.saturating_add(take);
            let batch: Vec<JoinHandle<()>> = (submitted..end)
                .map(|index| {
                    spawn_job(
                        Job {
                            index,
                            slot: plan.slot_for(index),
                        },
                        &executor,
                        &permits,
                        &accumulator,
                        &progress,
                    )
                })
                .collect();
            submitted = end;

            drain_batch(batch, &accumulator, &progress).await;

            if plan.cap_reached(submitted) && signal.trigger(StopReason::RequestCap) {
                debug!(submitted, "dispatch: request cap reached");
            }
        }

        let elapsed = run_start.elapsed();
        debug!(submitted, ?elapsed, "dispatch: drained");

        drop(shutdown_tx.send(()));
        for handle in background {
            if let Err(err) = handle.await {
                debug!("Background task ended abnormally: {}", err);
            }
        }

        DispatchReport {
            snapshot: accumulator.snapshot(),
            elapsed,
            submitted,
            stop_reason: signal.reason(),
        }
    }
}

fn spawn_job(
    job: Job,
    executor: &Arc<dyn RequestExecutor>,
    permits: &Arc<Semaphore>,
    accumulator: &Arc<MetricsAccumulator>,
    progress: &ProgressCounter,
) -> JoinHandle<()> {
    let executor = Arc::clone(executor);
    let permits = Arc::clone(permits);
    let accumulator = Arc::clone(accumulator);
    let progress = progress.clone();

    tokio::spawn(async move {
        let outcome = match permits.acquire_owned().await {
            Ok(_permit) => executor.execute(job).await,
            Err(err) => RequestOutcome::fault(format!("worker pool closed: {}", err)),
        };
        accumulator.record(outcome);
        progress.advance();
    })
}

/// Awaits every task of the batch. A task that died before recording its
/// outcome is recorded here as a failure so the counts stay complete.
async fn drain_batch(
    batch: Vec<JoinHandle<()>>,
    accumulator: &MetricsAccumulator,
    progress: &ProgressCounter,
) {
    for result in join_all(batch).await {
        if let Err(err) = result {
            warn!("Request task failed: {}", err);
            accumulator.record(RequestOutcome::fault(describe_fault(&err)));
            progress.advance();
        }
    }
}

fn describe_fault(err: &JoinError) -> String {
    if err.is_panic() {
        format!("worker panicked: {}", err)
    } else {
        format!("worker cancelled: {}", err)
    }
}
