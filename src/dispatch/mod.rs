//! Batch-submit-then-drain request dispatch.
//!
//! A run moves through `Idle -> Submitting -> Draining -> Done`. Work is
//! submitted in batches of `max(1, concurrency * 5)` tasks, and every task of
//! a batch is awaited before the next batch is considered, so at most one
//! batch of task handles is alive at a time. Parallelism inside a batch is
//! bounded by a semaphore with `concurrency` permits. The stop signal is
//! checked between batches; once it is set nothing new is submitted, but
//! everything already submitted runs to completion and is recorded.
mod plan;
mod runner;


pub use plan::DispatchPlan;
pub use runner::{DispatchReport, Dispatcher};
