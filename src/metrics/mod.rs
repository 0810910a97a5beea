//! Per-request outcomes and the run-scoped metrics accumulator.
mod accumulator;
mod types;

#[cfg(test)]
mod tests;

pub use accumulator::MetricsAccumulator;
pub use types::{MetricsSnapshot, RequestOutcome};
