//! Core library for the `strike` and `strike-lite` CLIs.
//!
//! The crate drives a bounded pool of concurrent HTTP requests against one
//! target in batches, records every outcome, and turns the result into a
//! throughput and latency summary. Both binaries are thin front ends over
//! [`entry`]; library APIs may evolve as the CLI grows.
mod app;
pub mod args;
pub mod config;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod progress;
pub mod report;
pub mod shutdown;
pub mod shutdown_handlers;
