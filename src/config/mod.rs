//! Validated run configuration.
mod apply;
mod types;


pub use apply::{build_run_config, host_parallelism};
pub use types::{RequestBudget, RunConfig};
