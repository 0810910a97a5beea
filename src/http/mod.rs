//! HTTP transport: one request per call over pooled clients.
mod executor;


pub use executor::{HttpExecutor, Job, RequestExecutor};
