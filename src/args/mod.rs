//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use cli::{CommonArgs, LiteArgs, OutputArgs, TesterArgs};
pub use types::OutputFormat;

pub(crate) use defaults::DEFAULT_USER_AGENT;
