use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser};
use reqwest::Method;

use super::defaults::{
    DEFAULT_CONCURRENCY, DEFAULT_METHOD, DEFAULT_REPORT_DIR, DEFAULT_REQUESTS, DEFAULT_TIMEOUT,
    DEFAULT_URL,
};
use super::parsers::{parse_header, parse_method, parse_timeout};
use super::types::OutputFormat;

/// Flags shared by every front end.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Target URL to hit
    #[arg(long, short, env = "STRESS_TARGET_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Total number of requests to send
    #[arg(
        long,
        short = 'r',
        env = "STRESS_TOTAL_REQUESTS",
        default_value_t = DEFAULT_REQUESTS,
        allow_negative_numbers = true
    )]
    pub requests: i64,

    /// Number of concurrent workers (one pooled connection context each)
    #[arg(
        long,
        short = 'c',
        env = "STRESS_CONCURRENCY",
        default_value_t = DEFAULT_CONCURRENCY,
        allow_negative_numbers = true
    )]
    pub concurrency: i64,

    /// Per-request timeout in seconds (fractions allowed) or with a ms/s/m/h suffix
    #[arg(
        long,
        short = 't',
        default_value = DEFAULT_TIMEOUT,
        value_parser = parse_timeout,
        allow_negative_numbers = true
    )]
    pub timeout: Duration,

    /// HTTP method to use
    #[arg(long, short = 'm', default_value = DEFAULT_METHOD, value_parser = parse_method)]
    pub method: Method,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Use every CPU core as a worker and keep sending until interrupted or --max-requests is reached
    #[arg(long)]
    pub paranoid: bool,

    /// Request cap for paranoid mode; 0 means unlimited until interrupted
    #[arg(long = "max-requests", default_value_t = 0, allow_negative_numbers = true)]
    pub max_requests: i64,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Output flags only the full front end exposes.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Save the summary to a timestamped stress_test_*.log file
    #[arg(long)]
    pub report: bool,

    /// Directory for the saved report
    #[arg(long = "report-dir", default_value = DEFAULT_REPORT_DIR)]
    pub report_dir: PathBuf,

    /// Summary format printed to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Default for OutputArgs {
    fn default() -> Self {
        Self {
            report: false,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            format: OutputFormat::Text,
        }
    }
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "strike",
    version,
    about = "Concurrent HTTP stress tester with a live progress line, press-s-to-stop, and throughput summaries."
)]
pub struct TesterArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "strike-lite",
    version,
    about = "Concurrent HTTP stress tester (summary to stdout only)."
)]
pub struct LiteArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}
