pub(crate) const DEFAULT_USER_AGENT: &str = concat!("strike/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_URL: &str = "https://example.com";
pub(crate) const DEFAULT_REQUESTS: i64 = 100;
pub(crate) const DEFAULT_CONCURRENCY: i64 = 10;
pub(crate) const DEFAULT_TIMEOUT: &str = "10";
pub(crate) const DEFAULT_METHOD: &str = "GET";
pub(crate) const DEFAULT_REPORT_DIR: &str = ".";

