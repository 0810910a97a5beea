//! Derived run statistics, their text/JSON rendering, and the optional
//! persisted report.
mod persist;
mod render;
mod summary;


pub use persist::{REPORT_PREFIX, report_file_name, write_report};
pub use render::{render_json, render_text};
pub use summary::{RunSummary, SummaryContext};
