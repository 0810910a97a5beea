use crate::error::AppResult;

use super::RunSummary;

/// Multi-line human-readable summary, without a trailing newline.
#[must_use]
pub fn render_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    let requested = summary
        .requested
        .map_or_else(|| "unlimited".to_owned(), |value| value.to_string());

    let lines = [
        "Stress test summary:".to_owned(),
        format!("  Target URL:  {}", summary.target),
        format!("  Method:      {}", summary.method),
        format!(
            "  Configured Concurrency: {} (Simulated Users)",
            summary.concurrency
        ),
        format!("  Requested:   {}", requested),
        format!("  Completed:   {}", summary.completed),
        format!(
            "  Success:     {} ({:.1}%)",
            summary.success, summary.success_rate
        ),
        format!("  Failure:     {}", summary.failure),
        format!("  Status codes: {}", render_histogram(summary)),
        format!("  Duration:    {:.2}s", summary.duration.as_secs_f64()),
        format!("  Requests/s:  {:.2}", summary.throughput),
        format!(
            "  Latency (s): avg={:.4} min={:.4} max={:.4}",
            summary.avg_latency.as_secs_f64(),
            summary.min_latency.as_secs_f64(),
            summary.max_latency.as_secs_f64()
        ),
        format!(
            "  Latency percentiles (s): p50={:.4} p90={:.4} p99={:.4}",
            summary.p50_latency.as_secs_f64(),
            summary.p90_latency.as_secs_f64(),
            summary.p99_latency.as_secs_f64()
        ),
        format!(
            "  Estimated Avg. Concurrent Users: {:.2} (Little's Law estimate: throughput x avg latency)",
            summary.estimated_concurrent_users
        ),
    ];
    out.push_str(&lines.join("\n"));

    if let Some(reason) = summary.stop_reason {
        out.push_str("\n  Stopped:     ");
        out.push_str(reason.as_str());
    }
    out
}

/// Pretty-printed JSON document with the same facts as the text summary.
///
/// # Errors
///
/// Returns an error when serialization fails.
pub fn render_json(summary: &RunSummary) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

fn render_histogram(summary: &RunSummary) -> String {
    let entries: Vec<String> = summary
        .status_histogram
        .iter()
        .map(|(code, count)| format!("{}: {}", code, count))
        .collect();
    format!("{{{}}}", entries.join(", "))
}
