use std::sync::Arc;

use chrono::Local;
use tracing::{error, info};

use crate::args::OutputFormat;
use crate::config::RunConfig;
use crate::dispatch::Dispatcher;
use crate::error::AppResult;
use crate::http::HttpExecutor;
use crate::report::{RunSummary, render_json, render_text, write_report};
use crate::shutdown::StopSignal;
use crate::shutdown_handlers::select_key_listener;

/// Runs one stress test against the configured target and prints the
/// summary. A failed report write is logged but does not fail the run.
pub(crate) async fn run_local(config: &RunConfig, format: OutputFormat) -> AppResult<RunSummary> {
    let executor = Arc::new(HttpExecutor::new(config)?);
    let started = Local::now();

    if config.paranoid {
        let cap = config
            .max_requests
            .map_or_else(|| "unlimited".to_owned(), |cap| cap.to_string());
        announce(
            format,
            &format!(
                "Running in PARANOID mode: concurrency={}, max_requests={}",
                config.concurrency, cap
            ),
        );
    }

    let key_listener = select_key_listener();
    if key_listener.interactive() {
        announce(format, "Press 's' to stop the test early.");
    }
    info!(
        url = %config.target,
        method = %config.method,
        concurrency = config.concurrency.get(),
        contexts = executor.contexts(),
        "Starting stress test"
    );

    let report = Dispatcher::new(config.plan(), executor, StopSignal::new())
        .with_key_listener(key_listener)
        .with_interrupt_handler(true)
        .with_progress(true)
        .run()
        .await;

    let summary = RunSummary::from_run(config, &report);
    let text = render_text(&summary);
    match format {
        OutputFormat::Text => println!("\n{}", text),
        OutputFormat::Json => println!("{}", render_json(&summary)?),
    }

    if config.save_report {
        match write_report(&config.report_dir, &text, started).await {
            Ok(path) => announce(format, &format!("\nReport saved to: {}", path.display())),
            Err(err) => error!("Failed to save report: {}", err),
        }
    }

    Ok(summary)
}

// JSON output owns stdout, so notices go to the log there.
fn announce(format: OutputFormat, message: &str) {
    match format {
        OutputFormat::Text => println!("{}", message),
        OutputFormat::Json => info!("{}", message.trim_start()),
    }
}
