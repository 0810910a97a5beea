//! Process entry points shared by the `strike` and `strike-lite` binaries.
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use crate::app::run_local;
use crate::args::{CommonArgs, LiteArgs, OutputArgs, TesterArgs};
use crate::config::{build_run_config, host_parallelism};
use crate::error::AppResult;
use crate::logger::init_logging;

/// Exit status for rejected configuration.
const EXIT_CONFIG: u8 = 2;
/// Exit status for failures after the run was configured.
const EXIT_RUNTIME: u8 = 1;

/// Full front end: report file and output format options included.
#[must_use]
pub fn run() -> ExitCode {
    let args = TesterArgs::parse();
    execute(&args.common, &args.output)
}

/// Minimal front end: prints the text summary and never writes a report.
#[must_use]
pub fn run_lite() -> ExitCode {
    let args = LiteArgs::parse();
    execute(&args.common, &OutputArgs::default())
}

fn execute(common: &CommonArgs, output: &OutputArgs) -> ExitCode {
    init_logging(common.verbose);

    let config = match build_run_config(common, output, host_parallelism()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let format = output.format;
    let result: AppResult<()> = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(Into::into)
        .and_then(|runtime| runtime.block_on(run_local(&config, format)).map(drop));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Stress test failed: {}", err);
            ExitCode::from(EXIT_RUNTIME)
        }
    }
}
