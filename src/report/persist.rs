use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::ReportError;

pub const REPORT_PREFIX: &str = "stress_test_";
const REPORT_EXTENSION: &str = "log";
const MAX_NAME_ATTEMPTS: u32 = 1_000;

/// `stress_test_YYYYMMDD_HHMMSS.log`, with `_N` appended for the N-th
/// collision within the same second.
#[must_use]
pub fn report_file_name(started: &DateTime<Local>, attempt: u32) -> String {
    let stamp = started.format("%Y%m%d_%H%M%S");
    if attempt == 0 {
        format!("{}{}.{}", REPORT_PREFIX, stamp, REPORT_EXTENSION)
    } else {
        format!("{}{}_{}.{}", REPORT_PREFIX, stamp, attempt, REPORT_EXTENSION)
    }
}

/// Writes `text` plus a trailing newline to a fresh file under `dir`.
/// Existing reports are never overwritten.
///
/// # Errors
///
/// Returns an error when no free name is found or the file cannot be
/// created or written.
pub async fn write_report(
    dir: &Path,
    text: &str,
    started: DateTime<Local>,
) -> Result<PathBuf, ReportError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(report_file_name(&started, attempt));
        let file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                debug!("Report {} exists; trying next name.", path.display());
                continue;
            }
            Err(source) => return Err(ReportError::Create { path, source }),
        };

        let mut writer = BufWriter::new(file);
        let written = async {
            writer.write_all(text.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;
        return match written {
            Ok(()) => Ok(path),
            Err(source) => Err(ReportError::Write { path, source }),
        };
    }

    Err(ReportError::NameExhausted {
        dir: dir.to_path_buf(),
        attempts: MAX_NAME_ATTEMPTS,
    })
}
