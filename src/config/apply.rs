use std::num::{NonZeroU64, NonZeroUsize};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;
use url::Url;

use crate::args::{CommonArgs, OutputArgs};
use crate::error::{AppError, AppResult, HttpError, ValidationError};

use super::types::{RequestBudget, RunConfig};

/// Worker count used by paranoid mode.
#[must_use]
pub fn host_parallelism() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Validates raw CLI values and resolves paranoid mode.
///
/// `requests` and `concurrency` must be positive even in paranoid mode,
/// where they are then replaced.
///
/// # Errors
///
/// Returns an error for non-positive counts, a negative cap, an invalid URL,
/// or a malformed header.
pub fn build_run_config(
    common: &CommonArgs,
    output: &OutputArgs,
    parallelism: NonZeroUsize,
) -> AppResult<RunConfig> {
    let requests = u64::try_from(common.requests)
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or(ValidationError::RequestsNotPositive {
            value: common.requests,
        })?;
    let concurrency = usize::try_from(common.concurrency)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or(ValidationError::ConcurrencyNotPositive {
            value: common.concurrency,
        })?;
    let max_requests = u64::try_from(common.max_requests).map_err(|_negative| {
        ValidationError::MaxRequestsNegative {
            value: common.max_requests,
        }
    })?;
    let max_requests = NonZeroU64::new(max_requests);

    let target = parse_target(&common.url)?;
    let headers = build_headers(&common.headers)?;

    let (budget, concurrency, max_requests) = if common.paranoid {
        let budget = max_requests.map_or(RequestBudget::Unbounded, RequestBudget::Fixed);
        (budget, parallelism, max_requests)
    } else {
        if max_requests.is_some() {
            warn!("--max-requests only applies with --paranoid; ignoring it.");
        }
        (RequestBudget::Fixed(requests), concurrency, None)
    };

    Ok(RunConfig {
        target,
        method: common.method.clone(),
        budget,
        concurrency,
        timeout: common.timeout,
        body: common.data.clone(),
        headers,
        paranoid: common.paranoid,
        max_requests,
        save_report: output.report,
        report_dir: output.report_dir.clone(),
    })
}

fn parse_target(raw: &str) -> AppResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(ValidationError::MissingUrl));
    }
    let url = Url::parse(trimmed).map_err(|source| HttpError::InvalidUrl {
        url: trimmed.to_owned(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::http(HttpError::UnsupportedScheme {
            scheme: other.to_owned(),
        })),
    }
}

fn build_headers(pairs: &[(String, String)]) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        let name =
            HeaderName::from_bytes(key.as_bytes()).map_err(|source| HttpError::InvalidHeaderName {
                name: key.clone(),
                source,
            })?;
        let val = HeaderValue::from_str(value).map_err(|source| HttpError::InvalidHeaderValue {
            name: key.clone(),
            source,
        })?;
        headers.append(name, val);
    }
    Ok(headers)
}
