use std::time::Duration;

use reqwest::Method;

use crate::error::ValidationError;

const SECS_PER_MINUTE: f64 = 60.0;
const SECS_PER_HOUR: f64 = 3600.0;
const MILLIS_PER_SEC: f64 = 1000.0;

pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.trim().to_owned()))
        }
        Some(_) | None => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}

/// Accepts any HTTP method token; the name is upper-cased first.
pub(crate) fn parse_method(s: &str) -> Result<Method, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::MethodEmpty);
    }
    Method::from_bytes(value.to_ascii_uppercase().as_bytes()).map_err(|_invalid| {
        ValidationError::InvalidMethod {
            value: value.to_owned(),
        }
    })
}

/// Parses `10`, `2.5`, `250ms`, `3s`, `1m`, or `1h`. A bare number is seconds.
pub(crate) fn parse_timeout(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::TimeoutEmpty);
    }

    let split = value
        .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
        .unwrap_or(value.len());
    let (num_part, unit_part) = value.split_at(split);
    if num_part.is_empty() {
        return Err(ValidationError::InvalidTimeout {
            value: value.to_owned(),
        });
    }
    let number: f64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidTimeoutNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let secs = match unit_part {
        "" | "s" => number,
        "ms" => number / MILLIS_PER_SEC,
        "m" => number * SECS_PER_MINUTE,
        "h" => number * SECS_PER_HOUR,
        other => {
            return Err(ValidationError::InvalidTimeoutUnit {
                unit: other.to_owned(),
            });
        }
    };

    let duration =
        Duration::try_from_secs_f64(secs).map_err(|_overflow| ValidationError::InvalidTimeout {
            value: value.to_owned(),
        })?;
    if duration.is_zero() {
        return Err(ValidationError::TimeoutZero);
    }
    Ok(duration)
}
