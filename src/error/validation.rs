use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("--requests must be > 0 (got {value}).")]
    RequestsNotPositive { value: i64 },
    #[error("--concurrency must be > 0 (got {value}).")]
    ConcurrencyNotPositive { value: i64 },
    #[error("--max-requests must be >= 0 (got {value}).")]
    MaxRequestsNegative { value: i64 },
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("HTTP method must not be empty.")]
    MethodEmpty,
    #[error("Invalid HTTP method '{value}'.")]
    InvalidMethod { value: String },
    #[error("Timeout must not be empty.")]
    TimeoutEmpty,
    #[error("Invalid timeout '{value}'.")]
    InvalidTimeout { value: String },
    #[error("Invalid timeout '{value}': {source}")]
    InvalidTimeoutNumber {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("Invalid timeout unit '{unit}'. Use ms, s, m, or h.")]
    InvalidTimeoutUnit { unit: String },
    #[error("Timeout must be > 0.")]
    TimeoutZero,
    #[error("URL must not be empty.")]
    MissingUrl,
    #[cfg(test)]
    #[error("{message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("{message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
