use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::{Client, Method, header::HeaderMap};
use tokio::time::Instant;
use url::Url;

use crate::args::DEFAULT_USER_AGENT;
use crate::config::RunConfig;
use crate::error::HttpError;
use crate::metrics::RequestOutcome;

/// One unit of work handed to an executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    /// Submission index, starting at 0.
    pub index: u64,
    /// Connection context to use, `index mod concurrency`.
    pub slot: usize,
}

/// Performs exactly one request per call and never fails: transport
/// problems come back as a failed [`RequestOutcome`].
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, job: Job) -> RequestOutcome;
}

/// `reqwest`-backed executor holding one client (and its keep-alive pool)
/// per worker slot.
#[derive(Debug)]
pub struct HttpExecutor {
    clients: Vec<Client>,
    method: Method,
    target: Url,
    headers: HeaderMap,
    body: Option<String>,
}

impl HttpExecutor {
    /// # Errors
    ///
    /// Returns an error when an HTTP client cannot be built.
    pub fn new(config: &RunConfig) -> Result<Self, HttpError> {
        let clients = (0..config.concurrency.get())
            .map(|_| {
                Client::builder()
                    .timeout(config.timeout)
                    .user_agent(DEFAULT_USER_AGENT)
                    .build()
                    .map_err(|source| HttpError::BuildClient { source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            clients,
            method: config.method.clone(),
            target: config.target.clone(),
            headers: config.headers.clone(),
            body: config.body.clone(),
        })
    }

    #[must_use]
    pub fn contexts(&self) -> usize {
        self.clients.len()
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, job: Job) -> RequestOutcome {
        let start = Instant::now();
        let Some(client) = self.clients.get(job.slot) else {
            return RequestOutcome::failure(
                format!("no connection context for slot {}", job.slot),
                start.elapsed(),
            );
        };

        let mut request = client
            .request(self.method.clone(), self.target.clone())
            .headers(self.headers.clone());
        if let Some(body) = self.body.as_ref() {
            request = request.body(body.clone());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return RequestOutcome::failure(describe(&err), start.elapsed()),
        };
        let status = response.status().as_u16();

        // Drain the body so latency covers the full exchange and the
        // connection goes back to the pool.
        match response.bytes().await {
            Ok(_body) => RequestOutcome::success(status, start.elapsed()),
            Err(err) => RequestOutcome::failure(describe(&err), start.elapsed()),
        }
    }
}

fn describe(err: &reqwest::Error) -> String {
    let mut message = if err.is_timeout() {
        format!("timeout: {}", err)
    } else {
        err.to_string()
    };
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
