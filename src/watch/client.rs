//! Status client: queries the Practicum homework status API.
//!
//! One authenticated `GET` per call, windowed by `from_date`. Retries are the
//! supervisor's business; this client reports the first failure it sees.

use std::time::Duration;

use async_trait::async_trait;

use super::{StatusResponse, StatusSource};
use crate::error::WatchError;

/// HTTP client for the homework status endpoint.
pub struct PracticumClient {
    endpoint: String,
    token: String,
    /// Reused across polls for connection pooling.
    client: reqwest::Client,
}

impl PracticumClient {
    /// Build a client. `timeout` of `None` keeps the reqwest default.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    fn name(&self) -> &str {
        "practicum"
    }

    async fn fetch(&self, cursor: i64) -> Result<StatusResponse, WatchError> {
        let from_date = if cursor > 0 {
            cursor
        } else {
            chrono::Utc::now().timestamp()
        };

        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(transport_error)?;

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| WatchError::Decode(e.to_string()))?;

        Ok(StatusResponse(value))
    }
}

/// Name the failure class, then the underlying cause. reqwest's own message
/// is just "error sending request for url (...)" for every case.
fn transport_error(error: reqwest::Error) -> WatchError {
    let what = if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "could not connect to the status endpoint"
    } else if error.is_redirect() {
        "too many redirects"
    } else if error.is_body() || error.is_decode() {
        "failed to read the response body"
    } else {
        "request failed"
    };

    match std::error::Error::source(&error) {
        Some(cause) => WatchError::Transport(format!("{what}: {cause}")),
        None => WatchError::Transport(what.to_string()),
    }
}
