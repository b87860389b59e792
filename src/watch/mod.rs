//! Watch: poll the review status endpoint and report changes.
//!
//! A [`StatusSource`] is queried with a time cursor, the response is checked
//! by [`validate`], the newest work item is rendered by [`format`], and the
//! [`supervisor::PollSupervisor`] decides whether to notify.

pub mod client;
pub mod events;
pub mod format;
pub mod supervisor;
pub mod validate;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::WatchError;

/// A source of status responses, queried once per iteration.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Fetch every status change since `cursor` (epoch seconds).
    async fn fetch(&self, cursor: i64) -> Result<StatusResponse, WatchError>;
}

/// A decoded status payload. Its shape is checked by [`validate::extract`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResponse(pub Value);

impl StatusResponse {
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// The server clock at the time of the response, used as the next cursor.
    /// A missing or non-integer value yields `None`.
    pub fn current_date(&self) -> Option<i64> {
        self.0.get("current_date").and_then(Value::as_i64)
    }
}

impl From<Value> for StatusResponse {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
