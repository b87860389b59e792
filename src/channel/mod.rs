//! Notification channel. Telegram is the only destination.

pub mod telegram;

use async_trait::async_trait;

use crate::error::WatchError;

/// Delivers a text to the configured destination.
///
/// Implementations send unconditionally: de-duplication belongs to the
/// caller, and a failed send is reported, not retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    async fn notify(&self, text: &str) -> Result<(), WatchError>;
}
