//! Structured events emitted by the supervisor.
//!
//! The poll loop never logs directly; it hands a [`PollEvent`] to an
//! [`EventSink`]. [`TracingSink`] renders events through `tracing`.

use crate::error::{ErrorKind, WatchError};

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// The loop is starting.
    Started {
        source: String,
        notifier: String,
        cursor: i64,
        interval_secs: u64,
    },
    /// A query is about to be sent.
    Polling { cursor: i64 },
    /// The response contained no work items.
    NoChange,
    /// A message equal to the last one sent was not re-sent.
    Suppressed { text: String },
    /// A message was accepted by the notifier.
    Sent { text: String },
    /// The notifier rejected a message.
    DeliveryFailed { text: String, error: WatchError },
    /// Fetching, validating, or formatting failed.
    IterationFailed { error: WatchError },
    /// The cursor moved to the server-provided `current_date`.
    CursorAdvanced { from: i64, to: i64 },
    /// A successful response carried no `current_date`.
    CursorHeld { cursor: i64 },
    /// The loop is going to sleep.
    Sleeping { secs: u64 },
}

/// Receives supervisor events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &PollEvent);
}

/// Renders events as `tracing` records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &PollEvent) {
        match event {
            PollEvent::Started {
                source,
                notifier,
                cursor,
                interval_secs,
            } => tracing::info!(
                source = %source,
                notifier = %notifier,
                cursor,
                interval_secs,
                "watching review status"
            ),
            PollEvent::Polling { cursor } => tracing::debug!(cursor, "polling status endpoint"),
            PollEvent::NoChange => tracing::debug!("no status changes"),
            PollEvent::Suppressed { text } => {
                tracing::debug!(text = %text, "message already sent, skipping")
            }
            PollEvent::Sent { text } => tracing::info!(text = %text, "message sent to Telegram"),
            PollEvent::DeliveryFailed { text, error } => tracing::error!(
                kind = %error.kind(),
                error = %error,
                text = %text,
                "failed to deliver message"
            ),
            PollEvent::IterationFailed { error } => match error.kind() {
                ErrorKind::UnknownStatus => tracing::warn!(
                    kind = %error.kind(),
                    error = %error,
                    "status endpoint returned an undocumented status"
                ),
                kind => tracing::error!(kind = %kind, error = %error, "poll iteration failed"),
            },
            PollEvent::CursorAdvanced { from, to } => {
                tracing::debug!(from, to, "cursor advanced")
            }
            PollEvent::CursorHeld { cursor } => {
                tracing::debug!(cursor, "response has no current_date, cursor unchanged")
            }
            PollEvent::Sleeping { secs } => tracing::debug!(secs, "sleeping until next poll"),
        }
    }
}
