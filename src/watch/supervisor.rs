//! The poll loop: fetch, validate, format, notify, sleep, repeat.
//!
//! Every error raised inside an iteration is contained here. Failures become
//! a `Program failure: ...` notification that goes through the same
//! de-duplication as status messages, and the loop carries on after the
//! next sleep.

use std::sync::Arc;
use std::time::Duration;

use super::events::{EventSink, PollEvent, TracingSink};
use super::format::{self, Notification};
use super::validate;
use super::StatusSource;
use crate::channel::Notifier;
use crate::error::WatchError;

/// What happened to the message (if any) produced by one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Nothing to send.
    Skipped,
    /// Same text as the last delivered message.
    Suppressed,
    Sent,
    Failed,
}

/// Summary of one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationReport {
    /// The text handed to the dedup check, if any.
    pub text: Option<String>,
    pub delivery: Delivery,
    /// The error that failed the iteration, if any.
    pub failure: Option<WatchError>,
}

/// Owns the cursor and the last delivered message.
pub struct PollSupervisor {
    source: Box<dyn StatusSource>,
    notifier: Box<dyn Notifier>,
    events: Arc<dyn EventSink>,
    interval: Duration,
    cursor: i64,
    last_notified: Option<String>,
}

impl PollSupervisor {
    pub fn new(
        source: Box<dyn StatusSource>,
        notifier: Box<dyn Notifier>,
        interval: Duration,
        cursor: i64,
    ) -> Self {
        Self {
            source,
            notifier,
            events: Arc::new(TracingSink),
            interval,
            cursor,
            last_notified: None,
        }
    }

    /// Replace the default [`TracingSink`].
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_notified(&self) -> Option<&str> {
        self.last_notified.as_deref()
    }

    /// Poll forever. The future never completes; drop it to stop.
    pub async fn run(&mut self) {
        self.events.emit(&PollEvent::Started {
            source: self.source.name().to_string(),
            notifier: self.notifier.name().to_string(),
            cursor: self.cursor,
            interval_secs: self.interval.as_secs(),
        });

        loop {
            self.run_iteration().await;
            self.events.emit(&PollEvent::Sleeping {
                secs: self.interval.as_secs(),
            });
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run a single poll–validate–notify pass.
    pub async fn run_iteration(&mut self) -> IterationReport {
        self.events.emit(&PollEvent::Polling {
            cursor: self.cursor,
        });

        match self.check().await {
            Ok((notification, current_date)) => {
                let report = match notification {
                    Notification::Message(text) => {
                        let delivery = self.deliver(&text).await;
                        IterationReport {
                            text: Some(text),
                            delivery,
                            failure: None,
                        }
                    }
                    Notification::NoChange => {
                        self.events.emit(&PollEvent::NoChange);
                        IterationReport {
                            text: None,
                            delivery: Delivery::Skipped,
                            failure: None,
                        }
                    }
                };
                self.advance_cursor(current_date);
                report
            }
            Err(error) => {
                self.events.emit(&PollEvent::IterationFailed {
                    error: error.clone(),
                });
                let text = format::failure_message(&error);
                let delivery = self.deliver(&text).await;
                IterationReport {
                    text: Some(text),
                    delivery,
                    failure: Some(error),
                }
            }
        }
    }

    /// Fetch, validate, and format. Returns the notification and the
    /// server-provided next cursor.
    async fn check(&self) -> Result<(Notification, Option<i64>), WatchError> {
        let response = self.source.fetch(self.cursor).await?;
        let items = validate::extract(&response)?;
        let notification = format::format(&items)?;
        Ok((notification, response.current_date()))
    }

    /// Send `text` unless it equals the last delivered message. The dedup
    /// state only changes after a successful send.
    async fn deliver(&mut self, text: &str) -> Delivery {
        if self.last_notified.as_deref() == Some(text) {
            self.events.emit(&PollEvent::Suppressed {
                text: text.to_string(),
            });
            return Delivery::Suppressed;
        }

        match self.notifier.notify(text).await {
            Ok(()) => {
                self.last_notified = Some(text.to_string());
                self.events.emit(&PollEvent::Sent {
                    text: text.to_string(),
                });
                Delivery::Sent
            }
            Err(error) => {
                self.events.emit(&PollEvent::DeliveryFailed {
                    text: text.to_string(),
                    error,
                });
                Delivery::Failed
            }
        }
    }

    fn advance_cursor(&mut self, current_date: Option<i64>) {
        match current_date {
            Some(next) => {
                self.events.emit(&PollEvent::CursorAdvanced {
                    from: self.cursor,
                    to: next,
                });
                self.cursor = next;
            }
            None => self.events.emit(&PollEvent::CursorHeld {
                cursor: self.cursor,
            }),
        }
    }
}
