//! Turn the newest work item into a notification.

use std::fmt;

use serde_json::Value;

use crate::error::WatchError;

/// Result of formatting one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Message(String),
    NoChange,
}

/// The closed set of review states the endpoint documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl ReviewStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "The work has been reviewed: the reviewer liked everything. Hooray!",
            Self::Reviewing => "The work has been taken for review by the reviewer.",
            Self::Rejected => "The work has been reviewed: the reviewer has comments.",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Reviewing => write!(f, "reviewing"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A single reviewable submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub name: String,
    pub status: ReviewStatus,
}

impl WorkItem {
    /// Parse a raw record. The name is read from `homework_name`, falling back
    /// to `name`.
    pub fn from_record(record: &Value) -> Result<Self, WatchError> {
        let name = record
            .get("homework_name")
            .or_else(|| record.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                WatchError::Schema("work item is missing the \"homework_name\" key".into())
            })?;

        let status = record
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| WatchError::Schema("work item is missing the \"status\" key".into()))?;

        let status = ReviewStatus::parse(status)
            .ok_or_else(|| WatchError::UnknownStatus(status.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            status,
        })
    }

    pub fn message(&self) -> String {
        format!(
            "Status changed for \"{}\". {}",
            self.name,
            self.status.verdict()
        )
    }
}

/// Format the first (newest) record; an empty list means nothing changed.
pub fn format(items: &[Value]) -> Result<Notification, WatchError> {
    let Some(first) = items.first() else {
        return Ok(Notification::NoChange);
    };
    let item = WorkItem::from_record(first)?;
    Ok(Notification::Message(item.message()))
}

/// Text sent when an iteration fails.
pub fn failure_message(error: &WatchError) -> String {
    format!("Program failure: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_each_known_status() {
        for (status, verdict) in [
            ("approved", ReviewStatus::Approved.verdict()),
            ("reviewing", ReviewStatus::Reviewing.verdict()),
            ("rejected", ReviewStatus::Rejected.verdict()),
        ] {
            let items = vec![json!({"homework_name": "hw1", "status": status})];
            assert_eq!(
                format(&items).unwrap(),
                Notification::Message(format!("Status changed for \"hw1\". {verdict}"))
            );
        }
    }

    #[test]
    fn test_format_accepts_plain_name_key() {
        let items = vec![json!({"name": "hw1", "status": "approved"})];
        assert_eq!(
            format(&items).unwrap(),
            Notification::Message(format!(
                "Status changed for \"hw1\". {}",
                ReviewStatus::Approved.verdict()
            ))
        );
    }

    #[test]
    fn test_format_empty_is_no_change() {
        assert_eq!(format(&[]).unwrap(), Notification::NoChange);
    }

    #[test]
    fn test_format_only_first_item_counts() {
        let items = vec![
            json!({"homework_name": "new", "status": "reviewing"}),
            json!({"homework_name": "old", "status": "bogus"}),
        ];
        match format(&items).unwrap() {
            Notification::Message(text) => assert!(text.contains("\"new\"")),
            other => panic!("expected Message, got {other:?}"),
        }
    }

    #[test]
    fn test_format_missing_fields() {
        let err = format(&[json!({"status": "approved"})]).unwrap_err();
        assert!(matches!(err, WatchError::Schema(ref m) if m.contains("homework_name")));

        let err = format(&[json!({"homework_name": "hw1"})]).unwrap_err();
        assert!(matches!(err, WatchError::Schema(ref m) if m.contains("status")));

        let err = format(&[json!("hw1")]).unwrap_err();
        assert!(matches!(err, WatchError::Schema(_)));
    }

    #[test]
    fn test_format_unknown_status() {
        let err = format(&[json!({"homework_name": "hw2", "status": "pending"})]).unwrap_err();
        assert_eq!(err, WatchError::UnknownStatus("pending".into()));
    }

    #[test]
    fn test_failure_message() {
        let err = WatchError::HttpStatus { status: 500 };
        assert_eq!(
            failure_message(&err),
            "Program failure: status endpoint is unavailable: HTTP 500"
        );
    }
}
