use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GmailError, Result};

/// Lightweight listing entry: just enough to fetch the rest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRef {
    pub id: String,
    pub thread_id: String,
}

/// Snapshot of a message as fetched during one poll cycle.
///
/// Header fields are optional at this level; callers that need them go
/// through [`Message::headers`], which reports which one is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub thread_id: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub subject: Option<String>,
    pub unread: bool,
    pub date: Option<DateTime<Utc>>,
}

/// The three headers the responder requires on a candidate message
#[derive(Debug, Clone)]
pub struct MessageHeaders {
    pub from: String,
    pub to: String,
    pub subject: String,
}

impl Message {
    /// Extract the required headers, failing with the name of the first
    /// missing one.
    pub fn headers(&self) -> Result<MessageHeaders> {
        let missing = |name: &'static str| GmailError::MalformedMessage {
            message_id: self.id.clone(),
            missing: name,
        };

        Ok(MessageHeaders {
            from: self.from.clone().ok_or_else(|| missing("From"))?,
            to: self.to.clone().ok_or_else(|| missing("To"))?,
            subject: self.subject.clone().ok_or_else(|| missing("Subject"))?,
        })
    }
}

/// Label info returned from Gmail API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelInfo {
    pub id: String,
    pub name: String,
}

/// Outcome counters for one inbox pass
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleReport {
    /// Unread messages observed
    pub scanned: usize,
    /// Replies sent (and labels applied)
    pub replied: usize,
    /// Skipped: sender already replied to this run
    pub skipped_already_replied: usize,
    /// Skipped: the thread already holds more than the original message
    pub skipped_prior_reply: usize,
    /// Skipped: a required header was missing
    pub malformed: usize,
    /// Per-message transport failures (the cycle continued past them)
    pub errors: usize,
}

impl CycleReport {
    /// Messages that were neither replied to nor cleanly skipped
    pub fn failed(&self) -> usize {
        self.malformed + self.errors
    }
}
