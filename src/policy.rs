//! Pluggable "has this conversation already been answered?" checks

use crate::client::sender_address;
use crate::models::Message;

/// Decides whether a thread already contains a reply, in which case the
/// responder stays silent. Kept behind a trait so the heuristic can be
/// swapped without touching the decision loop.
pub trait ReplyPolicy: Send + Sync {
    fn has_prior_reply(&self, thread: &[Message]) -> bool;
}

/// Treats any thread with more than one message as already answered.
///
/// This reproduces the reference behavior: it does not look at who wrote the
/// extra messages, so a sender double-posting into their own thread also
/// counts as "answered".
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadLengthPolicy;

impl ReplyPolicy for ThreadLengthPolicy {
    fn has_prior_reply(&self, thread: &[Message]) -> bool {
        thread.len() > 1
    }
}

/// Stricter check: the thread counts as answered only if the account owner
/// authored one of its messages.
#[derive(Debug, Clone)]
pub struct OwnerAuthoredPolicy {
    owner: String,
}

impl OwnerAuthoredPolicy {
    pub fn new(owner_address: impl Into<String>) -> Self {
        Self {
            owner: owner_address.into().to_lowercase(),
        }
    }
}

impl ReplyPolicy for OwnerAuthoredPolicy {
    fn has_prior_reply(&self, thread: &[Message]) -> bool {
        thread.iter().any(|msg| {
            msg.from
                .as_deref()
                .map(|from| sender_address(from).to_lowercase() == self.owner)
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, from: Option<&str>) -> Message {
        Message {
            id: id.to_string(),
            thread_id: "t1".to_string(),
            from: from.map(|s| s.to_string()),
            to: Some("me@example.com".to_string()),
            subject: Some("Hi".to_string()),
            unread: true,
            date: None,
        }
    }

    #[test]
    fn test_thread_length_single_message() {
        let thread = vec![message("m1", Some("alice@example.com"))];
        assert!(!ThreadLengthPolicy.has_prior_reply(&thread));
    }

    #[test]
    fn test_thread_length_two_messages() {
        let thread = vec![
            message("m1", Some("alice@example.com")),
            message("m2", Some("alice@example.com")),
        ];
        assert!(ThreadLengthPolicy.has_prior_reply(&thread));
    }

    #[test]
    fn test_thread_length_empty_thread() {
        assert!(!ThreadLengthPolicy.has_prior_reply(&[]));
    }

    #[test]
    fn test_owner_authored_detects_owner_reply() {
        let policy = OwnerAuthoredPolicy::new("me@example.com");
        let thread = vec![
            message("m1", Some("alice@example.com")),
            message("m2", Some("Me <ME@example.com>")),
        ];
        assert!(policy.has_prior_reply(&thread));
    }

    #[test]
    fn test_owner_authored_ignores_sender_double_post() {
        // Two messages from the sender, none from the owner: the length
        // heuristic would skip this thread, the stricter check replies.
        let policy = OwnerAuthoredPolicy::new("me@example.com");
        let thread = vec![
            message("m1", Some("alice@example.com")),
            message("m2", Some("alice@example.com")),
        ];
        assert!(!policy.has_prior_reply(&thread));
    }

    #[test]
    fn test_owner_authored_tolerates_missing_from() {
        let policy = OwnerAuthoredPolicy::new("me@example.com");
        let thread = vec![message("m1", None)];
        assert!(!policy.has_prior_reply(&thread));
    }
}
