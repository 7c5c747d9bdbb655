//! Gmail API client: the capability surface the responder runs against

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use chrono::{DateTime, Utc};
use google_gmail1::{
    api::{Label, Message as ApiMessage, ModifyMessageRequest},
    hyper_rustls, hyper_util, Gmail,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::error::{GmailError, Result};
use crate::models::{LabelInfo, Message, MessageRef};

/// Trait defining the mailbox operations the responder needs.
///
/// Everything the decision loop touches goes through this surface, so tests
/// can drive the loop against a mock and the production implementation stays
/// a thin adapter over the Gmail API.
#[async_trait]
pub trait GmailClient: Send + Sync {
    /// List all unread messages (id + thread id only)
    async fn list_unread(&self) -> Result<Vec<MessageRef>>;

    /// Get a message with its header fields
    async fn get_message(&self, id: &str) -> Result<Message>;

    /// Get all messages of a thread, root first
    async fn get_thread(&self, thread_id: &str) -> Result<Vec<Message>>;

    /// Send a raw, URL-safe-base64-encoded RFC 822 message
    async fn send_message(&self, raw_encoded: &str) -> Result<()>;

    /// List all labels in the account
    async fn list_labels(&self) -> Result<Vec<LabelInfo>>;

    /// Create a new label, returning its id
    async fn create_label(&self, name: &str) -> Result<String>;

    /// Apply a label to a message
    async fn apply_label(&self, message_id: &str, label_id: &str) -> Result<()>;
}

/// Production Gmail client backed by an authorized hub.
///
/// Concurrent API calls are bounded by a semaphore; the responder itself is
/// sequential, so the bound only matters if multiple components share one
/// client instance.
pub struct ProductionGmailClient {
    hub: Gmail<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>>,
    rate_limiter: Arc<Semaphore>,
}

impl ProductionGmailClient {
    /// Create a new production Gmail client
    ///
    /// # Arguments
    /// * `hub` - Authorized Gmail API hub instance
    /// * `max_concurrent` - Maximum concurrent requests
    pub fn new(
        hub: Gmail<
            hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
        >,
        max_concurrent: usize,
    ) -> Self {
        Self {
            hub,
            rate_limiter: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    async fn acquire_permit(&self) -> Result<tokio::sync::SemaphorePermit<'_>> {
        self.rate_limiter
            .acquire()
            .await
            .map_err(|e| GmailError::Unknown(format!("Failed to acquire rate limit permit: {}", e)))
    }
}

/// Parse Gmail API Message into our Message snapshot.
///
/// Header fields stay optional here; the responder decides which ones are
/// required and reports the malformed-message error itself.
fn parse_message(msg: ApiMessage) -> Result<Message> {
    let id = msg
        .id
        .ok_or_else(|| GmailError::ApiError("Message without ID in API response".to_string()))?;

    let thread_id = msg
        .thread_id
        .ok_or_else(|| GmailError::ApiError("Message without thread ID in API response".to_string()))?;

    let unread = msg
        .label_ids
        .as_ref()
        .map(|labels| labels.iter().any(|l| l == "UNREAD"))
        .unwrap_or(false);

    let mut from = None;
    let mut to = None;
    let mut subject = None;
    let mut date = None;

    if let Some(headers) = msg.payload.as_ref().and_then(|p| p.headers.as_ref()) {
        for header in headers {
            if let (Some(name), Some(value)) = (&header.name, &header.value) {
                match name.to_lowercase().as_str() {
                    "from" => from = Some(value.clone()),
                    "to" => to = Some(value.clone()),
                    "subject" => subject = Some(value.clone()),
                    "date" => date = parse_date(value).ok(),
                    _ => {}
                }
            }
        }
    }

    Ok(Message {
        id,
        thread_id,
        from,
        to,
        subject,
        unread,
        date,
    })
}

/// Extract the address part of a `From` header.
///
/// Handles the "Name <email@example.com>" form; anything else is returned
/// trimmed as-is.
pub fn sender_address(header: &str) -> String {
    if let Some(start) = header.find('<') {
        if let Some(end) = header.find('>') {
            if start < end {
                return header[start + 1..end].trim().to_string();
            }
        }
    }
    header.trim().to_string()
}

/// Parse RFC 2822 date string, falling back to RFC 3339
fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(date_str)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            DateTime::parse_from_rfc3339(date_str).map(|dt| dt.with_timezone(&Utc))
        })
        .map_err(|e| GmailError::ApiError(format!("Invalid date format: {}", e)))
}

#[async_trait]
impl GmailClient for ProductionGmailClient {
    async fn list_unread(&self) -> Result<Vec<MessageRef>> {
        let _permit = self.acquire_permit().await?;

        let mut all_refs = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut call = self
                .hub
                .users()
                .messages_list("me")
                .q("is:unread")
                .max_results(100);

            if let Some(token) = page_token.as_ref() {
                call = call.page_token(token);
            }

            let (_, response) = call
                .add_scope("https://www.googleapis.com/auth/gmail.modify")
                .doit()
                .await?;

            if let Some(messages) = response.messages {
                for msg_ref in messages {
                    if let (Some(id), Some(thread_id)) = (msg_ref.id, msg_ref.thread_id) {
                        all_refs.push(MessageRef { id, thread_id });
                    }
                }
            }

            page_token = response.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        debug!("Listed {} unread messages", all_refs.len());
        Ok(all_refs)
    }

    async fn get_message(&self, id: &str) -> Result<Message> {
        let _permit = self.acquire_permit().await?;

        let (_, msg) = self
            .hub
            .users()
            .messages_get("me", id)
            .format("metadata")
            .add_metadata_headers("From")
            .add_metadata_headers("To")
            .add_metadata_headers("Subject")
            .add_metadata_headers("Date")
            .add_scope("https://www.googleapis.com/auth/gmail.modify")
            .doit()
            .await?;

        parse_message(msg)
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Vec<Message>> {
        let _permit = self.acquire_permit().await?;

        let (_, thread) = self
            .hub
            .users()
            .threads_get("me", thread_id)
            .format("metadata")
            .add_metadata_headers("From")
            .add_metadata_headers("To")
            .add_metadata_headers("Subject")
            .add_metadata_headers("Date")
            .add_scope("https://www.googleapis.com/auth/gmail.modify")
            .doit()
            .await?;

        thread
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(parse_message)
            .collect()
    }

    async fn send_message(&self, raw_encoded: &str) -> Result<()> {
        let _permit = self.acquire_permit().await?;

        // The hub uploads RFC 822 bytes itself, so undo the composer's
        // transport encoding here at the boundary.
        let rfc822 = URL_SAFE
            .decode(raw_encoded)
            .map_err(|e| GmailError::BadRequest(format!("Invalid raw payload: {}", e)))?;

        self.hub
            .users()
            .messages_send(ApiMessage::default(), "me")
            .add_scope("https://www.googleapis.com/auth/gmail.modify")
            .upload(
                std::io::Cursor::new(rfc822),
                "message/rfc822".parse().unwrap(),
            )
            .await?;

        Ok(())
    }

    async fn list_labels(&self) -> Result<Vec<LabelInfo>> {
        let _permit = self.acquire_permit().await?;

        let (_, response) = self
            .hub
            .users()
            .labels_list("me")
            .add_scope("https://www.googleapis.com/auth/gmail.labels")
            .doit()
            .await?;

        let labels: Vec<LabelInfo> = response
            .labels
            .unwrap_or_default()
            .into_iter()
            .filter_map(|label| match (label.id, label.name) {
                (Some(id), Some(name)) => Some(LabelInfo { id, name }),
                _ => None,
            })
            .collect();

        debug!("Listed {} labels", labels.len());
        Ok(labels)
    }

    async fn create_label(&self, name: &str) -> Result<String> {
        let _permit = self.acquire_permit().await?;

        let label = Label {
            name: Some(name.to_string()),
            message_list_visibility: Some("show".to_string()),
            label_list_visibility: Some("labelShow".to_string()),
            ..Default::default()
        };

        let (_, created_label) = self
            .hub
            .users()
            .labels_create(label, "me")
            .add_scope("https://www.googleapis.com/auth/gmail.labels")
            .doit()
            .await?;

        created_label
            .id
            .ok_or_else(|| GmailError::LabelError("Created label has no ID".to_string()))
    }

    async fn apply_label(&self, message_id: &str, label_id: &str) -> Result<()> {
        let _permit = self.acquire_permit().await?;

        let modify_request = ModifyMessageRequest {
            add_label_ids: Some(vec![label_id.to_string()]),
            remove_label_ids: None,
        };

        self.hub
            .users()
            .messages_modify(modify_request, "me", message_id)
            .add_scope("https://www.googleapis.com/auth/gmail.modify")
            .doit()
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_address_with_display_name() {
        assert_eq!(
            sender_address("Alice Example <alice@example.com>"),
            "alice@example.com"
        );
    }

    #[test]
    fn test_sender_address_bare() {
        assert_eq!(sender_address("bob@example.com"), "bob@example.com");
        assert_eq!(sender_address("  bob@example.com  "), "bob@example.com");
    }

    #[test]
    fn test_sender_address_quoted_name() {
        assert_eq!(
            sender_address("\"Example, Alice\" <alice@example.com>"),
            "alice@example.com"
        );
    }

    #[test]
    fn test_sender_address_malformed_brackets() {
        // Unbalanced brackets fall back to the raw value
        assert_eq!(sender_address("alice@example.com>"), "alice@example.com>");
    }

    #[test]
    fn test_parse_date_rfc2822() {
        let parsed = parse_date("Mon, 1 Jan 2024 10:00:00 -0800").unwrap();
        assert_eq!(parsed.timestamp(), 1_704_132_000);
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("not a date").is_err());
    }
}
