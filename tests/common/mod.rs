//! Common test utilities and fixtures

use gmail_autoresponder::client::GmailClient;
use gmail_autoresponder::error::Result;
use gmail_autoresponder::models::{LabelInfo, Message, MessageRef};
use mockall::mock;

/// Create a test message reference
pub fn create_message_ref(id: &str, thread_id: &str) -> MessageRef {
    MessageRef {
        id: id.to_string(),
        thread_id: thread_id.to_string(),
    }
}

/// Create a test message with all required headers present
pub fn create_test_message(id: &str, thread_id: &str, from: &str) -> Message {
    Message {
        id: id.to_string(),
        thread_id: thread_id.to_string(),
        from: Some(from.to_string()),
        to: Some("me@example.com".to_string()),
        subject: Some("Test Subject".to_string()),
        unread: true,
        date: None,
    }
}

/// Create a test label listing entry
pub fn create_test_label_info(id: &str, name: &str) -> LabelInfo {
    LabelInfo {
        id: id.to_string(),
        name: name.to_string(),
    }
}

// Mock implementation of GmailClient for testing
mock! {
    pub GmailClient {}

    #[async_trait::async_trait]
    impl GmailClient for GmailClient {
        async fn list_unread(&self) -> Result<Vec<MessageRef>>;
        async fn get_message(&self, id: &str) -> Result<Message>;
        async fn get_thread(&self, thread_id: &str) -> Result<Vec<Message>>;
        async fn send_message(&self, raw_encoded: &str) -> Result<()>;
        async fn list_labels(&self) -> Result<Vec<LabelInfo>>;
        async fn create_label(&self, name: &str) -> Result<String>;
        async fn apply_label(&self, message_id: &str, label_id: &str) -> Result<()>;
    }
}
