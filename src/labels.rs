//! Vacation label lookup and creation

use std::sync::Arc;
use tracing::{debug, info};

use crate::client::GmailClient;
use crate::error::Result;

/// Resolves a label name to its Gmail id, creating the label when absent.
///
/// The remote label list is the source of truth: every call re-fetches it
/// rather than caching name->id locally, so labels renamed or created out of
/// band are picked up on the next resolution. The check-then-create pair is
/// not atomic against concurrent writers; the responder only calls this from
/// its single sequential loop.
pub struct LabelResolver {
    client: Arc<dyn GmailClient>,
}

impl LabelResolver {
    pub fn new(client: Arc<dyn GmailClient>) -> Self {
        Self { client }
    }

    /// Return the id of the label with exactly `name`, creating it if no
    /// such label exists.
    pub async fn resolve_or_create(&self, name: &str) -> Result<String> {
        let labels = self.client.list_labels().await?;

        if let Some(existing) = labels.iter().find(|label| label.name == name) {
            debug!(label = name, id = %existing.id, "Label already exists");
            return Ok(existing.id.clone());
        }

        info!(label = name, "Creating label");
        let id = self.client.create_label(name).await?;
        info!(label = name, id = %id, "Created label");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GmailError;
    use crate::models::LabelInfo;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub Client {}

        #[async_trait]
        impl GmailClient for Client {
            async fn list_unread(&self) -> Result<Vec<crate::models::MessageRef>>;
            async fn get_message(&self, id: &str) -> Result<crate::models::Message>;
            async fn get_thread(&self, thread_id: &str) -> Result<Vec<crate::models::Message>>;
            async fn send_message(&self, raw_encoded: &str) -> Result<()>;
            async fn list_labels(&self) -> Result<Vec<LabelInfo>>;
            async fn create_label(&self, name: &str) -> Result<String>;
            async fn apply_label(&self, message_id: &str, label_id: &str) -> Result<()>;
        }
    }

    #[tokio::test]
    async fn test_existing_label_is_not_recreated() {
        let mut client = MockClient::new();
        client.expect_list_labels().times(1).returning(|| {
            Ok(vec![
                LabelInfo {
                    id: "Label_1".to_string(),
                    name: "INBOX".to_string(),
                },
                LabelInfo {
                    id: "Label_7".to_string(),
                    name: "onVacation".to_string(),
                },
            ])
        });
        client.expect_create_label().times(0);

        let resolver = LabelResolver::new(Arc::new(client));
        let id = resolver.resolve_or_create("onVacation").await.unwrap();
        assert_eq!(id, "Label_7");
    }

    #[tokio::test]
    async fn test_missing_label_is_created_once() {
        let mut client = MockClient::new();
        client
            .expect_list_labels()
            .times(1)
            .returning(|| Ok(vec![]));
        client
            .expect_create_label()
            .with(eq("onVacation"))
            .times(1)
            .returning(|_| Ok("Label_new".to_string()));

        let resolver = LabelResolver::new(Arc::new(client));
        let id = resolver.resolve_or_create("onVacation").await.unwrap();
        assert_eq!(id, "Label_new");
    }

    #[tokio::test]
    async fn test_name_match_is_exact() {
        // Case differences do not count as a match
        let mut client = MockClient::new();
        client.expect_list_labels().times(1).returning(|| {
            Ok(vec![LabelInfo {
                id: "Label_2".to_string(),
                name: "ONVACATION".to_string(),
            }])
        });
        client
            .expect_create_label()
            .with(eq("onVacation"))
            .times(1)
            .returning(|_| Ok("Label_3".to_string()));

        let resolver = LabelResolver::new(Arc::new(client));
        let id = resolver.resolve_or_create("onVacation").await.unwrap();
        assert_eq!(id, "Label_3");
    }

    #[tokio::test]
    async fn test_list_failure_propagates() {
        let mut client = MockClient::new();
        client
            .expect_list_labels()
            .times(1)
            .returning(|| Err(GmailError::NetworkError("boom".to_string())));
        client.expect_create_label().times(0);

        let resolver = LabelResolver::new(Arc::new(client));
        assert!(resolver.resolve_or_create("onVacation").await.is_err());
    }
}
