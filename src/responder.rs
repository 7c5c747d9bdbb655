//! The decision loop: who gets the vacation notice, and when

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::{sender_address, GmailClient};
use crate::composer;
use crate::config::Config;
use crate::error::{GmailError, Result};
use crate::labels::LabelResolver;
use crate::models::{CycleReport, MessageRef};
use crate::policy::{OwnerAuthoredPolicy, ReplyPolicy, ThreadLengthPolicy};

/// What happened to a single candidate message
enum MessageOutcome {
    Replied,
    AlreadyReplied,
    PriorReplyInThread,
}

/// Replies once per distinct sender with the fixed vacation notice and tags
/// the answered message with the vacation label.
///
/// Dedup state lives in memory for the lifetime of this instance: a sender
/// address is recorded on the first successful send and never removed, so a
/// restart forgets who was answered.
pub struct AutoResponder {
    client: Arc<dyn GmailClient>,
    labels: LabelResolver,
    policy: Box<dyn ReplyPolicy>,
    label_name: String,
    replied: HashSet<String>,
}

impl AutoResponder {
    pub fn new(
        client: Arc<dyn GmailClient>,
        policy: Box<dyn ReplyPolicy>,
        label_name: impl Into<String>,
    ) -> Self {
        Self {
            labels: LabelResolver::new(Arc::clone(&client)),
            client,
            policy,
            label_name: label_name.into(),
            replied: HashSet::new(),
        }
    }

    /// Build a responder with the policy and label the configuration names.
    pub fn from_config(client: Arc<dyn GmailClient>, config: &Config) -> Result<Self> {
        let policy: Box<dyn ReplyPolicy> = match config.reply.policy.as_str() {
            "owner-reply" => {
                let account = config.reply.account.clone().ok_or_else(|| {
                    GmailError::ConfigError(
                        "reply.account is required when reply.policy = 'owner-reply'".to_string(),
                    )
                })?;
                Box::new(OwnerAuthoredPolicy::new(account))
            }
            _ => Box::new(ThreadLengthPolicy),
        };

        Ok(Self::new(client, policy, config.reply.label.clone()))
    }

    /// Senders that have received the auto-reply since this instance started
    pub fn replied_senders(&self) -> &HashSet<String> {
        &self.replied
    }

    /// Run one pass over the unread messages.
    ///
    /// Only a failure of the initial unread listing aborts the pass; each
    /// message afterwards is its own fallible unit, so one malformed or
    /// failing message never blocks the rest of the cycle.
    pub async fn process_inbox(&mut self) -> Result<CycleReport> {
        let unread = self.client.list_unread().await?;

        let mut report = CycleReport {
            scanned: unread.len(),
            ..Default::default()
        };

        if unread.is_empty() {
            debug!("No unread messages");
            return Ok(report);
        }

        info!(count = unread.len(), "Processing unread messages");

        for msg_ref in &unread {
            match self.process_message(msg_ref).await {
                Ok(MessageOutcome::Replied) => report.replied += 1,
                Ok(MessageOutcome::AlreadyReplied) => report.skipped_already_replied += 1,
                Ok(MessageOutcome::PriorReplyInThread) => report.skipped_prior_reply += 1,
                Err(e @ GmailError::MalformedMessage { .. }) => {
                    warn!(message = %msg_ref.id, "Skipping message: {}", e);
                    report.malformed += 1;
                }
                Err(e) => {
                    warn!(message = %msg_ref.id, "Failed to process message: {}", e);
                    report.errors += 1;
                }
            }
        }

        info!(
            replied = report.replied,
            skipped = report.skipped_already_replied + report.skipped_prior_reply,
            failed = report.failed(),
            "Cycle complete"
        );
        Ok(report)
    }

    async fn process_message(&mut self, msg_ref: &MessageRef) -> Result<MessageOutcome> {
        let message = self.client.get_message(&msg_ref.id).await?;
        let headers = message.headers()?;
        let sender = sender_address(&headers.from);

        if self.replied.contains(&sender) {
            debug!(%sender, "Already replied to this sender");
            return Ok(MessageOutcome::AlreadyReplied);
        }

        let thread = self.client.get_thread(&msg_ref.thread_id).await?;
        if self.policy.has_prior_reply(&thread) {
            debug!(%sender, thread = %msg_ref.thread_id, "Thread already answered");
            return Ok(MessageOutcome::PriorReplyInThread);
        }

        // Reply goes out from the address the message was sent to, back to
        // the original sender, keeping the subject unchanged.
        let raw = composer::compose_reply(&headers.to, &headers.from, &headers.subject);
        self.client.send_message(&raw).await?;
        info!(%sender, "Sent auto-reply");

        // The reply is out, so the sender is recorded now: a label failure
        // below must not lead to a second reply on a later pass.
        self.replied.insert(sender);

        let label_id = self.labels.resolve_or_create(&self.label_name).await?;
        self.client.apply_label(&message.id, &label_id).await?;

        Ok(MessageOutcome::Replied)
    }
}
