use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GmailError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub reply: ReplyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Lower bound (seconds) for the once-sampled poll interval
    #[serde(default = "default_min_interval_secs")]
    pub min_interval_secs: u64,
    /// Upper bound (seconds), inclusive
    #[serde(default = "default_max_interval_secs")]
    pub max_interval_secs: u64,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: default_min_interval_secs(),
            max_interval_secs: default_max_interval_secs(),
            max_concurrent_requests: default_max_concurrent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Label applied to messages that received the auto-reply
    #[serde(default = "default_label")]
    pub label: String,
    /// Prior-reply detection: "thread-length" or "owner-reply"
    #[serde(default = "default_policy")]
    pub policy: String,
    /// Account owner's address; required when policy = "owner-reply"
    #[serde(default)]
    pub account: Option<String>,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            policy: default_policy(),
            account: None,
        }
    }
}

fn default_min_interval_secs() -> u64 {
    45
}

fn default_max_interval_secs() -> u64 {
    120
}

fn default_max_concurrent() -> usize {
    10
}

fn default_label() -> String {
    "onVacation".to_string()
}

fn default_policy() -> String {
    "thread-length".to_string()
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        // If file doesn't exist, return default config with warning
        if !path.exists() {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GmailError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| GmailError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                GmailError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| GmailError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        tokio::fs::write(path, content)
            .await
            .map_err(|e| GmailError::ConfigError(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.poll.min_interval_secs == 0 {
            return Err(GmailError::ConfigError(
                "poll.min_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.poll.max_interval_secs < self.poll.min_interval_secs {
            return Err(GmailError::ConfigError(
                "poll.max_interval_secs must not be below poll.min_interval_secs".to_string(),
            ));
        }

        if self.poll.max_concurrent_requests == 0 {
            return Err(GmailError::ConfigError(
                "poll.max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        if self.poll.max_concurrent_requests > 50 {
            return Err(GmailError::ConfigError(
                "poll.max_concurrent_requests cannot exceed 50 (to stay under Gmail API rate limits)".to_string(),
            ));
        }

        if self.reply.label.trim().is_empty() {
            return Err(GmailError::ConfigError(
                "reply.label cannot be empty".to_string(),
            ));
        }

        match self.reply.policy.as_str() {
            "thread-length" => {}
            "owner-reply" => {
                if self.reply.account.as_deref().map(str::trim).unwrap_or("").is_empty() {
                    return Err(GmailError::ConfigError(
                        "reply.account is required when reply.policy = 'owner-reply'".to_string(),
                    ));
                }
            }
            other => {
                return Err(GmailError::ConfigError(format!(
                    "Invalid reply.policy: '{}'. Must be 'thread-length' or 'owner-reply'",
                    other
                )));
            }
        }

        Ok(())
    }

    /// Write a commented example configuration file
    pub async fn create_example(path: &Path) -> Result<()> {
        let example = r#"# gmail-autoresponder configuration

[poll]
# The poll interval is sampled once at startup, uniformly from
# [min_interval_secs, max_interval_secs], and reused for every cycle.
min_interval_secs = 45
max_interval_secs = 120
# Upper bound on concurrent Gmail API requests.
max_concurrent_requests = 10

[reply]
# Label applied to every message that received the auto-reply.
label = "onVacation"
# How to detect that a conversation was already answered:
#   "thread-length" - any thread with more than one message counts as answered
#   "owner-reply"   - only a message sent by `account` counts as answered
policy = "thread-length"
# account = "me@example.com"
"#;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                GmailError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        tokio::fs::write(path, example)
            .await
            .map_err(|e| GmailError::ConfigError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
