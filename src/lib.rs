//! Gmail Vacation Auto-Responder
//!
//! An unattended daemon that polls a Gmail mailbox for unread messages,
//! replies once per distinct sender with a fixed vacation notice, and tags
//! answered messages with a dedicated label.
//!
//! # Overview
//!
//! - **Authentication**: OAuth2 authentication with token caching
//! - **Polling**: recurring inbox checks at an interval randomized once at
//!   startup
//! - **Decision loop**: at most one reply per sender per process lifetime,
//!   with per-message error isolation
//! - **Labeling**: idempotent resolve-or-create of the vacation label
//!
//! # Example Usage
//!
//! ```no_run
//! use gmail_autoresponder::{auth, client::ProductionGmailClient, config::Config};
//! use gmail_autoresponder::responder::AutoResponder;
//! use gmail_autoresponder::scheduler::PollScheduler;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml".as_ref()).await?;
//!
//!     let hub = auth::initialize_gmail_hub(
//!         "credentials.json".as_ref(),
//!         ".gmail-autoresponder/token.json".as_ref(),
//!     )
//!     .await?;
//!
//!     let client = Arc::new(ProductionGmailClient::new(
//!         hub,
//!         config.poll.max_concurrent_requests,
//!     ));
//!     let responder = AutoResponder::from_config(client, &config)?;
//!
//!     PollScheduler::new(responder, &config.poll).start().await;
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`auth`] - OAuth2 authentication and Gmail API initialization
//! - [`cli`] - Command-line interface
//! - [`client`] - Gmail API client and the capability trait the core runs against
//! - [`composer`] - Reply payload construction and transport encoding
//! - [`config`] - Configuration management
//! - [`error`] - Error types and result aliases
//! - [`labels`] - Vacation label resolution
//! - [`models`] - Core data structures
//! - [`policy`] - Prior-reply detection policies
//! - [`responder`] - The reply decision loop
//! - [`scheduler`] - Recurring poll driver

pub mod auth;
pub mod cli;
pub mod client;
pub mod composer;
pub mod config;
pub mod error;
pub mod labels;
pub mod models;
pub mod policy;
pub mod responder;
pub mod scheduler;

// Re-export commonly used types for convenience
pub use error::{GmailError, Result};

// Core data models
pub use models::{CycleReport, LabelInfo, Message, MessageHeaders, MessageRef};

// Client trait and production implementation
pub use client::{GmailClient, ProductionGmailClient};

// Config types
pub use config::{Config, PollConfig, ReplyConfig};

// Decision loop and collaborators
pub use labels::LabelResolver;
pub use policy::{OwnerAuthoredPolicy, ReplyPolicy, ThreadLengthPolicy};
pub use responder::AutoResponder;
pub use scheduler::PollScheduler;

// CLI types (for binary usage)
pub use cli::{Cli, Commands};
