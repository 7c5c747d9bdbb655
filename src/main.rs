use anyhow::Result;
use clap::Parser;
use gmail_autoresponder::cli::{Cli, Commands};
use gmail_autoresponder::client::ProductionGmailClient;
use gmail_autoresponder::config::Config;
use gmail_autoresponder::error::GmailError;
use gmail_autoresponder::responder::AutoResponder;
use gmail_autoresponder::scheduler::PollScheduler;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Exit with proper code on error
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        eprintln!("\nFor help, run: gmail-autoresponder --help");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Install default crypto provider for rustls
    // This is necessary because multiple dependencies use different crypto providers
    // On non-Windows platforms, use aws-lc-rs (better performance, FIPS support)
    // On Windows, use ring (better compatibility, no NASM/CMake required)
    #[cfg(not(windows))]
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    #[cfg(windows)]
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    // Initialize tracing with level based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("gmail_autoresponder=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("gmail_autoresponder=info,warn,error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Auth { force } => {
            tracing::info!("Authenticating with Gmail API...");

            // Ensure token cache directory exists
            if let Some(parent) = cli.token_cache.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            // Delete existing token if force flag is set
            if force && cli.token_cache.exists() {
                tokio::fs::remove_file(&cli.token_cache).await?;
                tracing::info!("Removed existing token cache");
            }

            // Initialize Gmail hub (will trigger OAuth flow if needed)
            let hub =
                gmail_autoresponder::auth::initialize_gmail_hub(&cli.credentials, &cli.token_cache)
                    .await?;

            if cli.token_cache.exists() {
                gmail_autoresponder::auth::secure_token_file(&cli.token_cache).await?;
            }

            println!("Successfully authenticated with Gmail API");
            println!("Token cached at: {:?}", cli.token_cache);

            // Test the connection - must specify scope to avoid triggering additional OAuth flow
            let (_, profile) = hub
                .users()
                .get_profile("me")
                .add_scope("https://www.googleapis.com/auth/gmail.modify")
                .doit()
                .await?;
            println!(
                "Connected to account: {}",
                profile.email_address.unwrap_or_default()
            );

            Ok(())
        }

        Commands::Run { once } => {
            let config = Config::load(&cli.config).await?;

            tracing::info!("Authenticating with Gmail API...");
            let hub =
                gmail_autoresponder::auth::initialize_gmail_hub(&cli.credentials, &cli.token_cache)
                    .await?;

            let client = Arc::new(ProductionGmailClient::new(
                hub,
                config.poll.max_concurrent_requests,
            ));
            let mut responder = AutoResponder::from_config(client, &config)?;

            if once {
                tracing::info!("Running a single inbox pass");
                let report = responder.process_inbox().await?;

                println!("\n========================================");
                println!("Inbox Pass Summary");
                println!("========================================");
                println!("Unread messages:      {}", report.scanned);
                println!("Replies sent:         {}", report.replied);
                println!("Already replied:      {}", report.skipped_already_replied);
                println!("Thread answered:      {}", report.skipped_prior_reply);
                println!("Malformed messages:   {}", report.malformed);
                println!("Errors:               {}", report.errors);
                println!("========================================");

                return Ok(());
            }

            tracing::info!("Starting auto-responder (label: {})", config.reply.label);
            let scheduler = PollScheduler::new(responder, &config.poll);
            scheduler.start().await;
            Ok(())
        }

        Commands::InitConfig { output, force } => {
            tracing::info!("Generating example configuration file");

            if output.exists() && !force {
                return Err(GmailError::ConfigError(format!(
                    "Configuration file already exists at {:?}. Use --force to overwrite.",
                    output
                ))
                .into());
            }

            Config::create_example(&output).await?;

            println!("Created example configuration file at: {:?}", output);
            println!("\nPlease edit this file to customize your settings.");
            println!("Key settings to review:");
            println!("  - poll.min_interval_secs / poll.max_interval_secs: polling bounds");
            println!("  - reply.label: label applied to answered messages");
            println!("  - reply.policy: how an already-answered thread is detected");

            Ok(())
        }
    }
}
