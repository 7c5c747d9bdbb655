//! OAuth2 authentication management for the Gmail API

use google_gmail1::{hyper_rustls, hyper_util, yup_oauth2, Gmail};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use yup_oauth2::ApplicationSecret;

use crate::error::{GmailError, Result};

/// Gmail API scopes the responder needs
///
/// - gmail.modify: read unread messages, fetch threads, send the reply
/// - gmail.labels: list/create the vacation label
pub const REQUIRED_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/gmail.modify",
    "https://www.googleapis.com/auth/gmail.labels",
];

/// Type alias for Gmail Hub to simplify type signatures
pub type GmailHub =
    Gmail<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>>;

/// Initialize Gmail API hub with OAuth2 authentication
///
/// Sets up the complete Gmail API client with:
/// - OAuth2 authentication using InstalledFlow (desktop app flow)
/// - Token persistence to disk for automatic refresh
/// - HTTP/1 client with TLS support
///
/// This happens once at process start; everything downstream receives the
/// authorized hub and never touches credentials again.
///
/// # Arguments
/// * `credentials_path` - Path to the OAuth2 credentials JSON file
/// * `token_cache_path` - Path where access tokens will be cached
pub async fn initialize_gmail_hub(
    credentials_path: &Path,
    token_cache_path: &Path,
) -> Result<GmailHub> {
    let secret = yup_oauth2::read_application_secret(credentials_path)
        .await
        .map_err(|e| GmailError::AuthError(format!("Failed to read credentials: {}", e)))?;

    // HTTPRedirect opens a browser for user authorization
    let auth = yup_oauth2::InstalledFlowAuthenticator::builder(
        secret,
        yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
    )
    .persist_tokens_to_disk(token_cache_path)
    .build()
    .await
    .map_err(|e| GmailError::AuthError(format!("Failed to build authenticator: {}", e)))?;

    // Pre-authenticate so the cached token carries both scopes up front
    let _token = auth
        .token(REQUIRED_SCOPES)
        .await
        .map_err(|e| GmailError::AuthError(format!("Failed to obtain token: {}", e)))?;

    // HTTP/1 for compatibility with google-gmail1
    let client = hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
        .build(
            hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .map_err(|e| GmailError::AuthError(format!("Failed to load TLS roots: {}", e)))?
                .https_or_http()
                .enable_http1()
                .build(),
        );

    Ok(Gmail::new(client, auth))
}

/// Credential structure matching Google's OAuth2 credentials JSON format
#[derive(Debug, Serialize, Deserialize)]
pub struct Credentials {
    pub installed: InstalledApp,
}

/// Installed application credentials (desktop/CLI app)
#[derive(Debug, Serialize, Deserialize)]
pub struct InstalledApp {
    pub client_id: String,
    pub project_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub client_secret: String,
    pub redirect_uris: Vec<String>,
}

/// Load OAuth2 credentials from a JSON file
pub async fn load_credentials(path: &Path) -> Result<Credentials> {
    let content = tokio::fs::read_to_string(path).await?;
    let creds = serde_json::from_str(&content)?;
    Ok(creds)
}

/// Load OAuth2 credentials from environment variables
///
/// For deployments that keep credentials out of files.
///
/// # Environment Variables
/// - `GMAIL_CLIENT_ID`: OAuth2 client ID
/// - `GMAIL_CLIENT_SECRET`: OAuth2 client secret
/// - `GMAIL_REDIRECT_URI`: Redirect URI (optional, defaults to http://localhost:8080)
pub fn load_credentials_from_env() -> Result<ApplicationSecret> {
    let client_id = env::var("GMAIL_CLIENT_ID")
        .map_err(|_| GmailError::ConfigError("GMAIL_CLIENT_ID not set".to_string()))?;
    let client_secret = env::var("GMAIL_CLIENT_SECRET")
        .map_err(|_| GmailError::ConfigError("GMAIL_CLIENT_SECRET not set".to_string()))?;
    let redirect_uri =
        env::var("GMAIL_REDIRECT_URI").unwrap_or_else(|_| "http://localhost:8080".to_string());

    Ok(ApplicationSecret {
        client_id,
        client_secret,
        auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
        token_uri: "https://oauth2.googleapis.com/token".to_string(),
        redirect_uris: vec![redirect_uri],
        ..Default::default()
    })
}

/// Secure token file permissions on Unix systems
///
/// Sets file permissions to 0600 (read/write for owner only)
#[cfg(unix)]
pub async fn secure_token_file(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// Secure token file on Windows (stub implementation)
///
/// Windows uses ACLs instead of Unix permissions
#[cfg(windows)]
pub async fn secure_token_file(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_credentials() {
        let credentials_json = r#"{
            "installed": {
                "client_id": "test-client-id",
                "project_id": "test-project",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "client_secret": "test-secret",
                "redirect_uris": ["http://localhost:8080"]
            }
        }"#;

        let temp_file = NamedTempFile::new().unwrap();
        tokio::fs::write(temp_file.path(), credentials_json)
            .await
            .unwrap();

        let creds = load_credentials(temp_file.path()).await.unwrap();
        assert_eq!(creds.installed.client_id, "test-client-id");
        assert_eq!(creds.installed.project_id, "test-project");
        assert_eq!(creds.installed.client_secret, "test-secret");
    }

    #[tokio::test]
    async fn test_secure_token_file() {
        let temp_file = NamedTempFile::new().unwrap();
        tokio::fs::write(temp_file.path(), "test content")
            .await
            .unwrap();

        secure_token_file(temp_file.path()).await.unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = tokio::fs::metadata(temp_file.path()).await.unwrap();
            let perms = metadata.permissions();
            assert_eq!(perms.mode() & 0o777, 0o600);
        }
    }

    #[test]
    #[serial]
    fn test_load_credentials_from_env() {
        env::set_var("GMAIL_CLIENT_ID", "test-id");
        env::set_var("GMAIL_CLIENT_SECRET", "test-secret");
        env::set_var("GMAIL_REDIRECT_URI", "http://localhost:9999");

        let secret = load_credentials_from_env().unwrap();
        assert_eq!(secret.client_id, "test-id");
        assert_eq!(secret.client_secret, "test-secret");
        assert_eq!(secret.redirect_uris[0], "http://localhost:9999");

        env::remove_var("GMAIL_CLIENT_ID");
        env::remove_var("GMAIL_CLIENT_SECRET");
        env::remove_var("GMAIL_REDIRECT_URI");
    }

    #[test]
    #[serial]
    fn test_load_credentials_from_env_default_redirect() {
        env::set_var("GMAIL_CLIENT_ID", "test-id");
        env::set_var("GMAIL_CLIENT_SECRET", "test-secret");
        env::remove_var("GMAIL_REDIRECT_URI");

        let secret = load_credentials_from_env().unwrap();
        assert_eq!(secret.redirect_uris[0], "http://localhost:8080");

        env::remove_var("GMAIL_CLIENT_ID");
        env::remove_var("GMAIL_CLIENT_SECRET");
    }

    #[test]
    #[serial]
    fn test_load_credentials_from_env_missing() {
        env::remove_var("GMAIL_CLIENT_ID");
        env::remove_var("GMAIL_CLIENT_SECRET");
        assert!(load_credentials_from_env().is_err());
    }

    #[test]
    fn test_scopes_constants() {
        assert_eq!(REQUIRED_SCOPES.len(), 2);
        assert!(REQUIRED_SCOPES.contains(&"https://www.googleapis.com/auth/gmail.modify"));
        assert!(REQUIRED_SCOPES.contains(&"https://www.googleapis.com/auth/gmail.labels"));
    }
}
