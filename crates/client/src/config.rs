//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `LOCKSHOP_API_BASE_URL` - Backend base URL (default: `http://localhost:3002`)
//! - `LOCKSHOP_CONTACT_CHANNEL` - `backend` (default) or `email-service`
//! - `LOCKSHOP_SESSION_FILE` - Where the admin token is kept
//!   (default: `$HOME/.lockshop/session.json`)
//!
//! ## Required when `LOCKSHOP_CONTACT_CHANNEL=email-service`
//! - `EMAILJS_SERVICE_ID` - Email service id
//! - `EMAILJS_TEMPLATE_ID` - Email template id
//! - `EMAILJS_PUBLIC_KEY` - Public key of the sending account
//! - `EMAILJS_ENDPOINT` - Optional endpoint override

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::contact::{ContactChannel, EmailServiceConfig};

/// Backend used when `LOCKSHOP_API_BASE_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3002";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Lockshop client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL
    pub api_base_url: Url,
    /// How visitor inquiries are delivered
    pub contact_channel: ContactChannel,
    /// File holding the admin session token
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is malformed, or if the email-service
    /// channel is selected without its three identifiers.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("LOCKSHOP_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = Url::parse(raw_url.trim()).map_err(|e| {
            ConfigError::InvalidEnvVar("LOCKSHOP_API_BASE_URL".to_string(), e.to_string())
        })?;

        let contact_channel = contact_channel_from(&lookup)?;

        let session_file = lookup("LOCKSHOP_SESSION_FILE")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| default_session_file(lookup("HOME")), PathBuf::from);

        Ok(Self {
            api_base_url,
            contact_channel,
            session_file,
        })
    }
}

fn contact_channel_from(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<ContactChannel, ConfigError> {
    let choice = lookup("LOCKSHOP_CONTACT_CHANNEL").unwrap_or_else(|| "backend".to_string());

    match choice.trim().to_ascii_lowercase().as_str() {
        "" | "backend" => Ok(ContactChannel::Backend),
        "email-service" | "emailjs" => {
            let required = |key: &str| {
                lookup(key)
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
            };
            let mut config = EmailServiceConfig::new(
                required("EMAILJS_SERVICE_ID")?,
                required("EMAILJS_TEMPLATE_ID")?,
                required("EMAILJS_PUBLIC_KEY")?,
            );
            if let Some(endpoint) = lookup("EMAILJS_ENDPOINT").filter(|v| !v.trim().is_empty()) {
                config = config.with_endpoint(endpoint);
            }
            Ok(ContactChannel::EmailService(config))
        }
        other => Err(ConfigError::InvalidEnvVar(
            "LOCKSHOP_CONTACT_CHANNEL".to_string(),
            format!("expected `backend` or `email-service`, got `{other}`"),
        )),
    }
}

fn default_session_file(home: Option<String>) -> PathBuf {
    home.filter(|h| !h.is_empty()).map_or_else(
        || PathBuf::from(".lockshop-session.json"),
        |h| PathBuf::from(h).join(".lockshop").join("session.json"),
    )
}
