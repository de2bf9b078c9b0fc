//! Visitor inquiries and the two ways of delivering them.
//!
//! A deployment picks exactly one [`ContactChannel`]: the backend's mail
//! endpoint, or a third-party email service called directly.

use serde::Serialize;

use crate::api::ApiClient;
use crate::error::ApiError;

/// Default endpoint of the third-party email service.
pub const DEFAULT_EMAIL_SERVICE_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// A visitor inquiry, as posted to `/send-email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Credentials for the third-party email service.
///
/// All three identifiers are public (they ship to browsers in the web
/// storefront), so nothing here is treated as secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailServiceConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub endpoint: String,
}

impl EmailServiceConfig {
    #[must_use]
    pub fn new(service_id: String, template_id: String, public_key: String) -> Self {
        Self {
            service_id,
            template_id,
            public_key,
            endpoint: DEFAULT_EMAIL_SERVICE_ENDPOINT.to_owned(),
        }
    }

    /// Point at a different endpoint (tests, regional hosts).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Request body understood by the email service.
#[derive(Debug, Serialize)]
pub(crate) struct EmailServiceRequest<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub user_id: &'a str,
    pub template_params: TemplateParams<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TemplateParams<'a> {
    pub from_name: &'a str,
    pub from_email: &'a str,
    pub phone: &'a str,
    pub message: &'a str,
}

impl<'a> EmailServiceRequest<'a> {
    pub(crate) fn new(config: &'a EmailServiceConfig, message: &'a ContactMessage) -> Self {
        Self {
            service_id: &config.service_id,
            template_id: &config.template_id,
            user_id: &config.public_key,
            template_params: TemplateParams {
                from_name: &message.name,
                from_email: &message.email,
                phone: &message.phone,
                message: &message.message,
            },
        }
    }
}

/// What the email service reports back.
///
/// The service answers with a short text body; delivery succeeded only when
/// that text is `OK`, whatever the HTTP status says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailServiceResponse {
    pub status: u16,
    pub text: String,
}

impl EmailServiceResponse {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.text.trim() == "OK"
    }
}

/// Delivery strategy for visitor inquiries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContactChannel {
    /// `POST /send-email` on the backend; success is a 2xx status.
    #[default]
    Backend,
    /// Direct call to the third-party email service.
    EmailService(EmailServiceConfig),
}

impl ContactChannel {
    /// Deliver one message through this channel.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the chosen transport.
    pub async fn deliver(&self, api: &ApiClient, message: &ContactMessage) -> Result<(), ApiError> {
        match self {
            Self::Backend => api.send_contact(message).await,
            Self::EmailService(config) => api.send_via_email_service(config, message).await,
        }
    }

    /// Short name for logs and `--help` output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::EmailService(_) => "email-service",
        }
    }
}
