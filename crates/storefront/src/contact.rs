//! Contact form.
//!
//! Submits through whichever [`ContactChannel`] the deployment configured.
//! On success every field is cleared; on failure the fields are kept and the
//! visitor is pointed at WhatsApp instead.

use lockshop_client::{ApiClient, ContactChannel, ContactMessage};
use lockshop_core::{Email, EmailError};
use tracing::{error, info, instrument};

/// Status shown after a successful submission.
pub const SENT_MESSAGE: &str = "Message sent successfully!";

/// Status shown after any delivery failure.
pub const FALLBACK_MESSAGE: &str =
    "Failed to send message via email. Please try contacting us via WhatsApp instead.";

/// Client-side rejections, raised before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactFormError {
    #[error("Please enter your name.")]
    MissingName,
    #[error("{0}")]
    InvalidEmail(#[from] EmailError),
    #[error("Please enter your phone number.")]
    MissingPhone,
    #[error("Please enter a message.")]
    MissingMessage,
}

/// State of the contact form.
///
/// [`ContactForm::submit`] holds the form mutably until delivery finishes,
/// so a second submission can't start while one is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    status: Option<String>,
}

impl ContactForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last status line, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Check the fields and build the outgoing message.
    ///
    /// # Errors
    ///
    /// Returns the first [`ContactFormError`] found.
    pub fn validate(&self) -> Result<ContactMessage, ContactFormError> {
        if self.name.trim().is_empty() {
            return Err(ContactFormError::MissingName);
        }
        let email = Email::parse(&self.email)?;
        if self.phone.trim().is_empty() {
            return Err(ContactFormError::MissingPhone);
        }
        if self.message.trim().is_empty() {
            return Err(ContactFormError::MissingMessage);
        }

        Ok(ContactMessage {
            name: self.name.trim().to_owned(),
            email: email.as_str().to_owned(),
            phone: self.phone.trim().to_owned(),
            message: self.message.trim().to_owned(),
        })
    }

    /// Validate and deliver the message.
    ///
    /// Returns `true` when the message was delivered. The outcome is also
    /// left in [`ContactForm::status`].
    #[instrument(skip_all, fields(channel = channel.name()))]
    pub async fn submit(&mut self, api: &ApiClient, channel: &ContactChannel) -> bool {
        self.status = None;

        let message = match self.validate() {
            Ok(message) => message,
            Err(e) => {
                self.status = Some(e.to_string());
                return false;
            }
        };

        match channel.deliver(api, &message).await {
            Ok(()) => {
                info!(email = %message.email, "Contact message sent");
                self.reset_fields();
                self.status = Some(SENT_MESSAGE.to_owned());
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to send contact message");
                self.status = Some(FALLBACK_MESSAGE.to_owned());
                false
            }
        }
    }

    fn reset_fields(&mut self) {
        self.name.clear();
        self.email.clear();
        self.phone.clear();
        self.message.clear();
    }
}
