//! Client errors and the status strings derived from them.

use std::path::PathBuf;

use thiserror::Error;

/// Shown when a request never completed.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Shown when the backend answered but the reply couldn't be read.
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from the server.";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connection refused, DNS, reset...).
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        /// The `message` field of the JSON error body, when there was one.
        message: Option<String>,
    },

    /// A success response whose body wasn't the expected JSON.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The request could not be assembled.
    #[error("could not build request: {0}")]
    Request(String),

    /// The third-party email service declined the message.
    #[error("email service rejected the message: {0}")]
    Provider(String),

    /// The image attached to a product mutation could not be read.
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl ApiError {
    /// Human-readable status line for this failure.
    ///
    /// Backend-supplied messages win; otherwise transport problems get the
    /// generic network message, unreadable replies get their own line, and
    /// everything else gets `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_owned(),
            Self::Decode(_) => UNEXPECTED_RESPONSE_MESSAGE.to_owned(),
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Image(e) => e.to_string(),
            Self::Status { .. } | Self::Request(_) | Self::Provider(_) => fallback.to_owned(),
        }
    }

    /// HTTP status, if the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else if e.is_builder() {
            Self::Request(e.to_string())
        } else {
            Self::Network(e)
        }
    }
}

/// Errors reading an image file for upload.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Could not read image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image path {0} has no file name")]
    NoFileName(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_from_body_wins() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Name is required".to_string()),
        };
        assert_eq!(err.user_message("Upload failed"), "Name is required");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_status_without_message_uses_fallback() {
        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Delete failed"), "Delete failed");

        let blank = ApiError::Status {
            status: 401,
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message("Update failed"), "Update failed");
    }

    #[test]
    fn test_decode_has_its_own_message() {
        let err = ApiError::Decode("expected value at line 1".to_string());
        assert_eq!(err.user_message("Upload failed"), UNEXPECTED_RESPONSE_MESSAGE);
        assert_ne!(err.user_message("Upload failed"), NETWORK_ERROR_MESSAGE);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_display_includes_status() {
        let err = ApiError::Status {
            status: 404,
            message: Some("Product not found".to_string()),
        };
        assert_eq!(err.to_string(), "backend returned HTTP 404: Product not found");
    }
}
