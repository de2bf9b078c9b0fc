//! Unified error handling for admin.

use lockshop_client::ApiError;
use thiserror::Error;

use crate::form::FormError;
use crate::import::ImportError;
use crate::session::SessionError;

/// Errors surfaced by the admin console.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No admin token is stored; the operator has to log in first.
    #[error("Not logged in. Run `lockshop admin login` first.")]
    NotAuthenticated,

    /// An empty token was offered at login.
    #[error("Token must not be empty.")]
    EmptyToken,

    /// Reading or writing the session store failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The product form was rejected before any request was made.
    #[error("{0}")]
    Form(#[from] FormError),

    /// The backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The batch import manifest couldn't be used.
    #[error("Import error: {0}")]
    Import(#[from] ImportError),
}
