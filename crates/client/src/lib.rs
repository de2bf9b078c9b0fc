//! Lockshop Client - HTTP access to the product and contact backend.
//!
//! # Modules
//!
//! - [`api`] - [`ApiClient`], one method per backend operation
//! - [`config`] - Environment configuration ([`ClientConfig`])
//! - [`contact`] - Visitor messages and the two delivery channels
//! - [`error`] - [`ApiError`] and the status strings shown to users
//! - [`session`] - The admin bearer token
//! - [`submission`] - Product create/update payloads and image uploads
//!
//! # Error handling
//!
//! Every failure is terminal for the user action that caused it: there is
//! no retry, no backoff and no request timeout. Callers turn an [`ApiError`]
//! into a status line with [`ApiError::user_message`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod contact;
pub mod error;
pub mod session;
pub mod submission;

pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use contact::{ContactChannel, ContactMessage, EmailServiceConfig};
pub use error::{ApiError, ImageError};
pub use session::SessionToken;
pub use submission::{ImageUpload, ProductSubmission};
