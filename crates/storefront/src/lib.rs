//! Lockshop Storefront library.
//!
//! View-models behind the public side of the shop. They hold the state a
//! page would hold and expose the transitions a visitor can trigger; the
//! `lockshop` CLI renders them.
//!
//! - [`catalog`] - Product grid with category tabs, search and a detail view
//! - [`contact`] - Contact form submitting through a [`ContactChannel`]
//!
//! [`ContactChannel`]: lockshop_client::ContactChannel

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod contact;

pub use catalog::CatalogView;
pub use contact::{ContactForm, ContactFormError};
