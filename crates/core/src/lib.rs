//! Lockshop Core - Shared domain types.
//!
//! This crate provides the types used across all Lockshop components:
//! - `client` - HTTP client for the product/contact backend
//! - `storefront` - Public catalog and contact form view-models
//! - `admin` - Admin console, analytics and batch import
//! - `cli` - The `lockshop` command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, categories, prices, emails and load states

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
