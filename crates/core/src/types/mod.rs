//! Core types for Lockshop.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod load_state;
pub mod price;
pub mod product;

pub use category::{Category, CategoryError, CategoryFilter};
pub use email::{Email, EmailError};
pub use id::*;
pub use load_state::LoadState;
pub use price::{Price, PriceBucket, PriceError};
pub use product::{Product, ProductAttributes};
