//! Lockshop Admin library.
//!
//! The operator side of the shop: a token-gated console for managing the
//! catalogue, analytics derived from the product list, and a batch importer.
//!
//! # Security
//!
//! The admin token is a bearer credential stored in plain JSON on the
//! operator's machine. It grants create, update and delete on every product.
//! Nothing here checks it locally beyond its presence; the backend decides.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod console;
pub mod error;
pub mod form;
pub mod import;
pub mod session;

pub use analytics::AnalyticsReport;
pub use console::{AdminConsole, Confirm, Status, login};
pub use error::AdminError;
pub use form::{FormError, FormMode, ProductForm};
pub use import::{ImportError, ImportReport, ManifestEntry, import_products, load_manifest};
pub use session::{FileSessionStore, MemorySessionStore, SessionError, SessionStore};
