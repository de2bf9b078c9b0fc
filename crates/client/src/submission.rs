//! Product create/update payloads.
//!
//! Both mutations travel as `multipart/form-data` so an image file can ride
//! along with the text fields.

use std::path::Path;

use lockshop_core::{Category, Price};
use reqwest::multipart::{Form, Part};

use crate::error::{ApiError, ImageError};

/// An image file ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Build an upload from bytes already in memory.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for(&file_name);
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read an image from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] if the path has no file name or can't be read.
    pub async fn from_path(path: &Path) -> Result<Self, ImageError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ImageError::NoFileName(path.to_path_buf()))?
            .to_owned();

        let bytes = tokio::fs::read(path).await.map_err(|source| ImageError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::new(file_name, bytes))
    }
}

/// MIME type from the file extension.
fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Validated fields for a product create or update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductSubmission {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Category,
    pub key_features: Vec<String>,
    pub material: String,
    pub compatibility: String,
    pub best_for: String,
    pub warranty: String,
    /// `None` on update keeps the image already stored on the server.
    pub image: Option<ImageUpload>,
}

impl ProductSubmission {
    /// Encode as the multipart form the backend expects.
    ///
    /// `keyFeatures` is sent as a JSON-encoded array string.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] if the feature list can't be encoded or
    /// the image part is rejected.
    pub fn to_form(&self) -> Result<Form, ApiError> {
        let key_features = serde_json::to_string(&self.key_features)
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let mut form = Form::new()
            .text("name", self.name.clone())
            .text("description", self.description.clone())
            .text("price", self.price.amount().to_string())
            .text("category", self.category.label())
            .text("keyFeatures", key_features)
            .text("material", self.material.clone())
            .text("compatibility", self.compatibility.clone())
            .text("bestFor", self.best_for.clone())
            .text("warranty", self.warranty.clone());

        if let Some(image) = &self.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(image.mime_type)
                .map_err(|e| ApiError::Request(e.to_string()))?;
            form = form.part("image", part);
        }

        Ok(form)
    }
}
