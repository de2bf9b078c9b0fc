//! Batch product import.
//!
//! Reads a manifest of products, each naming an image file, and uploads
//! them one at a time. A failed entry is logged and recorded; the run keeps
//! going.
//!
//! Manifests are YAML or JSON, chosen by file extension:
//!
//! ```yaml
//! - file: euro_cyl.jpeg
//!   name: Euro Cylinder
//!   category: Lock Cylinders
//!   price: 12000
//!   description: Standard euro profile cylinder lock
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use lockshop_client::{ApiClient, ImageUpload, ProductSubmission, SessionToken};
use lockshop_core::{Category, Price};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, instrument};

/// Pause between uploads when the caller has no preference.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Errors that stop an import before any upload.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML manifest {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON manifest {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One product in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Image file name, relative to the images directory.
    pub file: String,
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub compatibility: String,
    #[serde(default)]
    pub best_for: String,
    #[serde(default)]
    pub warranty: String,
}

impl ManifestEntry {
    fn into_submission(self, image: ImageUpload) -> ProductSubmission {
        ProductSubmission {
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            key_features: self.key_features,
            material: self.material,
            compatibility: self.compatibility,
            best_for: self.best_for,
            warranty: self.warranty,
            image: Some(image),
        }
    }
}

/// Parse a manifest file.
///
/// Files ending in `.json` are read as JSON, everything else as YAML.
///
/// # Errors
///
/// Returns [`ImportError`] if the file can't be read or parsed.
pub fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>, ImportError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&raw).map_err(|source| ImportError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(&raw).map_err(|source| ImportError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Names of products the backend accepted.
    pub uploaded: Vec<String>,
    /// Product name and reason for each failure.
    pub failed: Vec<(String, String)>,
}

impl ImportReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.uploaded.len() + self.failed.len()
    }
}

/// Upload every manifest entry in order, pausing `delay` between uploads.
#[instrument(skip_all, fields(count = manifest.len(), images_dir = %images_dir.display()))]
pub async fn import_products(
    api: &ApiClient,
    token: &SessionToken,
    manifest: Vec<ManifestEntry>,
    images_dir: &Path,
    delay: Duration,
) -> ImportReport {
    let total = manifest.len();
    let mut report = ImportReport::default();
    info!("Starting batch upload of {total} products");

    for (i, entry) in manifest.into_iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let name = entry.name.clone();
        info!("Uploading {}/{total}: {name}", i + 1);

        let image = match ImageUpload::from_path(&images_dir.join(&entry.file)).await {
            Ok(image) => image,
            Err(e) => {
                error!(product = %name, error = %e, "Image could not be read");
                report.failed.push((name, e.to_string()));
                continue;
            }
        };

        let submission = entry.into_submission(image);
        match api.create_product(token, &submission).await {
            Ok(_) => {
                info!(product = %name, "Uploaded");
                report.uploaded.push(name);
            }
            Err(e) => {
                error!(product = %name, error = %e, "Upload failed");
                report.failed.push((name, e.user_message("Upload failed")));
            }
        }
    }

    info!(
        uploaded = report.uploaded.len(),
        failed = report.failed.len(),
        "Batch upload completed"
    );
    report
}
