//! Catalog product as returned by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, CategoryFilter, Price, ProductId};

/// Optional descriptive attributes shown on the product detail view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttributes {
    /// Ordered list of selling points.
    #[serde(default, deserialize_with = "features_or_empty")]
    pub key_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_for: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty: Option<String>,
}

/// A catalog entry.
///
/// Owned by the backend; the client only ever holds a copy. The wire format
/// is camelCase JSON with the id under `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub category: Category,
    /// Server path (`/uploads/..`) or absolute URL.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub image: String,
    #[serde(flatten)]
    pub attributes: ProductAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Absolute URL for the product image.
    ///
    /// References that already start with `http` are returned as-is;
    /// server paths are joined onto `base_url`.
    #[must_use]
    pub fn image_url(&self, base_url: &str) -> String {
        if self.image.starts_with("http") {
            return self.image.clone();
        }
        let base = base_url.trim_end_matches('/');
        if self.image.starts_with('/') {
            format!("{base}{}", self.image)
        } else {
            format!("{base}/{}", self.image)
        }
    }

    /// Features to list on the detail view, falling back to the description
    /// when none were entered.
    #[must_use]
    pub fn display_features(&self) -> Vec<&str> {
        if self.attributes.key_features.is_empty() {
            vec![self.description.as_str()]
        } else {
            self.attributes
                .key_features
                .iter()
                .map(String::as_str)
                .collect()
        }
    }

    /// The catalog predicate: category passes `filter` and the name contains
    /// `search`, ignoring case.
    #[must_use]
    pub fn matches(&self, filter: CategoryFilter, search: &str) -> bool {
        filter.accepts(self.category)
            && self.name.to_lowercase().contains(&search.to_lowercase())
    }

    /// `YYYY-MM` bucket of the creation time, if the server recorded one.
    #[must_use]
    pub fn created_month(&self) -> Option<String> {
        self.created_at.map(|t| t.format("%Y-%m").to_string())
    }
}

/// Accept a feature array, or treat anything else (a bare string, `null`)
/// as "no features".
fn features_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "_id": "66a1",
            "name": "Biometric Lock",
            "description": "Fingerprint recognition biometric lock system",
            "price": 75000,
            "category": "Smart Locks",
            "image": "/uploads/15.jpeg",
            "keyFeatures": ["Fingerprint", "Backup key"],
            "material": "Zinc alloy",
            "warranty": "2 years",
            "createdAt": "2025-03-14T09:30:00.000Z",
            "__v": 0
        }"#
    }

    #[test]
    fn test_deserialize_backend_document() {
        let product: Product = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(product.id.as_str(), "66a1");
        assert_eq!(product.price, Price::new(75_000));
        assert_eq!(product.category, Category::SmartLocks);
        assert_eq!(product.attributes.key_features, ["Fingerprint", "Backup key"]);
        assert_eq!(product.attributes.material.as_deref(), Some("Zinc alloy"));
        assert_eq!(product.attributes.compatibility, None);
        assert_eq!(product.created_month().as_deref(), Some("2025-03"));
    }

    #[test]
    fn test_deserialize_sparse_document() {
        let product: Product =
            serde_json::from_str(r#"{"_id": "x", "name": "Hinge", "keyFeatures": "oops"}"#)
                .unwrap();
        assert_eq!(product.price, Price::ZERO);
        assert_eq!(product.category, Category::General);
        assert!(product.image.is_empty());
        assert!(product.attributes.key_features.is_empty());
        assert!(product.created_at.is_none());
    }

    #[test]
    fn test_id_alias() {
        let product: Product = serde_json::from_str(r#"{"id": "y", "name": "Handle"}"#).unwrap();
        assert_eq!(product.id.as_str(), "y");
    }

    #[test]
    fn test_image_url() {
        let mut product: Product = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(
            product.image_url("http://localhost:3002/"),
            "http://localhost:3002/uploads/15.jpeg"
        );

        product.image = "uploads/16.jpeg".to_owned();
        assert_eq!(
            product.image_url("http://localhost:3002"),
            "http://localhost:3002/uploads/16.jpeg"
        );

        product.image = "https://cdn.example.com/a.png".to_owned();
        assert_eq!(
            product.image_url("http://localhost:3002"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_display_features_falls_back_to_description() {
        let mut product: Product = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(product.display_features(), ["Fingerprint", "Backup key"]);

        product.attributes.key_features.clear();
        assert_eq!(
            product.display_features(),
            ["Fingerprint recognition biometric lock system"]
        );
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let product: Product = serde_json::from_str(sample_json()).unwrap();
        assert!(product.matches(CategoryFilter::All, ""));
        assert!(product.matches(CategoryFilter::All, "BIOMETRIC"));
        assert!(product.matches(Category::SmartLocks.into(), "lock"));
        assert!(!product.matches(Category::DoorHardware.into(), "lock"));
        assert!(!product.matches(CategoryFilter::All, "deadbolt"));
    }
}
