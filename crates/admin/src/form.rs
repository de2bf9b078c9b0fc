//! The product create/edit form.
//!
//! Fields hold exactly what the operator typed. Nothing is parsed until
//! [`ProductForm::to_submission`], which is the single place validation
//! happens, so a rejected form never reaches the network.

use lockshop_client::{ImageUpload, ProductSubmission};
use lockshop_core::{Category, Price, PriceError, Product, ProductId};
use thiserror::Error;

/// Reasons a form is refused before submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Product name is required.")]
    MissingName,

    #[error("Description is required.")]
    MissingDescription,

    #[error("Price must be a whole number of RWF.")]
    InvalidPrice(#[source] PriceError),

    #[error("Please select an image for the new product.")]
    MissingImage,
}

/// Whether the form creates a new product or edits an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Edit(ProductId),
}

impl FormMode {
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        matches!(self, Self::Edit(_))
    }
}

/// State of the admin product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub mode: FormMode,
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: Category,
    /// One feature per line.
    pub key_features: String,
    pub material: String,
    pub compatibility: String,
    pub best_for: String,
    pub warranty: String,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// A blank form in create mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A form in edit mode pre-populated from `product`.
    ///
    /// The image starts empty; leaving it empty keeps the stored image.
    #[must_use]
    pub fn edit_from(product: &Product) -> Self {
        let attrs = &product.attributes;
        Self {
            mode: FormMode::Edit(product.id.clone()),
            name: product.name.clone(),
            description: product.description.clone(),
            price: if product.price == Price::ZERO {
                String::new()
            } else {
                product.price.amount().to_string()
            },
            category: product.category,
            key_features: attrs.key_features.join("\n"),
            material: attrs.material.clone().unwrap_or_default(),
            compatibility: attrs.compatibility.clone().unwrap_or_default(),
            best_for: attrs.best_for.clone().unwrap_or_default(),
            warranty: attrs.warranty.clone().unwrap_or_default(),
            image: None,
        }
    }

    /// Key features as a list: one per non-blank line, trimmed.
    #[must_use]
    pub fn feature_lines(&self) -> Vec<String> {
        self.key_features
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Validate the form and build the request payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] found.
    pub fn to_submission(&self) -> Result<ProductSubmission, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingName);
        }
        if self.description.trim().is_empty() {
            return Err(FormError::MissingDescription);
        }
        let price = Price::parse_input(&self.price).map_err(FormError::InvalidPrice)?;
        if self.mode == FormMode::Create && self.image.is_none() {
            return Err(FormError::MissingImage);
        }

        Ok(ProductSubmission {
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
            price,
            category: self.category,
            key_features: self.feature_lines(),
            material: self.material.trim().to_owned(),
            compatibility: self.compatibility.trim().to_owned(),
            best_for: self.best_for.trim().to_owned(),
            warranty: self.warranty.trim().to_owned(),
            image: self.image.clone(),
        })
    }
}
