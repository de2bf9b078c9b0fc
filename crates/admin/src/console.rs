//! Admin console: list, create, edit and delete products.
//!
//! Every mutation is followed by a full reload of the list rather than a
//! local patch, so the console always shows what the backend holds.

use std::sync::Arc;

use lockshop_client::{ApiClient, SessionToken};
use lockshop_core::{LoadState, Product, ProductId};
use tracing::{error, info, instrument, warn};

use crate::error::AdminError;
use crate::form::{FormMode, ProductForm};
use crate::session::SessionStore;

pub const UPLOADED_MESSAGE: &str = "Product uploaded successfully!";
pub const UPDATED_MESSAGE: &str = "Product updated successfully!";
pub const DELETED_MESSAGE: &str = "Product deleted successfully!";
pub const UPLOAD_FAILED: &str = "Upload failed";
pub const UPDATE_FAILED: &str = "Update failed";
pub const DELETE_FAILED: &str = "Delete failed";

/// Question asked before a product is deleted.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this product?";

/// Asks the operator to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Outcome line shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success(String),
    Failure(String),
}

impl Status {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Store the token an operator pasted in.
///
/// # Errors
///
/// Returns [`AdminError::EmptyToken`] for a blank token, or a session error
/// if the store can't be written.
pub fn login(store: &dyn SessionStore, raw_token: &str) -> Result<(), AdminError> {
    let token = SessionToken::new(raw_token).ok_or(AdminError::EmptyToken)?;
    store.save(&token)?;
    info!("Admin logged in");
    Ok(())
}

/// An authenticated admin session.
pub struct AdminConsole {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
    token: SessionToken,
    products: LoadState<Vec<Product>>,
    form: ProductForm,
    status: Option<Status>,
}

impl std::fmt::Debug for AdminConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConsole")
            .field("products", &self.products)
            .field("form", &self.form)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl AdminConsole {
    /// Open the console.
    ///
    /// Only checks that a token is stored; the backend judges whether it is
    /// still good on the first request.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] when no token is stored.
    pub fn mount(api: ApiClient, store: Arc<dyn SessionStore>) -> Result<Self, AdminError> {
        let Some(token) = store.load()? else {
            warn!("Admin console opened without a session");
            return Err(AdminError::NotAuthenticated);
        };

        Ok(Self {
            api,
            store,
            token,
            products: LoadState::Pending,
            form: ProductForm::new(),
            status: None,
        })
    }

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns a session error if the store can't be written.
    pub fn logout(self) -> Result<(), AdminError> {
        self.store.clear()?;
        info!("Admin logged out");
        Ok(())
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Refetch the product list.
    #[instrument(skip_all)]
    pub async fn refresh(&mut self) {
        match self.api.list_products(Some(&self.token)).await {
            Ok(products) => {
                info!(count = products.len(), "Admin product list loaded");
                self.products = LoadState::Ready(products);
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch products");
                self.products = LoadState::Failed(e.user_message("Could not load products"));
            }
        }
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<Vec<Product>> {
        &self.products
    }

    /// The last fetched list; empty until a fetch succeeds.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.products
            .ready()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    #[must_use]
    pub const fn form(&self) -> &ProductForm {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    /// Load a listed product into the form for editing.
    ///
    /// Returns `false` if the product isn't in the current list.
    pub fn begin_edit(&mut self, id: &ProductId) -> bool {
        let Some(product) = self.products().iter().find(|p| &p.id == id) else {
            return false;
        };
        self.form = ProductForm::edit_from(product);
        true
    }

    /// Leave edit mode and clear the form.
    pub fn cancel_edit(&mut self) {
        self.form = ProductForm::new();
    }

    /// Create or update depending on the form mode.
    ///
    /// A form that fails validation is reported without any request.
    #[instrument(skip_all, fields(edit = self.form.mode.is_edit()))]
    pub async fn submit(&mut self) -> Status {
        let submission = match self.form.to_submission() {
            Ok(submission) => submission,
            Err(e) => return self.set_status(Status::Failure(e.to_string())),
        };

        let (result, success, fallback) = match &self.form.mode {
            FormMode::Create => (
                self.api.create_product(&self.token, &submission).await,
                UPLOADED_MESSAGE,
                UPLOAD_FAILED,
            ),
            FormMode::Edit(id) => (
                self.api.update_product(&self.token, id, &submission).await,
                UPDATED_MESSAGE,
                UPDATE_FAILED,
            ),
        };

        match result {
            Ok(_) => {
                info!(name = %submission.name, "{success}");
                self.form = ProductForm::new();
                self.refresh().await;
                self.set_status(Status::Success(success.to_owned()))
            }
            Err(e) => {
                error!(error = %e, "{fallback}");
                self.set_status(Status::Failure(e.user_message(fallback)))
            }
        }
    }

    /// Delete a product once the operator confirms.
    ///
    /// Returns `None` without any request when confirmation is declined.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete(&mut self, id: &ProductId, confirm: &dyn Confirm) -> Option<Status> {
        if !confirm.confirm(DELETE_PROMPT) {
            info!("Delete cancelled");
            return None;
        }

        match self.api.delete_product(&self.token, id).await {
            Ok(()) => {
                info!("Product deleted");
                self.refresh().await;
                Some(self.set_status(Status::Success(DELETED_MESSAGE.to_owned())))
            }
            Err(e) => {
                error!(error = %e, "Delete failed");
                Some(self.set_status(Status::Failure(e.user_message(DELETE_FAILED))))
            }
        }
    }

    fn set_status(&mut self, status: Status) -> Status {
        self.status = Some(status.clone());
        status
    }
}
