//! Public product catalog.
//!
//! Products are fetched once and filtered locally: there is no pagination
//! and no server-side search. Filtering is recomputed from the current
//! category and search text on every call to [`CatalogView::visible`].

use lockshop_client::ApiClient;
use lockshop_core::{CategoryFilter, LoadState, Product, ProductId};
use tracing::{info, instrument, warn};

/// State of the catalog page.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    products: LoadState<Vec<Product>>,
    category: CategoryFilter,
    search: String,
    selected: Option<Product>,
}

impl CatalogView {
    /// An empty catalog in the `Pending` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog already holding `products` (for previews and tests).
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: LoadState::Ready(products),
            ..Self::default()
        }
    }

    /// Fetch the public product list.
    ///
    /// Moves to `Ready` (possibly empty) on success and `Failed` otherwise.
    #[instrument(skip_all)]
    pub async fn load(&mut self, api: &ApiClient) {
        self.products = LoadState::Pending;
        match api.list_products(None).await {
            Ok(products) => {
                info!(count = products.len(), "Catalog loaded");
                self.products = LoadState::Ready(products);
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed");
                self.products = LoadState::Failed(e.user_message("Could not load products"));
            }
        }
    }

    /// Current load state.
    #[must_use]
    pub const fn state(&self) -> &LoadState<Vec<Product>> {
        &self.products
    }

    #[must_use]
    pub const fn category(&self) -> CategoryFilter {
        self.category
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Switch the category tab.
    pub const fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    /// Replace the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Products passing the current category and search, in fetch order.
    ///
    /// Empty unless the catalog is `Ready`.
    #[must_use]
    pub fn visible(&self) -> Vec<&Product> {
        self.products.ready().map_or_else(Vec::new, |products| {
            products
                .iter()
                .filter(|p| p.matches(self.category, &self.search))
                .collect()
        })
    }

    /// The results counter under the filters.
    #[must_use]
    pub fn result_summary(&self) -> String {
        let count = self.visible().len();
        let noun = if count == 1 { "product" } else { "products" };
        format!("Showing {count} {noun}")
    }

    /// Open the detail view for a visible product.
    ///
    /// Keeps a snapshot of the product. Returns `false` if `id` isn't among
    /// the visible products, leaving any current selection untouched.
    pub fn open_detail(&mut self, id: &ProductId) -> bool {
        let Some(product) = self.visible().into_iter().find(|p| &p.id == id).cloned() else {
            return false;
        };
        self.selected = Some(product);
        true
    }

    /// Close the detail view.
    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    /// The product shown in the detail view, if one is open.
    #[must_use]
    pub const fn selected(&self) -> Option<&Product> {
        self.selected.as_ref()
    }
}
