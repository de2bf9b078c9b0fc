//! Public catalogue commands.

use lockshop_client::{ApiClient, ClientConfig};
use lockshop_core::{CategoryFilter, LoadState, Product, ProductId};
use lockshop_storefront::CatalogView;

/// List products passing `category` and `search`.
///
/// # Errors
///
/// Returns an error if the catalogue could not be fetched.
pub async fn list(
    config: &ClientConfig,
    category: CategoryFilter,
    search: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = ApiClient::from_config(config);
    let mut catalog = CatalogView::new();
    catalog.load(&api).await;
    fail_on_error(catalog.state())?;

    catalog.set_category(category);
    catalog.set_search(search);
    print_listing(&catalog.visible(), &catalog.result_summary());
    Ok(())
}

/// Show the detail view for one product.
///
/// # Errors
///
/// Returns an error if the catalogue could not be fetched or has no product
/// with this ID.
pub async fn show(config: &ClientConfig, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let api = ApiClient::from_config(config);
    let mut catalog = CatalogView::new();
    catalog.load(&api).await;
    fail_on_error(catalog.state())?;

    if !catalog.open_detail(&ProductId::new(id)) {
        return Err(format!("No product with ID {id}").into());
    }
    if let Some(product) = catalog.selected() {
        print_detail(product, api.base_url().as_str());
    }
    Ok(())
}

fn fail_on_error(state: &LoadState<Vec<Product>>) -> Result<(), Box<dyn std::error::Error>> {
    match state.error() {
        Some(message) => Err(message.to_owned().into()),
        None => Ok(()),
    }
}

/// Print one line per product followed by the results counter.
#[allow(clippy::print_stdout)]
pub fn print_listing(products: &[&Product], summary: &str) {
    if products.is_empty() {
        println!("No products found.");
    }
    for product in products {
        println!(
            "{:<26} {:<40} {:<16} {:>14}",
            product.id.as_str(),
            product.name,
            product.category.label(),
            product.price.to_string()
        );
    }
    println!("{summary}");
}

#[allow(clippy::print_stdout)]
fn print_detail(product: &Product, base_url: &str) {
    let attrs = &product.attributes;
    println!("{}", product.name);
    println!("  Category:      {}", product.category);
    println!("  Price:         {}", product.price);
    println!("  Image:         {}", product.image_url(base_url));
    if !product.description.is_empty() {
        println!("  Description:   {}", product.description);
    }
    println!("  Key features:");
    for feature in product.display_features() {
        println!("    - {feature}");
    }
    let optional = [
        ("Material", &attrs.material),
        ("Compatibility", &attrs.compatibility),
        ("Best for", &attrs.best_for),
        ("Warranty", &attrs.warranty),
    ];
    for (label, value) in optional {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            println!("  {:<14} {value}", format!("{label}:"));
        }
    }
}
