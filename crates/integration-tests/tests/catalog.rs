//! Integration tests for the public catalogue.

use lockshop_core::{Category, CategoryFilter, LoadState, Price, ProductId};
use lockshop_integration_tests::{MockBackend, sample_products};
use serde_json::json;
use lockshop_storefront::CatalogView;

#[tokio::test]
async fn test_catalog_loads_without_token() {
    let backend = MockBackend::with_products(sample_products()).await;
    let mut catalog = CatalogView::new();
    catalog.load(&backend.api()).await;

    assert!(catalog.state().is_ready());
    assert_eq!(catalog.visible().len(), 4);
    assert_eq!(catalog.result_summary(), "Showing 4 products");

    let requests = backend.requests_to("GET", "/api/products");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].authorization.is_none());
}

#[tokio::test]
async fn test_filters_apply_to_fetched_list() {
    let backend = MockBackend::with_products(sample_products()).await;
    let mut catalog = CatalogView::new();
    catalog.load(&backend.api()).await;

    catalog.set_category(CategoryFilter::Only(Category::DigitalLocks));
    let names: Vec<&str> = catalog.visible().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Digital Door Lock"]);

    catalog.set_category(CategoryFilter::All);
    catalog.set_search("door");
    assert_eq!(catalog.visible().len(), 2);
    assert_eq!(catalog.result_summary(), "Showing 2 products");

    // Filtering never goes back to the server.
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_empty_catalog_is_ready_not_failed() {
    let backend = MockBackend::start().await;
    let mut catalog = CatalogView::new();
    catalog.load(&backend.api()).await;

    assert!(matches!(catalog.state(), LoadState::Ready(products) if products.is_empty()));
    assert_eq!(catalog.result_summary(), "Showing 0 products");
}

#[tokio::test]
async fn test_server_error_is_failed_state() {
    let backend = MockBackend::with_products(sample_products()).await;
    backend.fail_with(500, None);

    let mut catalog = CatalogView::new();
    catalog.load(&backend.api()).await;

    assert_eq!(catalog.state().error(), Some("Could not load products"));
    assert!(catalog.visible().is_empty());
}

#[tokio::test]
async fn test_malformed_price_does_not_blank_catalog() {
    let backend = MockBackend::with_products(vec![
        json!({"_id": "p1", "name": "Euro Cylinder Lock", "price": 1000}),
        json!({"_id": "p2", "name": "Padlock", "price": "15,000"}),
    ])
    .await;
    let mut catalog = CatalogView::new();
    catalog.load(&backend.api()).await;

    assert!(catalog.state().is_ready());
    let prices: Vec<Price> = catalog.visible().iter().map(|p| p.price).collect();
    assert_eq!(prices, [Price::new(1_000), Price::ZERO]);
    assert_eq!(catalog.result_summary(), "Showing 2 products");
}

#[tokio::test]
async fn test_detail_view_resolves_images_and_features() {
    let backend = MockBackend::with_products(sample_products()).await;
    let api = backend.api();
    let mut catalog = CatalogView::new();
    catalog.load(&api).await;

    assert!(catalog.open_detail(&ProductId::new("p1")));
    let product = catalog.selected().expect("detail open");
    assert_eq!(
        product.image_url(api.base_url().as_str()),
        format!("{}uploads/10.jpeg", backend.base_url())
    );
    assert_eq!(product.display_features(), ["High-quality euro cylinder lock"]);

    assert!(catalog.open_detail(&ProductId::new("p2")));
    let product = catalog.selected().expect("detail open");
    assert_eq!(
        product.image_url(api.base_url().as_str()),
        "https://cdn.example.com/11.jpeg"
    );
    assert_eq!(product.display_features(), ["Keypad", "Backup key"]);
}
