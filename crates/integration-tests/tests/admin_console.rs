//! Integration tests for the admin console and batch import.

use std::sync::Arc;
use std::time::Duration;

use lockshop_admin::console::{DELETED_MESSAGE, UPDATED_MESSAGE, UPLOADED_MESSAGE};
use lockshop_admin::{
    AdminConsole, AdminError, AnalyticsReport, FormMode, MemorySessionStore, SessionStore, Status,
    import_products, load_manifest,
};
use lockshop_client::{ImageUpload, SessionToken};
use lockshop_core::{Category, Price, ProductId};
use lockshop_integration_tests::{MockBackend, sample_products};

const TOKEN: &str = "admin-token-123";

fn store() -> Arc<dyn SessionStore> {
    Arc::new(MemorySessionStore::with_token(
        SessionToken::new(TOKEN).expect("non-empty token"),
    ))
}

async fn console_for(backend: &MockBackend) -> AdminConsole {
    let mut console = AdminConsole::mount(backend.api(), store()).expect("token stored");
    console.refresh().await;
    console
}

// ============================================================================
// Session gate
// ============================================================================

#[tokio::test]
async fn test_mount_without_token_makes_no_request() {
    let backend = MockBackend::start().await;
    let result = AdminConsole::mount(backend.api(), Arc::new(MemorySessionStore::new()));

    assert!(matches!(result, Err(AdminError::NotAuthenticated)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_refresh_sends_bearer_token() {
    let backend = MockBackend::with_products(sample_products()).await;
    let console = console_for(&backend).await;

    assert_eq!(console.products().len(), 4);
    let requests = backend.requests_to("GET", "/api/products");
    assert!(requests[0].has_bearer(TOKEN));
}

// ============================================================================
// Create & update
// ============================================================================

#[tokio::test]
async fn test_create_without_image_sends_nothing() {
    let backend = MockBackend::start().await;
    let mut console = console_for(&backend).await;
    let form = console.form_mut();
    form.name = "Keypad Lock".to_string();
    form.description = "PIN entry".to_string();

    let status = console.submit().await;

    assert!(!status.is_success());
    assert!(backend.requests_to("POST", "/api/products").is_empty());
}

#[tokio::test]
async fn test_create_posts_multipart_and_reloads() {
    let backend = MockBackend::start().await;
    let mut console = console_for(&backend).await;
    let form = console.form_mut();
    form.name = "Keypad Lock".to_string();
    form.description = "Electronic keypad lock".to_string();
    form.price = "38000".to_string();
    form.category = Category::DigitalLocks;
    form.key_features = "Backup key\n\n PIN codes \n".to_string();
    form.warranty = "1 year".to_string();
    form.image = Some(ImageUpload::new("keypad_lock.jpeg", vec![0xff, 0xd8, 0xff]));

    let status = console.submit().await;
    assert_eq!(status, Status::Success(UPLOADED_MESSAGE.to_string()));

    let posts = backend.requests_to("POST", "/api/products");
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert!(post.has_bearer(TOKEN));
    assert_eq!(post.fields["name"], "Keypad Lock");
    assert_eq!(post.fields["price"], "38000");
    assert_eq!(post.fields["category"], "Digital Locks");
    assert_eq!(post.fields["keyFeatures"], r#"["Backup key","PIN codes"]"#);
    assert_eq!(post.fields["warranty"], "1 year");
    assert_eq!(post.fields["material"], "");
    assert_eq!(post.files.len(), 1);
    assert_eq!(post.files[0].field, "image");
    assert_eq!(post.files[0].file_name, "keypad_lock.jpeg");
    assert_eq!(post.files[0].content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(post.files[0].len, 3);

    // Form reset and the list was fetched again after the upload.
    assert_eq!(console.form().name, "");
    assert_eq!(backend.requests_to("GET", "/api/products").len(), 2);
    assert_eq!(console.products().len(), 1);
    assert_eq!(console.products()[0].price, Price::new(38_000));
}

#[tokio::test]
async fn test_update_without_image_keeps_existing_image() {
    let backend = MockBackend::with_products(sample_products()).await;
    let mut console = console_for(&backend).await;

    assert!(console.begin_edit(&ProductId::new("p4")));
    assert_eq!(console.form().mode, FormMode::Edit(ProductId::new("p4")));
    assert_eq!(console.form().material, "Zinc alloy");
    console.form_mut().price = "250000".to_string();

    let status = console.submit().await;
    assert_eq!(status, Status::Success(UPDATED_MESSAGE.to_string()));

    let puts = backend.requests_to("PUT", "/api/products/p4");
    assert_eq!(puts.len(), 1);
    assert!(puts[0].has_bearer(TOKEN));
    assert!(puts[0].files.is_empty());
    assert_eq!(puts[0].fields["price"], "250000");

    let updated = console
        .products()
        .iter()
        .find(|p| p.id.as_str() == "p4")
        .expect("still listed");
    assert_eq!(updated.price, Price::new(250_000));
    assert_eq!(updated.image, "/uploads/face_lock.jpeg");
    assert_eq!(console.form().mode, FormMode::Create);
}

#[tokio::test]
async fn test_server_message_becomes_status() {
    let backend = MockBackend::with_products(sample_products()).await;
    let mut console = console_for(&backend).await;
    assert!(console.begin_edit(&ProductId::new("p1")));

    backend.fail_with(403, Some("Token expired"));
    let status = console.submit().await;
    assert_eq!(status, Status::Failure("Token expired".to_string()));

    backend.fail_with(500, None);
    let status = console.submit().await;
    assert_eq!(status, Status::Failure("Update failed".to_string()));

    // Edit mode survives a failed submit.
    assert!(console.form().mode.is_edit());
}

#[tokio::test]
async fn test_cancel_edit_resets_form() {
    let backend = MockBackend::with_products(sample_products()).await;
    let mut console = console_for(&backend).await;

    assert!(console.begin_edit(&ProductId::new("p2")));
    assert_eq!(console.form().key_features, "Keypad\nBackup key");
    console.cancel_edit();
    assert_eq!(console.form().mode, FormMode::Create);
    assert!(console.form().name.is_empty());
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let backend = MockBackend::with_products(sample_products()).await;
    let mut console = console_for(&backend).await;

    let outcome = console.delete(&ProductId::new("p1"), &|_: &str| false).await;

    assert!(outcome.is_none());
    assert!(backend.requests_to("DELETE", "/api/products/p1").is_empty());
    assert_eq!(backend.products().len(), 4);
}

#[tokio::test]
async fn test_confirmed_delete_refetches() {
    let backend = MockBackend::with_products(sample_products()).await;
    let mut console = console_for(&backend).await;

    let outcome = console.delete(&ProductId::new("p1"), &|_: &str| true).await;

    assert_eq!(outcome, Some(Status::Success(DELETED_MESSAGE.to_string())));
    let requests = backend.requests();
    let methods: Vec<&str> = requests.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, ["GET", "DELETE", "GET"]);
    assert!(requests[1].has_bearer(TOKEN));
    assert_eq!(console.products().len(), 3);
}

#[tokio::test]
async fn test_delete_missing_product_reports_server_message() {
    let backend = MockBackend::with_products(sample_products()).await;
    let mut console = console_for(&backend).await;

    let outcome = console.delete(&ProductId::new("nope"), &|_: &str| true).await;
    assert_eq!(outcome, Some(Status::Failure("Product not found".to_string())));
}

#[tokio::test]
async fn test_delete_escapes_reserved_characters_in_id() {
    let backend = MockBackend::with_products(sample_products()).await;
    let mut console = console_for(&backend).await;

    let outcome = console.delete(&ProductId::new("p1?x=1"), &|_: &str| true).await;

    assert_eq!(outcome, Some(Status::Failure("Product not found".to_string())));
    assert!(backend.requests_to("DELETE", "/api/products/p1").is_empty());
    assert_eq!(backend.requests_to("DELETE", "/api/products/p1?x=1").len(), 1);
    assert_eq!(backend.products().len(), 4);
}

// ============================================================================
// Analytics over fetched data
// ============================================================================

#[tokio::test]
async fn test_analytics_from_fetched_products() {
    let backend = MockBackend::with_products(sample_products()).await;
    let console = console_for(&backend).await;
    let report = AnalyticsReport::from_products(console.products());

    assert_eq!(report.summary.total_products, 4);
    assert_eq!(report.summary.total_value, Price::new(478_000));
    assert_eq!(report.summary.average_price, Price::new(119_500));
    assert_eq!(report.summary.category_count, 4);
    let counts: Vec<usize> = report.price_ranges.iter().map(|r| r.count).collect();
    assert_eq!(counts, [1, 1, 1, 1]);
    let months: Vec<&str> = report.monthly.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, ["2024-01", "2024-02"]);
    assert_eq!(report.bar_heights, [50, 100]);
}

// ============================================================================
// Batch import
// ============================================================================

#[tokio::test]
async fn test_import_continues_past_failures() {
    let backend = MockBackend::start().await;
    let dir = std::env::temp_dir().join(format!("lockshop-it-import-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    std::fs::write(dir.join("hinge.jpeg"), [0xff, 0xd8]).expect("write image");
    std::fs::write(dir.join("euro.jpeg"), [0xff, 0xd8]).expect("write image");
    let manifest_path = dir.join("products.yaml");
    std::fs::write(
        &manifest_path,
        "\
- file: hinge.jpeg
  name: Door Hinge
  category: Door Hardware
  price: 3000
  description: Heavy-duty door hinge
- file: missing.jpeg
  name: Ghost Lock
  category: Smart Locks
  price: 1
  description: Not on disk
- file: euro.jpeg
  name: Euro Lock System
  category: Lock Cylinders
  price: 18000
  description: Complete euro lock system with keys
",
    )
    .expect("write manifest");

    let manifest = load_manifest(&manifest_path).expect("valid manifest");
    let token = SessionToken::new(TOKEN).expect("non-empty token");
    let report = import_products(&backend.api(), &token, manifest, &dir, Duration::ZERO).await;

    assert_eq!(report.uploaded, ["Door Hinge", "Euro Lock System"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "Ghost Lock");

    let posts = backend.requests_to("POST", "/api/products");
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p.has_bearer(TOKEN)));
    assert_eq!(posts[1].fields["category"], "Lock Cylinders");
    assert_eq!(posts[1].files[0].file_name, "euro.jpeg");
    assert_eq!(backend.products().len(), 2);

    std::fs::remove_dir_all(dir).expect("clean up");
}

#[tokio::test]
async fn test_import_records_backend_refusals() {
    let backend = MockBackend::start().await;
    backend.fail_with(401, Some("Invalid token"));
    let dir = std::env::temp_dir().join(format!("lockshop-it-refused-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    std::fs::write(dir.join("a.png"), [0x89, 0x50]).expect("write image");
    let manifest_path = dir.join("products.json");
    std::fs::write(&manifest_path, r#"[{"file": "a.png", "name": "Logo Lock Design"}]"#)
        .expect("write manifest");

    let manifest = load_manifest(&manifest_path).expect("valid manifest");
    let token = SessionToken::new(TOKEN).expect("non-empty token");
    let report = import_products(&backend.api(), &token, manifest, &dir, Duration::ZERO).await;

    assert!(report.uploaded.is_empty());
    assert_eq!(
        report.failed,
        [("Logo Lock Design".to_string(), "Invalid token".to_string())]
    );

    std::fs::remove_dir_all(dir).expect("clean up");
}
