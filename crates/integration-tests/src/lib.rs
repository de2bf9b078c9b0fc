//! Integration tests for Lockshop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lockshop-integration-tests
//! ```
//!
//! Every test starts its own [`MockBackend`]: an in-process axum server on
//! an ephemeral port that speaks the product API, the mail endpoint and the
//! third-party email service. It records every request it receives, so
//! tests can assert both on what the client did and on what it didn't.
//!
//! # Test Categories
//!
//! - `catalog` - Public product listing and filtering
//! - `contact` - Both contact channels
//! - `admin_console` - Session gate, create/update/delete, batch import

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use lockshop_client::{ApiClient, EmailServiceConfig};
use serde_json::{Value, json};
use url::Url;

/// Timestamp stamped on products the mock creates.
pub const CREATED_AT: &str = "2024-06-01T12:00:00.000Z";

/// A file part received in a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub len: usize,
}

/// One request as the backend saw it.
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Raw `Authorization` header.
    pub authorization: Option<String>,
    /// Parsed JSON body, for JSON requests.
    pub json: Option<Value>,
    /// Text parts of a multipart body.
    pub fields: BTreeMap<String, String>,
    /// File parts of a multipart body.
    pub files: Vec<UploadedFile>,
}

impl RecordedRequest {
    fn new(method: &str, path: impl Into<String>, headers: &HeaderMap) -> Self {
        Self {
            method: method.to_owned(),
            path: path.into(),
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
            ..Self::default()
        }
    }

    /// Whether the request carried `Bearer <token>`.
    #[must_use]
    pub fn has_bearer(&self, token: &str) -> bool {
        self.authorization.as_deref() == Some(format!("Bearer {token}").as_str())
    }
}

#[derive(Default)]
struct BackendState {
    products: Mutex<Vec<Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
    failure: Mutex<Option<(StatusCode, Value)>>,
    email_reply: Mutex<Option<(StatusCode, String)>>,
    next_id: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BackendState {
    fn record(&self, request: RecordedRequest) {
        lock(&self.requests).push(request);
    }

    fn failure(&self) -> Option<Response> {
        lock(&self.failure)
            .clone()
            .map(|(status, body)| (status, Json(body)).into_response())
    }
}

/// In-process stand-in for the shop backend.
pub struct MockBackend {
    base_url: Url,
    state: Arc<BackendState>,
}

impl MockBackend {
    /// Start an empty backend.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        Self::with_products(Vec::new()).await
    }

    /// Start a backend already holding `products`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_products(products: Vec<Value>) -> Self {
        let state = Arc::new(BackendState {
            products: Mutex::new(products),
            ..BackendState::default()
        });

        let app = Router::new()
            .route("/api/products", get(list_products).post(create_product))
            .route("/api/products/{id}", put(update_product).delete(delete_product))
            .route("/send-email", post(send_email))
            .route("/email-service/send", post(email_service))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}")).expect("Invalid mock backend URL");
        Self { base_url, state }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A client pointed at this backend.
    #[must_use]
    pub fn api(&self) -> ApiClient {
        ApiClient::new(self.base_url.clone())
    }

    /// Email-service credentials whose endpoint is this backend.
    #[must_use]
    pub fn email_service(&self) -> EmailServiceConfig {
        EmailServiceConfig::new(
            "service_test".to_string(),
            "template_test".to_string(),
            "public_test".to_string(),
        )
        .with_endpoint(format!("{}email-service/send", self.base_url))
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// Requests with this method and path.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Products currently stored.
    #[must_use]
    pub fn products(&self) -> Vec<Value> {
        lock(&self.state.products).clone()
    }

    /// Answer every API and mail request with `status` and
    /// `{"message": message}` (or an empty object).
    pub fn fail_with(&self, status: u16, message: Option<&str>) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = message.map_or_else(|| json!({}), |m| json!({ "message": m }));
        *lock(&self.state.failure) = Some((status, body));
    }

    /// Stop failing.
    pub fn recover(&self) {
        *lock(&self.state.failure) = None;
    }

    /// What the email-service endpoint answers (default `200 OK`).
    pub fn set_email_service_reply(&self, status: u16, text: &str) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
        *lock(&self.state.email_reply) = Some((status, text.to_owned()));
    }
}

/// Four products, one per price range.
#[must_use]
pub fn sample_products() -> Vec<Value> {
    vec![
        json!({
            "_id": "p1",
            "name": "Euro Cylinder Lock",
            "description": "High-quality euro cylinder lock",
            "price": 15000,
            "category": "Lock Cylinders",
            "image": "/uploads/10.jpeg",
            "createdAt": "2024-01-10T09:00:00.000Z",
        }),
        json!({
            "_id": "p2",
            "name": "Digital Door Lock",
            "description": "Keypad entry",
            "price": 85000,
            "category": "Digital Locks",
            "image": "https://cdn.example.com/11.jpeg",
            "keyFeatures": ["Keypad", "Backup key"],
            "createdAt": "2024-02-03T09:00:00.000Z",
        }),
        json!({
            "_id": "p3",
            "name": "Glass Door Handle",
            "description": "Brushed finish",
            "price": 120000,
            "category": "Door Hardware",
            "image": "/uploads/14.jpeg",
            "createdAt": "2024-02-20T09:00:00.000Z",
        }),
        json!({
            "_id": "p4",
            "name": "Face Recognition Lock",
            "description": "AI-powered facial recognition door lock",
            "price": 258000,
            "category": "Smart Locks",
            "image": "/uploads/face_lock.jpeg",
            "material": "Zinc alloy",
            "warranty": "2 years",
        }),
    ]
}

// ============================================================================
// Handlers
// ============================================================================

type Shared = State<Arc<BackendState>>;

async fn list_products(State(state): Shared, headers: HeaderMap) -> Response {
    state.record(RecordedRequest::new("GET", "/api/products", &headers));
    if let Some(failure) = state.failure() {
        return failure;
    }
    Json(lock(&state.products).clone()).into_response()
}

async fn create_product(State(state): Shared, headers: HeaderMap, multipart: Multipart) -> Response {
    let mut request = RecordedRequest::new("POST", "/api/products", &headers);
    if let Err(status) = read_multipart(multipart, &mut request).await {
        state.record(request);
        return status.into_response();
    }
    let fields = request.fields.clone();
    let image = request.files.iter().find(|f| f.field == "image").cloned();
    state.record(request);

    if let Some(failure) = state.failure() {
        return failure;
    }
    let Some(image) = image else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Image is required" })))
            .into_response();
    };

    let id = format!("new-{}", state.next_id.fetch_add(1, Ordering::SeqCst) + 1);
    let product = product_from_fields(&id, &fields, format!("/uploads/{}", image.file_name));
    lock(&state.products).push(product.clone());

    (
        StatusCode::CREATED,
        Json(json!({ "message": "Product created", "product": product })),
    )
        .into_response()
}

async fn update_product(
    State(state): Shared,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let path = format!("/api/products/{id}");
    let mut request = RecordedRequest::new("PUT", path, &headers);
    if let Err(status) = read_multipart(multipart, &mut request).await {
        state.record(request);
        return status.into_response();
    }
    let fields = request.fields.clone();
    let image = request.files.iter().find(|f| f.field == "image").cloned();
    state.record(request);

    if let Some(failure) = state.failure() {
        return failure;
    }

    let mut products = lock(&state.products);
    let Some(slot) = products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Product not found" })))
            .into_response();
    };

    let image = image.map_or_else(
        || slot["image"].as_str().unwrap_or_default().to_owned(),
        |f| format!("/uploads/{}", f.file_name),
    );
    let mut updated = product_from_fields(&id, &fields, image);
    updated["createdAt"] = slot["createdAt"].clone();
    *slot = updated.clone();

    Json(json!({ "message": "Product updated", "product": updated })).into_response()
}

async fn delete_product(State(state): Shared, Path(id): Path<String>, headers: HeaderMap) -> Response {
    state.record(RecordedRequest::new("DELETE", format!("/api/products/{id}"), &headers));
    if let Some(failure) = state.failure() {
        return failure;
    }

    let mut products = lock(&state.products);
    let before = products.len();
    products.retain(|p| p["_id"] != id.as_str());
    if products.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Product not found" })))
            .into_response();
    }
    Json(json!({ "message": "Product deleted" })).into_response()
}

async fn send_email(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut request = RecordedRequest::new("POST", "/send-email", &headers);
    request.json = Some(body);
    state.record(request);
    if let Some(failure) = state.failure() {
        return failure;
    }
    Json(json!({ "message": "Email sent" })).into_response()
}

async fn email_service(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut request = RecordedRequest::new("POST", "/email-service/send", &headers);
    request.json = Some(body);
    state.record(request);
    let (status, text) = lock(&state.email_reply)
        .clone()
        .unwrap_or_else(|| (StatusCode::OK, "OK".to_owned()));
    (status, text).into_response()
}

async fn read_multipart(
    mut multipart: Multipart,
    request: &mut RecordedRequest,
) -> Result<(), StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if let Some(file_name) = field.file_name().map(str::to_owned) {
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            request.files.push(UploadedFile {
                field: name,
                file_name,
                content_type,
                len: bytes.len(),
            });
        } else {
            let text = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            request.fields.insert(name, text);
        }
    }
    Ok(())
}

fn product_from_fields(id: &str, fields: &BTreeMap<String, String>, image: String) -> Value {
    let text = |key: &str| fields.get(key).cloned().unwrap_or_default();
    let key_features: Value = fields
        .get("keyFeatures")
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_else(|| json!([]));

    json!({
        "_id": id,
        "name": text("name"),
        "description": text("description"),
        "price": text("price").parse::<u64>().unwrap_or(0),
        "category": text("category"),
        "keyFeatures": key_features,
        "material": text("material"),
        "compatibility": text("compatibility"),
        "bestFor": text("bestFor"),
        "warranty": text("warranty"),
        "image": image,
        "createdAt": CREATED_AT,
    })
}
