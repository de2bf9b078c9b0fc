//! Backend REST client.
//!
//! | Operation | Request | Auth |
//! |---|---|---|
//! | [`ApiClient::list_products`] | `GET /api/products` | optional bearer |
//! | [`ApiClient::create_product`] | `POST /api/products` (multipart) | bearer |
//! | [`ApiClient::update_product`] | `PUT /api/products/{id}` (multipart) | bearer |
//! | [`ApiClient::delete_product`] | `DELETE /api/products/{id}` | bearer |
//! | [`ApiClient::send_contact`] | `POST /send-email` (JSON) | none |

use lockshop_core::{Product, ProductId};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::contact::{ContactMessage, EmailServiceConfig, EmailServiceRequest, EmailServiceResponse};
use crate::error::ApiError;
use crate::session::SessionToken;
use crate::submission::ProductSubmission;

/// Error body returned by the backend on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the product and contact backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Create a client from loaded configuration.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    /// The backend base URL (used to resolve relative image paths).
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// `{base}/api/products/{id}` with the ID escaped as a single segment.
    fn product_url(&self, id: &ProductId) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Request(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "products", id.as_str()]);
        Ok(url)
    }

    /// Fetch every product.
    ///
    /// The public catalog calls this without a token; the admin views send
    /// their bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unreadable body.
    #[instrument(skip(self, token), fields(authenticated = token.is_some()))]
    pub async fn list_products(
        &self,
        token: Option<&SessionToken>,
    ) -> Result<Vec<Product>, ApiError> {
        let mut request = self.client.get(self.endpoint("/api/products"));
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }

        let response = request.send().await.map_err(ApiError::Network)?;
        let response = check_status(response).await?;
        let products: Vec<Product> = response.json().await?;

        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Create a product.
    ///
    /// Returns the created product when the backend echoes it back.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or a
    /// non-JSON success body.
    #[instrument(skip_all, fields(name = %submission.name, has_image = submission.image.is_some()))]
    pub async fn create_product(
        &self,
        token: &SessionToken,
        submission: &ProductSubmission,
    ) -> Result<Option<Product>, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/api/products"))
            .bearer_auth(token.expose())
            .multipart(submission.to_form()?)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let product = read_product(check_status(response).await?).await?;
        debug!("Product created");
        Ok(product)
    }

    /// Replace a product's fields.
    ///
    /// When `submission.image` is `None` the server keeps the current image.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::create_product`].
    #[instrument(skip_all, fields(id = %id, has_image = submission.image.is_some()))]
    pub async fn update_product(
        &self,
        token: &SessionToken,
        id: &ProductId,
        submission: &ProductSubmission,
    ) -> Result<Option<Product>, ApiError> {
        let response = self
            .client
            .put(self.product_url(id)?)
            .bearer_auth(token.expose())
            .multipart(submission.to_form()?)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let product = read_product(check_status(response).await?).await?;
        debug!("Product updated");
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete_product(&self, token: &SessionToken, id: &ProductId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.product_url(id)?)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(ApiError::Network)?;

        check_status(response).await?;
        debug!("Product deleted");
        Ok(())
    }

    /// Post a visitor inquiry to the backend mail endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    #[instrument(skip_all, fields(email = %message.email))]
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("/send-email"))
            .json(message)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = check_status(response).await?.status();
        debug!(status = status.as_u16(), "Contact message accepted");
        Ok(())
    }

    /// Send a visitor inquiry straight to the third-party email service.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Provider`] when the service answers with anything
    /// but `OK`, or [`ApiError::Network`] if it can't be reached.
    #[instrument(skip_all, fields(email = %message.email, service = %config.service_id))]
    pub async fn send_via_email_service(
        &self,
        config: &EmailServiceConfig,
        message: &ContactMessage,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(&config.endpoint)
            .json(&EmailServiceRequest::new(config, message))
            .send()
            .await
            .map_err(ApiError::Network)?;

        let reply = EmailServiceResponse {
            status: response.status().as_u16(),
            text: response.text().await.map_err(ApiError::Network)?,
        };

        if reply.is_delivered() {
            debug!("Email service accepted message");
            Ok(())
        } else {
            warn!(status = reply.status, text = %reply.text, "Email service refused message");
            Err(ApiError::Provider(reply.text))
        }
    }
}

/// Pass 2xx responses through; turn anything else into [`ApiError::Status`]
/// carrying the body's `message` field if it has one.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message);

    warn!(status = status.as_u16(), message = ?message, "Backend returned error status");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Parse a mutation reply. The body must be JSON; the product is taken from
/// the top level or from a `product` field, and is `None` if neither parses.
async fn read_product(response: Response) -> Result<Option<Product>, ApiError> {
    let body: serde_json::Value = response.json().await?;
    let candidate = body.get("product").cloned().unwrap_or(body);
    Ok(serde_json::from_value(candidate).ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = ApiClient::new(Url::parse("http://localhost:3002/").unwrap());
        assert_eq!(
            client.endpoint("/api/products"),
            "http://localhost:3002/api/products"
        );

        let nested = ApiClient::new(Url::parse("https://shop.example.com/backend").unwrap());
        assert_eq!(
            nested.endpoint("/send-email"),
            "https://shop.example.com/backend/send-email"
        );
    }

    #[test]
    fn test_product_url_escapes_reserved_characters() {
        let client = ApiClient::new(Url::parse("http://localhost:3002/").unwrap());
        let url = |id: &str| client.product_url(&ProductId::new(id)).unwrap().to_string();

        assert_eq!(url("64f1c2"), "http://localhost:3002/api/products/64f1c2");
        assert_eq!(url("p1?x=1"), "http://localhost:3002/api/products/p1%3Fx=1");
        assert_eq!(url("p1#top"), "http://localhost:3002/api/products/p1%23top");
        assert_eq!(url("../p1"), "http://localhost:3002/api/products/..%2Fp1");

        let nested = ApiClient::new(Url::parse("https://shop.example.com/backend").unwrap());
        assert_eq!(
            nested.product_url(&ProductId::new("p 2")).unwrap().as_str(),
            "https://shop.example.com/backend/api/products/p%202"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = ApiClient::new(Url::parse("http://127.0.0.1:9").unwrap());
        let err = client.list_products(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(
            err.user_message("ignored"),
            crate::error::NETWORK_ERROR_MESSAGE
        );
    }
}
