//! # Backend API
//!
//! The remote backend as seen by the storefront: an opaque HTTP API
//! returning JSON.
//!
//! ## Endpoints
//! | Operation          | Request                              |
//! |--------------------|--------------------------------------|
//! | `fetch_cart`       | `GET    /api/cart`                   |
//! | `add_to_cart`      | `POST   /api/cart/add`               |
//! | `update_cart_item` | `PUT    /api/cart/update`            |
//! | `remove_from_cart` | `DELETE /api/cart/remove/{id}`       |
//! | `clear_cart`       | `DELETE /api/cart/clear`             |
//! | `fetch_order`      | `GET    /api/orders/{id}`            |
//! | `fetch_quotation`  | `GET    /api/quotations/{id}`        |
//!
//! ## Status Mapping
//! ```text
//! 2xx ──► Ok
//! 401 ──► clear_session() on the credential chain, then Unauthenticated
//! 403 ──► Forbidden      404 ──► NotFound
//! 400 / 422 ──► Rejected  other ──► Server { status, message }
//! ```

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use storefront_core::validation::{validate_product_id, validate_requested_quantity};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::{ClientError, ClientResult};
use crate::models::{CartItemRequest, CartPayload, OrderPayload, QuotationPayload};

// =============================================================================
// API Trait
// =============================================================================

/// Operations the storefront needs from the backend.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn fetch_cart(&self) -> ClientResult<CartPayload>;

    async fn add_to_cart(&self, product_id: &str, quantity: i64) -> ClientResult<()>;

    /// Sets the quantity of a line already in the cart.
    async fn update_cart_item(&self, product_id: &str, quantity: i64) -> ClientResult<()>;

    async fn remove_from_cart(&self, product_id: &str) -> ClientResult<()>;

    async fn clear_cart(&self) -> ClientResult<()>;

    async fn fetch_order(&self, order_id: &str) -> ClientResult<OrderPayload>;

    async fn fetch_quotation(&self, quotation_id: &str) -> ClientResult<QuotationPayload>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// `StorefrontApi` over HTTP with a bearer token.
pub struct HttpStorefrontApi {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpStorefrontApi {
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialProvider>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(HttpStorefrontApi {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends an authenticated request and checks its status.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<reqwest::Response> {
        let token = self.credentials.require_token()?;

        debug!(%method, path, "Backend request");
        let mut request = self
            .client
            .request(method, self.url(path))
            .header(reqwest::header::AUTHORIZATION, token.bearer());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        self.check_status(path, response).await
    }

    async fn check_status(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), path, "Backend returned an error status");

        match status {
            StatusCode::UNAUTHORIZED => {
                warn!(path, "Session rejected by backend, clearing credentials");
                self.credentials.clear_session();
                Err(ClientError::Unauthenticated)
            }
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden(message)),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(path.to_string())),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(ClientError::Rejected(message))
            }
            other => Err(ClientError::Server {
                status: other.as_u16(),
                message,
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.send(Method::GET, path, None).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn fetch_cart(&self) -> ClientResult<CartPayload> {
        self.get_json("/api/cart").await
    }

    async fn add_to_cart(&self, product_id: &str, quantity: i64) -> ClientResult<()> {
        validate_product_id(product_id)?;
        validate_requested_quantity(quantity)?;

        let body = serde_json::to_value(CartItemRequest {
            product_id,
            quantity,
        })?;
        self.send(Method::POST, "/api/cart/add", Some(body)).await?;
        Ok(())
    }

    async fn update_cart_item(&self, product_id: &str, quantity: i64) -> ClientResult<()> {
        validate_product_id(product_id)?;
        validate_requested_quantity(quantity)?;

        let body = serde_json::to_value(CartItemRequest {
            product_id,
            quantity,
        })?;
        self.send(Method::PUT, "/api/cart/update", Some(body)).await?;
        Ok(())
    }

    async fn remove_from_cart(&self, product_id: &str) -> ClientResult<()> {
        validate_product_id(product_id)?;
        let path = format!("/api/cart/remove/{}", product_id);
        self.send(Method::DELETE, &path, None).await?;
        Ok(())
    }

    async fn clear_cart(&self) -> ClientResult<()> {
        self.send(Method::DELETE, "/api/cart/clear", None).await?;
        Ok(())
    }

    async fn fetch_order(&self, order_id: &str) -> ClientResult<OrderPayload> {
        validate_product_id(order_id)?;
        self.get_json(&format!("/api/orders/{}", order_id)).await
    }

    async fn fetch_quotation(&self, quotation_id: &str) -> ClientResult<QuotationPayload> {
        validate_product_id(quotation_id)?;
        self.get_json(&format!("/api/quotations/{}", quotation_id)).await
    }
}
