//! HTTP client for the remote cart service.

use super::payload;
use crate::config::{CartConfig, ConfigError};
use crate::environment::{BackendFuture, CartBackend};
use crate::error::CartError;
use crate::types::{AddToCartRequest, CartLineItem, CartOperation, LineItemId};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::{Value, json};

/// Cart service client over JSON/HTTP.
///
/// Endpoints, relative to the base URL:
///
/// | Operation | Request |
/// |---|---|
/// | get | `GET cart` |
/// | add | `POST cart/items` |
/// | remove | `DELETE cart/items/{id}` |
/// | update | `PUT cart/items/{id}` with `{"quantity": n}` |
/// | clear | `DELETE cart` |
#[derive(Clone)]
pub struct HttpCartBackend {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpCartBackend {
    /// Create a client with default HTTP settings and no credentials.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
            token: None,
        }
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL is invalid, the request timeout
    /// is zero, or the HTTP client cannot be built.
    pub fn from_config(config: &CartConfig) -> Result<Self, ConfigError> {
        if config.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            token: config.api_token.clone(),
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Base URL extended with path segments (each segment is percent-encoded).
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CartError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| CartError::Network(format!("{} cannot be a base URL", self.base_url)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and return its JSON body (`Null` when empty).
    #[tracing::instrument(skip_all, fields(operation = %operation))]
    async fn execute(
        &self,
        operation: CartOperation,
        request: RequestBuilder,
    ) -> Result<Value, CartError> {
        metrics::counter!("cart.backend.requests", "operation" => operation.as_str()).increment(1);

        let start = std::time::Instant::now();
        let result = Self::exchange(request).await;
        metrics::histogram!("cart.backend.duration_seconds", "operation" => operation.as_str())
            .record(start.elapsed().as_secs_f64());
        if let Err(error) = &result {
            metrics::counter!(
                "cart.backend.failures",
                "operation" => operation.as_str(),
                "kind" => error.kind()
            )
            .increment(1);
            tracing::debug!(%error, "Cart request failed");
        }
        result
    }

    async fn exchange(request: RequestBuilder) -> Result<Value, CartError> {
        let response = request
            .send()
            .await
            .map_err(|e| CartError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CartError::from_status(
                status.as_u16(),
                payload::error_message(&body),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CartError::Network(e.to_string()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| CartError::Decode(e.to_string()))
    }

    async fn get_cart_items(&self) -> Result<Vec<CartLineItem>, CartError> {
        let url = self.endpoint(&["cart"])?;
        let body = self
            .execute(CartOperation::Fetch, self.request(Method::GET, url))
            .await?;
        payload::cart_items(&body)
    }

    async fn post_item(&self, request: AddToCartRequest) -> Result<(), CartError> {
        let url = self.endpoint(&["cart", "items"])?;
        self.execute(
            CartOperation::Add,
            self.request(Method::POST, url).json(&request),
        )
        .await?;
        Ok(())
    }

    async fn delete_item(&self, item_id: LineItemId) -> Result<Vec<CartLineItem>, CartError> {
        let url = self.endpoint(&["cart", "items", item_id.as_str()])?;
        let body = self
            .execute(CartOperation::Remove, self.request(Method::DELETE, url))
            .await?;
        payload::mutation_items(&body)
    }

    async fn put_quantity(
        &self,
        item_id: LineItemId,
        quantity: u32,
    ) -> Result<Vec<CartLineItem>, CartError> {
        let url = self.endpoint(&["cart", "items", item_id.as_str()])?;
        let body = self
            .execute(
                CartOperation::Update,
                self.request(Method::PUT, url)
                    .json(&json!({ "quantity": quantity })),
            )
            .await?;
        payload::mutation_items(&body)
    }

    async fn delete_cart(&self) -> Result<(), CartError> {
        let url = self.endpoint(&["cart"])?;
        self.execute(CartOperation::Clear, self.request(Method::DELETE, url))
            .await?;
        Ok(())
    }
}

impl CartBackend for HttpCartBackend {
    fn get_cart(&self) -> BackendFuture<'_, Vec<CartLineItem>> {
        Box::pin(self.get_cart_items())
    }

    fn add_to_cart(&self, request: AddToCartRequest) -> BackendFuture<'_, ()> {
        Box::pin(self.post_item(request))
    }

    fn remove_from_cart(&self, item_id: LineItemId) -> BackendFuture<'_, Vec<CartLineItem>> {
        Box::pin(self.delete_item(item_id))
    }

    fn update_cart_item(
        &self,
        item_id: LineItemId,
        quantity: u32,
    ) -> BackendFuture<'_, Vec<CartLineItem>> {
        Box::pin(self.put_quantity(item_id, quantity))
    }

    fn clear_cart(&self) -> BackendFuture<'_, ()> {
        Box::pin(self.delete_cart())
    }
}

impl std::fmt::Debug for HttpCartBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCartBackend")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpCartBackend {
        HttpCartBackend::new(Url::parse(base).unwrap())
    }

    #[test]
    fn test_endpoint_joins_below_base() {
        let client = backend("http://localhost:8080/api");
        assert_eq!(
            client.endpoint(&["cart", "items"]).unwrap().as_str(),
            "http://localhost:8080/api/cart/items"
        );

        let client = backend("http://localhost:8080/api/");
        assert_eq!(
            client.endpoint(&["cart"]).unwrap().as_str(),
            "http://localhost:8080/api/cart"
        );
    }

    #[test]
    fn test_endpoint_encodes_item_ids() {
        let client = backend("http://localhost:8080/api");
        assert_eq!(
            client.endpoint(&["cart", "items", "a/b c"]).unwrap().as_str(),
            "http://localhost:8080/api/cart/items/a%2Fb%20c"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = backend("http://localhost:8080/api").with_token("secret");
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("authenticated: true"));
    }

    #[test]
    fn test_from_config_rejects_zero_timeout() {
        let config = CartConfig {
            request_timeout_secs: 0,
            ..CartConfig::default()
        };
        assert!(matches!(
            HttpCartBackend::from_config(&config),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    #[test]
    fn test_from_config_rejects_invalid_url() {
        let config = CartConfig {
            api_url: "not a url".to_string(),
            ..CartConfig::default()
        };
        assert!(matches!(
            HttpCartBackend::from_config(&config),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
