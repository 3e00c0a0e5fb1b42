//! HTTP client for the catalog/stock REST service.
//!
//! Uses `reqwest` with JSON bodies:
//! - `GET {base}/products/{id}` returns the product object
//! - `GET {base}/stock/{id}` returns `{ "id": ..., "amount": n }`

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use rocket_cart_core::{DisplayAttributes, ProductId};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use url::Url;

use super::cache::ProductCache;
use super::{Catalog, CatalogError, StockOracle};
use crate::config::CatalogApiConfig;

/// Longest slice of an error body kept in `CatalogError::Api`.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Stock endpoint payload.
#[derive(Debug, Deserialize)]
struct StockResponse {
    amount: u32,
}

/// Client for the catalog/stock service.
///
/// Cheaply cloneable; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: ProductCache,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &CatalogApiConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| CatalogError::Parse(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache: ProductCache::new(config.cache_ttl),
            }),
        })
    }

    /// URL of `{resource}/{product_id}` under the base URL.
    fn endpoint(&self, resource: &str, product_id: &ProductId) -> Result<Url, CatalogError> {
        let path = format!("{resource}/{}", urlencoding::encode(product_id.as_str()));
        self.inner
            .base_url
            .join(&path)
            .map_err(|e| CatalogError::Parse(format!("Invalid endpoint {path}: {e}")))
    }

    /// GET a JSON document, mapping HTTP failures to `CatalogError`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        product_id: &ProductId,
    ) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(product_id.clone()));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog API response"
            );
            CatalogError::Parse(e.to_string())
        })
    }
}

impl Catalog for ApiClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn get_product(&self, product_id: &ProductId) -> Result<DisplayAttributes, CatalogError> {
        if let Some(display) = self.inner.cache.get(product_id).await {
            debug!("Cache hit for product");
            return Ok(display);
        }

        let url = self.endpoint("products", product_id)?;
        let product: Map<String, Value> = self.get_json(url, product_id).await?;
        let display = DisplayAttributes::from_map(product);

        self.inner
            .cache
            .insert(product_id.clone(), display.clone())
            .await;

        Ok(display)
    }
}

impl StockOracle for ApiClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn get_available(&self, product_id: &ProductId) -> Result<u32, CatalogError> {
        let url = self.endpoint("stock", product_id)?;
        let stock: StockResponse = self.get_json(url, product_id).await?;
        debug!(available = stock.amount, "Fetched stock");
        Ok(stock.amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve exactly one canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> CatalogApiConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(buf.get(..n).unwrap());
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        let mut config = CatalogApiConfig::new(&format!("http://{addr}/api")).unwrap();
        config.timeout = Duration::from_secs(2);
        config
    }

    #[test]
    fn test_endpoint_encodes_product_id() {
        let config = CatalogApiConfig::new("http://localhost:3333/api").unwrap();
        let client = ApiClient::new(&config).unwrap();

        let url = client.endpoint("stock", &ProductId::new("red shoe/42").unwrap()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3333/api/stock/red%20shoe%2F42");
    }

    #[tokio::test]
    async fn test_get_product_is_cached() {
        let config = serve_once("200 OK", r#"{"id":1,"title":"Shoe","price":179.9}"#).await;
        let client = ApiClient::new(&config).unwrap();
        let id = ProductId::new("1").unwrap();

        let display = client.get_product(&id).await.unwrap();
        assert_eq!(display.title(), Some("Shoe"));

        // The server only answers once; a second lookup must come from cache.
        let again = client.get_product(&id).await.unwrap();
        assert_eq!(again, display);
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let config = serve_once("404 Not Found", "{}").await;
        let client = ApiClient::new(&config).unwrap();

        let err = client.get_product(&ProductId::new("9").unwrap()).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(id) if id.as_str() == "9"));
    }

    #[tokio::test]
    async fn test_get_product_rejects_non_object() {
        let config = serve_once("200 OK", "[1, 2, 3]").await;
        let client = ApiClient::new(&config).unwrap();

        let err = client.get_product(&ProductId::new("1").unwrap()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_get_available() {
        let config = serve_once("200 OK", r#"{"id":1,"amount":3}"#).await;
        let client = ApiClient::new(&config).unwrap();

        assert_eq!(client.get_available(&ProductId::new("1").unwrap()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let config = serve_once("503 Service Unavailable", "down for maintenance").await;
        let client = ApiClient::new(&config).unwrap();

        let err = client.get_available(&ProductId::new("1").unwrap()).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Api { status: 503, ref message } if message == "down for maintenance"
        ));
    }
}
