//! Caching client for the remote product API.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, instrument};

use itx_store_core::{CartAddition, CartAdditionReceipt, Product};

use crate::cache::ResponseCache;
use crate::config::StoreConfig;
use crate::storage::{FileStore, KeyValueStore, StorageError};
use crate::transport::{ApiRequest, ReqwestTransport, Transport, TransportError};

/// Errors a client call can produce.
///
/// Cache trouble never appears here: a bad cache entry is silently discarded
/// and the call proceeds to the network.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed; propagated unchanged, never retried.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status.
    #[error("API error {status}: {detail}")]
    Request { status: u16, detail: String },

    /// The response body was not the JSON shape we expect.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The HTTP status for [`ApiError::Request`] failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Transport(_) | Self::Parse(_) => None,
        }
    }
}

/// Client for the product API with a read-through cache on the two GET
/// endpoints.
///
/// `fetch_product_list` and `fetch_product` consult the cache first and only
/// touch the network on a miss; `add_to_cart` always posts. Overlapping
/// misses for the same key are not coordinated - both fetch and both write,
/// and either result is independently correct.
#[derive(Debug)]
pub struct CachedApiClient<T, S> {
    transport: T,
    cache: ResponseCache<S>,
    base_url: String,
}

impl CachedApiClient<ReqwestTransport, FileStore> {
    /// Build the production client: `reqwest` transport, file-backed cache.
    ///
    /// # Errors
    ///
    /// Returns an error when the cache directory cannot be created.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StorageError> {
        Ok(Self::new(
            config,
            ReqwestTransport::new(),
            FileStore::new(&config.cache_dir)?,
        ))
    }
}

impl<T: Transport, S: KeyValueStore> CachedApiClient<T, S> {
    /// Build a client from explicit parts; tests inject a scripted transport
    /// and an in-memory store here.
    #[must_use]
    pub fn new(config: &StoreConfig, transport: T, store: S) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(store, config.cache_ttl),
            base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
        }
    }

    /// Fetch the full product list (cache key `products`).
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails, the server answers non-2xx,
    /// or the body is not a JSON product array.
    #[instrument(skip(self))]
    pub async fn fetch_product_list(&self) -> Result<Vec<Product>, ApiError> {
        self.get_cached("products", "/api/product").await
    }

    /// Fetch one product by id (cache key `product:<id>`).
    ///
    /// Callers guard against an empty `id`; this method does not.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails, the server answers non-2xx
    /// (including 404 for unknown ids), or the body is not a JSON product.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn fetch_product(&self, id: &str) -> Result<Product, ApiError> {
        self.get_cached(&format!("product:{id}"), &format!("/api/product/{id}"))
            .await
    }

    /// Submit a cart addition. Always posts; the response cache is neither
    /// read nor written.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the server answers non-2xx.
    /// No retry is attempted; the caller decides what a failed addition means.
    #[instrument(skip(self, addition), fields(id = %addition.id))]
    pub async fn add_to_cart(
        &self,
        addition: &CartAddition,
    ) -> Result<CartAdditionReceipt, ApiError> {
        let body = serde_json::to_string(addition)?;
        let request = ApiRequest::post(self.endpoint("/api/cart"), body);
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            error!(status = response.status, "cart addition rejected");
            return Err(Self::request_error(&response.body, response.status));
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    /// Read-through fetch shared by the two GET endpoints.
    async fn get_cached<P>(&self, key: &str, path: &str) -> Result<P, ApiError>
    where
        P: Serialize + DeserializeOwned,
    {
        if let Some(data) = self.cache.load::<P>(key) {
            debug!(key, "cache hit");
            return Ok(data);
        }

        debug!(key, "cache miss, fetching");
        let response = self
            .transport
            .send(ApiRequest::get(self.endpoint(path)))
            .await?;

        if !response.is_success() {
            error!(status = response.status, path, "API returned non-success status");
            return Err(Self::request_error(&response.body, response.status));
        }

        let data: P = serde_json::from_str(&response.body)?;
        self.cache.store(key, &data);
        Ok(data)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request_error(body: &str, status: u16) -> ApiError {
        ApiError::Request {
            status,
            detail: body.chars().take(200).collect(),
        }
    }
}
