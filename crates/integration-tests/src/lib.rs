//! Shared test harness: a scripted transport double and catalog fixtures.
//!
//! Tests build a [`CachedApiClient`](itx_store_client::CachedApiClient) over
//! a [`ScriptedTransport`] and a
//! [`MemoryStore`](itx_store_client::MemoryStore), so every network exchange
//! is predetermined and every cache access is inspectable.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use itx_store_client::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use itx_store_client::{CachedApiClient, MemoryStore, StoreConfig};
use serde_json::{Value, json};
use url::Url;

/// Base URL every scripted client is configured with.
pub const TEST_BASE_URL: &str = "https://store.test";

/// Transport double that replays a scripted queue of responses and records
/// every request it was asked to send.
///
/// An exhausted script fails the request like an unreachable network, which
/// is exactly what a test asserting "zero network calls" wants.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    script: Mutex<VecDeque<Result<ApiResponse, String>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and raw body.
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.lock_script().push_back(Ok(ApiResponse {
            status,
            body: body.into(),
        }));
    }

    /// Queue a 200 response carrying `value` as JSON.
    pub fn push_json(&self, value: &Value) {
        self.push_response(200, value.to_string());
    }

    /// Queue a transport-level failure.
    pub fn push_unreachable(&self, message: impl Into<String>) {
        self.lock_script().push_back(Err(message.into()));
    }

    /// Every request sent so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock_requests().clone()
    }

    /// Number of requests sent so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.lock_requests().len()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<ApiResponse, String>>> {
        self.inner.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<ApiRequest>> {
        self.inner.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.lock_requests().push(request);
        match self.lock_script().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Unreachable(message)),
            None => Err(TransportError::Unreachable(
                "no scripted response left".to_owned(),
            )),
        }
    }
}

/// A client over a fresh scripted transport and in-memory store.
#[must_use]
pub fn scripted_client() -> (
    CachedApiClient<ScriptedTransport, MemoryStore>,
    ScriptedTransport,
    MemoryStore,
) {
    let transport = ScriptedTransport::new();
    let store = MemoryStore::new();
    let config = StoreConfig::for_base_url(
        Url::parse(TEST_BASE_URL).expect("test base URL is valid"),
    );
    let client = CachedApiClient::new(&config, transport.clone(), store.clone());
    (client, transport, store)
}

/// Catalog fixture: a list-shaped product (no options).
#[must_use]
pub fn product_json(id: &str, brand: &str, model: &str, price: f64) -> Value {
    json!({
        "id": id,
        "brand": brand,
        "model": model,
        "price": price,
        "imgUrl": format!("https://store.test/images/{id}.jpg"),
    })
}

/// Catalog fixture: a detail-shaped product with two colors and two storages.
#[must_use]
pub fn product_detail_json(id: &str, brand: &str, model: &str, price: f64) -> Value {
    let mut value = product_json(id, brand, model, price);
    if let Value::Object(map) = &mut value {
        map.insert(
            "options".to_owned(),
            json!({
                "colors": [
                    {"code": 1000, "name": "Black"},
                    {"code": 1001, "name": "White"},
                ],
                "storages": [
                    {"code": 2000, "name": "64 GB"},
                    {"code": 2001, "name": "128 GB"},
                ],
            }),
        );
    }
    value
}

/// The three-product catalog used by the end-to-end scenario.
#[must_use]
pub fn sample_catalog() -> Value {
    json!([
        product_json("a1", "Apple", "iPhone 14", 900.0),
        product_json("s1", "Samsung", "Galaxy S23", 850.0),
        product_json("g1", "Google", "Pixel 8", 750.0),
    ])
}
