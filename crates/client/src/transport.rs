//! HTTP transport abstraction.
//!
//! [`CachedApiClient`](crate::CachedApiClient) never talks to `reqwest`
//! directly; it goes through [`Transport`] so tests can substitute scripted
//! responses. A received response is always `Ok`, whatever its status code -
//! [`TransportError`] is reserved for requests that never completed.

use std::future::Future;

use thiserror::Error;

/// The request could not be sent or no response arrived.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP layer failure (DNS, connection, protocol).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Scripted or synthetic failure, used by test doubles.
    #[error("connection failed: {0}")]
    Unreachable(String),
}

/// HTTP method subset the store API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outgoing request. All requests carry `Content-Type: application/json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

impl ApiRequest {
    /// A GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    /// A POST request with a JSON body.
    #[must_use]
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body.into()),
        }
    }
}

/// One received response, however unsuccessful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends [`ApiRequest`]s and yields [`ApiResponse`]s.
///
/// No timeout or cancellation is imposed here; callers that need either can
/// wrap the returned future themselves.
pub trait Transport: Send + Sync {
    /// Send a request and wait for its response.
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}

/// Production transport backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        let mut builder = builder.header("Content-Type", "application/json");
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ApiResponse { status, body })
    }
}
