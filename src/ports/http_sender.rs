//! HttpSender port - a single network round-trip to the provider.
//!
//! The resilient transport owns retries, backoff and error classification;
//! a sender only performs one request and reports what came back. Keeping
//! this seam narrow lets the retry loop be exercised without a network.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::SdkError;

/// Hard cap on buffered response bodies (10 MiB).
pub const MAX_RESPONSE_BYTES: usize = 10 << 20;

/// HTTP verbs used by the provider API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Outbound request. Immutable once built: builder methods consume `self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    body: Option<Vec<u8>>,
    headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Adds a header, replacing any earlier value for the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Sets a raw body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `body` as JSON and marks the request as JSON in and out.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the value cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, SdkError> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            SdkError::invalid_request(format!("failed to marshal request body: {}", e))
        })?;
        Ok(self.accept_json().with_body(bytes))
    }

    /// Marks the request as exchanging JSON.
    pub fn accept_json(self) -> Self {
        self.with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json")
    }

    /// Marks the request as expecting a binary body.
    pub fn accept_binary(self) -> Self {
        self.with_header("Accept", "application/octet-stream")
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and fully buffered body of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Port for a single request/response exchange.
///
/// Implementations must never buffer more than `max_body_bytes` of a
/// response body; exceeding it is reported as a `NetworkError`. Connection,
/// DNS and read failures are also `NetworkError`. HTTP error statuses are
/// not failures at this level: they are returned as a `RawResponse`.
#[async_trait]
pub trait HttpSender: Send + Sync {
    async fn send(
        &self,
        request: &ApiRequest,
        max_body_bytes: usize,
    ) -> Result<RawResponse, SdkError>;
}
