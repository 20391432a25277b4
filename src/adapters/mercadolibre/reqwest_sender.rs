//! `HttpSender` backed by a shared `reqwest::Client`.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::domain::foundation::SdkError;
use crate::ports::{ApiRequest, HttpMethod, HttpSender, RawResponse};

/// Default per-request network timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends requests to one base URL with optional bearer authentication.
///
/// The access token can be swapped at runtime (after an OAuth refresh)
/// while requests are in flight.
pub struct ReqwestSender {
    client: reqwest::Client,
    base_url: Url,
    access_token: RwLock<Option<SecretString>>,
}

impl ReqwestSender {
    /// Creates a sender with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if `base_url` is not an absolute http(s) URL,
    /// or `Internal` if the underlying client cannot be built.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, SdkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::internal(format!("failed to build http client: {}", e)))?;

        Self::with_client(client, base_url)
    }

    /// Wraps an existing client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if `base_url` is not an absolute http(s) URL.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl AsRef<str>,
    ) -> Result<Self, SdkError> {
        Ok(Self {
            client,
            base_url: parse_base(base_url.as_ref())?,
            access_token: RwLock::new(None),
        })
    }

    /// Sets the initial access token.
    pub fn with_access_token(self, token: SecretString) -> Self {
        self.set_access_token(Some(token));
        self
    }

    /// Replaces the access token used for subsequent requests.
    pub fn set_access_token(&self, token: Option<SecretString>) {
        let mut guard = self
            .access_token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = token.filter(|t| !t.expose_secret().is_empty());
    }

    /// Base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` below the base URL.
    ///
    /// Leading slashes are ignored, so `/v1/payments` keeps any path prefix
    /// of the base. A path that would leave the base origin is rejected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` ("invalid request path") if the path cannot
    /// be joined or points at another host.
    pub fn url_for(&self, path: &str) -> Result<Url, SdkError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SdkError::invalid_request(format!("invalid request path: {}", e)))?;
        if url.origin() != self.base_url.origin() {
            return Err(SdkError::invalid_request(format!(
                "invalid request path: {}",
                path
            )));
        }
        Ok(url)
    }

    fn bearer(&self) -> Option<String> {
        let guard = self
            .access_token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret()))
    }
}

/// Parses an absolute http(s) base and gives it a trailing `/` so joins
/// append to its path instead of replacing the last segment.
fn parse_base(raw: &str) -> Result<Url, SdkError> {
    let raw = raw.trim();
    let mut url = Url::parse(raw)
        .map_err(|e| SdkError::invalid_request(format!("invalid base url {:?}: {}", raw, e)))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(SdkError::invalid_request(format!(
            "invalid base url {:?}: expected http or https",
            raw
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// A request reqwest refuses to build (bad header value, bad URL) can never
/// succeed, so it is not reported as a retryable network failure.
fn send_error(err: reqwest::Error) -> SdkError {
    if err.is_builder() {
        SdkError::invalid_request(format!("invalid request: {}", err))
    } else {
        SdkError::network(format!("request failed: {}", err))
    }
}

fn too_large(limit: usize) -> SdkError {
    SdkError::network(format!("response body exceeds {} bytes", limit))
}

#[async_trait]
impl HttpSender for ReqwestSender {
    async fn send(
        &self,
        request: &ApiRequest,
        max_body_bytes: usize,
    ) -> Result<RawResponse, SdkError> {
        let url = self.url_for(request.path())?;
        let mut builder = self.client.request(to_reqwest_method(request.method()), url);

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(auth) = self.bearer() {
            builder = builder.header(reqwest::header::AUTHORIZATION, auth);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let mut response = builder.send().await.map_err(send_error)?;

        let status = response.status().as_u16();

        if let Some(declared) = response.content_length() {
            if declared > max_body_bytes as u64 {
                return Err(too_large(max_body_bytes));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| SdkError::network(format!("failed to read response body: {}", e)))?
        {
            if body.len() + chunk.len() > max_body_bytes {
                return Err(too_large(max_body_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(RawResponse::new(status, body))
    }
}
