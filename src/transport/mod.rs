//! HTTP transport for the Ulfom API
//!
//! A transport executes one request (method, endpoint, query, JSON body)
//! and hands back the decoded JSON payload. It comes in two forms with the
//! same contract: [`Transport`] blocks the calling thread, [`AsyncTransport`]
//! is awaited on a tokio runtime. [`BlockingClient`] and [`Client`] are the
//! reqwest-backed implementations; the task helpers accept any implementation.

mod blocking;
mod client;

pub use blocking::BlockingClient;
pub use client::Client;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::{Result, SdkError};

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings shared by both HTTP clients
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `https://www.ulfom.com/api/v1`
    pub base_url: String,
    /// Bearer token sent with every request when set
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with no API key and the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks the configuration without touching the network
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidConfig`] when the base URL is empty, does
    /// not use the `http`/`https` scheme or cannot be parsed, or when an API
    /// key is present but blank.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(SdkError::InvalidConfig("base_url cannot be empty".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SdkError::InvalidConfig(
                "base_url must start with http:// or https://".into(),
            ));
        }
        Url::parse(&self.base_url)
            .map_err(|e| SdkError::InvalidConfig(format!("base_url is not a valid URL: {}", e)))?;
        if let Some(key) = &self.api_key {
            if key.trim().is_empty() {
                return Err(SdkError::InvalidConfig("api_key cannot be empty".into()));
            }
        }
        Ok(())
    }

    /// Base URL without trailing slashes; endpoints are appended verbatim
    pub(crate) fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }

    pub(crate) fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| SdkError::InvalidConfig("api_key contains invalid characters".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

/// A single API request, relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path appended to the base URL, starting with `/`
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, endpoint).with_body(body)
    }

    pub fn put(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, endpoint).with_body(body)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Blocking transport contract
pub trait Transport {
    /// Sends the request and returns the decoded JSON body
    ///
    /// # Errors
    ///
    /// Fails with a transport-level [`SdkError`] (connectivity, non-2xx
    /// status, undecodable body).
    fn send(&self, request: ApiRequest) -> Result<Value>;

    /// Makes a GET request
    fn get(&self, endpoint: &str) -> Result<Value> {
        self.send(ApiRequest::get(endpoint))
    }

    /// Makes a POST request with a JSON body
    fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        self.send(ApiRequest::post(endpoint, body))
    }

    /// Makes a PUT request with a JSON body
    fn put(&self, endpoint: &str, body: Value) -> Result<Value> {
        self.send(ApiRequest::put(endpoint, body))
    }

    /// Makes a DELETE request
    fn delete(&self, endpoint: &str) -> Result<Value> {
        self.send(ApiRequest::delete(endpoint))
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: ApiRequest) -> Result<Value> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: ApiRequest) -> Result<Value> {
        (**self).send(request)
    }
}

/// Async transport contract
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    /// Sends the request and returns the decoded JSON body
    ///
    /// # Errors
    ///
    /// Fails with a transport-level [`SdkError`] (connectivity, non-2xx
    /// status, undecodable body).
    async fn send(&self, request: ApiRequest) -> Result<Value>;

    /// Makes a GET request
    async fn get(&self, endpoint: &str) -> Result<Value> {
        self.send(ApiRequest::get(endpoint)).await
    }

    /// Makes a POST request with a JSON body
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        self.send(ApiRequest::post(endpoint, body)).await
    }

    /// Makes a PUT request with a JSON body
    async fn put(&self, endpoint: &str, body: Value) -> Result<Value> {
        self.send(ApiRequest::put(endpoint, body)).await
    }

    /// Makes a DELETE request
    async fn delete(&self, endpoint: &str) -> Result<Value> {
        self.send(ApiRequest::delete(endpoint)).await
    }
}

#[async_trait]
impl<T: AsyncTransport + ?Sized> AsyncTransport for Arc<T> {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        (**self).send(request).await
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP server on a background thread, enough to inspect what a
    //! client puts on the wire.

    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serves exactly one request with the given status line and JSON body.
    /// The join handle yields the raw request text.
    pub fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if request_complete(&raw) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });

        (base_url, handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }
}
