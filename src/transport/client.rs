//! Async HTTP client implementation

use async_trait::async_trait;
use log::debug;
use reqwest::header::HeaderMap;
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

use super::{ApiRequest, AsyncTransport, ClientConfig};
use crate::error::Result;

/// Async client for the Ulfom API
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    base_url: String,
    api_key: Option<String>,
    headers: HeaderMap,
    timeout: Duration,
    http_client: HttpClient,
}

impl Client {
    /// Creates a new client with no API key
    ///
    /// # Example
    ///
    /// ```rust
    /// use ulfom_rust_sdk::transport::Client;
    ///
    /// let client = Client::new("https://www.ulfom.com/api/v1").unwrap();
    /// ```
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(base_url))
    }

    /// Creates a new client from a full configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::SdkError::InvalidConfig`] when the configuration does
    /// not validate. No request is made.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http_client = HttpClient::builder().timeout(config.timeout).build()?;
        Self::assemble(config, http_client)
    }

    /// Creates a client that issues requests through an existing reqwest
    /// client, so connection pools can be shared with the rest of an
    /// application. Headers and timeout are applied per request.
    pub fn with_http_client(config: ClientConfig, http_client: HttpClient) -> Result<Self> {
        config.validate()?;
        Self::assemble(config, http_client)
    }

    fn assemble(config: ClientConfig, http_client: HttpClient) -> Result<Self> {
        Ok(Self {
            base_url: config.normalized_base_url(),
            headers: config.default_headers()?,
            api_key: config.api_key,
            timeout: config.timeout,
            http_client,
        })
    }

    /// Base URL requests are sent to, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configured API key, if any
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

#[async_trait]
impl AsyncTransport for Client {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = format!("{}{}", self.base_url, request.endpoint);
        debug!("{} {}", request.method, url);

        let mut builder = self
            .http_client
            .request(request.method, &url)
            .headers(self.headers.clone())
            .timeout(self.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?.error_for_status()?;
        let payload: Value = response.json().await?;
        Ok(payload)
    }
}
