//! Blocking HTTP client implementation
//!
//! Backed by `reqwest::blocking`, which runs its own internal runtime. Do not
//! construct or drop a [`BlockingClient`] from inside an async context.

use log::debug;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::time::Duration;

use super::{ApiRequest, ClientConfig, Transport};
use crate::error::Result;

/// Blocking client for the Ulfom API
#[derive(Clone, Debug)]
pub struct BlockingClient {
    base_url: String,
    api_key: Option<String>,
    headers: HeaderMap,
    timeout: Duration,
    http_client: HttpClient,
}

impl BlockingClient {
    /// Creates a new client with no API key
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
        Self::with_http_client(config, http_client)
    }

    /// Creates a client that reuses an existing blocking reqwest client
    pub fn with_http_client(config: ClientConfig, http_client: HttpClient) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            base_url: config.normalized_base_url(),
            headers: config.default_headers()?,
            api_key: config.api_key,
            timeout: config.timeout,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl Transport for BlockingClient {
    fn send(&self, request: ApiRequest) -> Result<Value> {
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

        let response = builder.send()?.error_for_status()?;
        let payload: Value = response.json()?;
        Ok(payload)
    }
}
