//! URL processing, content lookup and service listings
//!
//! These endpoints are plain request/response calls with no lifecycle; the
//! helpers only build the endpoint path and return the decoded payload.

use serde_json::Value;

use crate::error::Result;
use crate::transport::{AsyncTransport, Transport};

fn process_url_endpoint(service: &str, url: &str) -> String {
    format!("/url/{}/{}", service, url)
}

fn hash_endpoint(service: &str, domain: &str, hash: &str) -> String {
    format!("/hash/{}/{}/{}", service, domain, hash)
}

const URL_SERVICES_ENDPOINT: &str = "/url/services";
const TASK_SERVICES_ENDPOINT: &str = "/task/services";

/// Async catalog helper
#[derive(Clone, Debug)]
pub struct CatalogHelper<T> {
    transport: T,
}

impl<T: AsyncTransport> CatalogHelper<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Processes a URL with the given service
    pub async fn process_url(&self, service: &str, url: &str) -> Result<Value> {
        self.transport.get(&process_url_endpoint(service, url)).await
    }

    /// Retrieves previously processed content by its hash
    pub async fn get_by_hash(&self, service: &str, domain: &str, hash: &str) -> Result<Value> {
        self.transport.get(&hash_endpoint(service, domain, hash)).await
    }

    /// Lists the registered URL processing services
    pub async fn list_url_services(&self) -> Result<Value> {
        self.transport.get(URL_SERVICES_ENDPOINT).await
    }

    /// Lists the registered task services
    pub async fn list_task_services(&self) -> Result<Value> {
        self.transport.get(TASK_SERVICES_ENDPOINT).await
    }
}

/// Blocking catalog helper
#[derive(Clone, Debug)]
pub struct BlockingCatalogHelper<T> {
    transport: T,
}

impl<T: Transport> BlockingCatalogHelper<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn process_url(&self, service: &str, url: &str) -> Result<Value> {
        self.transport.get(&process_url_endpoint(service, url))
    }

    pub fn get_by_hash(&self, service: &str, domain: &str, hash: &str) -> Result<Value> {
        self.transport.get(&hash_endpoint(service, domain, hash))
    }

    pub fn list_url_services(&self) -> Result<Value> {
        self.transport.get(URL_SERVICES_ENDPOINT)
    }

    pub fn list_task_services(&self) -> Result<Value> {
        self.transport.get(TASK_SERVICES_ENDPOINT)
    }
}
