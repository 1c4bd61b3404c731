//! Error types for the Ulfom Rust SDK

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection errors raised by custom transports
    #[error("Connection error: {0}")]
    Connection(String),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid configuration errors, raised before any request is sent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid call arguments, raised before any request is sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote system reported the task as failed
    #[error("Task {task_id} on service '{service}' failed: {error}")]
    TaskFailed {
        service: String,
        task_id: String,
        error: Value,
    },

    /// The task stayed non-terminal past the configured deadline
    #[error("Task {task_id} on service '{service}' did not complete within {timeout:?} (waited {elapsed:?})")]
    TaskTimeout {
        service: String,
        task_id: String,
        timeout: Duration,
        elapsed: Duration,
    },

    /// The surrounding unit of work was cancelled while waiting
    #[error("Wait for task {task_id} on service '{service}' was cancelled")]
    Cancelled { service: String, task_id: String },

    /// The API answered with a payload the SDK cannot interpret
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl SdkError {
    /// Returns `true` for failures that originate below the orchestrator
    /// (connectivity, non-success status, undecodable body).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SdkError::Http(_) | SdkError::Connection(_) | SdkError::Json(_) | SdkError::UrlParse(_)
        )
    }
}

impl From<String> for SdkError {
    fn from(s: String) -> Self {
        SdkError::Connection(s)
    }
}

impl From<&str> for SdkError {
    fn from(s: &str) -> Self {
        SdkError::Connection(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_classification() {
        assert!(SdkError::from("connection refused").is_transport());
        assert!(!SdkError::InvalidConfig("x".into()).is_transport());
        assert!(!SdkError::TaskFailed {
            service: "s".into(),
            task_id: "t".into(),
            error: json!("boom"),
        }
        .is_transport());
    }

    #[test]
    fn test_timeout_message_names_task() {
        let err = SdkError::TaskTimeout {
            service: "sitemap_crawl".into(),
            task_id: "abc".into(),
            timeout: Duration::from_millis(250),
            elapsed: Duration::from_millis(300),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc"));
        assert!(msg.contains("sitemap_crawl"));
    }
}
