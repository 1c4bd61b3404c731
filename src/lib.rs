//! # Ulfom Rust SDK
//!
//! This crate provides a Rust SDK for the Ulfom task-processing API.
//! Work is submitted as a task (a service name plus a target URL), and the
//! SDK polls the API until the task completes, fails or runs out of time.
//!
//! ## Features
//!
//! - **Async and blocking clients**: the same API over `reqwest` and `reqwest::blocking`
//! - **Task helpers**: `create_and_wait` with poll interval, deadline and cancellation
//! - **Catalog helpers**: URL processing, content lookup and service listings
//!
//! ## Quick Start
//!
//! ### Waiting on a task asynchronously
//!
//! ```rust,no_run
//! use ulfom_rust_sdk::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::with_config(
//!         ClientConfig::new("https://www.ulfom.com/api/v1").with_api_key("my-api-key"),
//!     )?;
//!     let tasks = TaskHelper::new(client);
//!
//!     let status = tasks
//!         .create_and_wait(
//!             "sitemap_crawl",
//!             "https://example.com",
//!             Some(json!({"depth": 2})),
//!             Some(Duration::from_secs(2)),
//!             Some(Duration::from_secs(120)),
//!         )
//!         .await?;
//!     println!("Result: {:?}", status.result);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Waiting on a task from a plain thread
//!
//! ```rust,no_run
//! use ulfom_rust_sdk::prelude::*;
//! use std::time::Duration;
//!
//! fn main() -> Result<()> {
//!     let client = BlockingClient::new("https://www.ulfom.com/api/v1")?;
//!     let tasks = BlockingTaskHelper::new(client)
//!         .with_poll_config(PollConfig::new(Duration::from_secs(1), Some(Duration::from_secs(60)))?);
//!
//!     match tasks.create_and_wait("sitemap_crawl", "https://example.com", None, None, None) {
//!         Ok(status) => println!("Result: {:?}", status.result),
//!         Err(SdkError::TaskFailed { error, .. }) => eprintln!("Task failed: {}", error),
//!         Err(SdkError::TaskTimeout { elapsed, .. }) => eprintln!("Gave up after {:?}", elapsed),
//!         Err(e) => return Err(e),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod task;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, SdkError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{BlockingCatalogHelper, CatalogHelper};
    pub use crate::error::{Result, SdkError};
    pub use crate::task::{BlockingTaskHelper, PollConfig, Task, TaskHelper, TaskOutcome, TaskState, TaskStatus};
    pub use crate::transport::{AsyncTransport, BlockingClient, Client, ClientConfig, Transport};
    pub use serde_json::{json, Value};
    pub use tokio_util::sync::CancellationToken;
}
