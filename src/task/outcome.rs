//! Tagged result of waiting on a task

use serde_json::Value;
use std::time::Duration;

use super::types::TaskStatus;
use crate::error::{Result, SdkError};

/// How a wait ended, for callers that prefer matching over error handling
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// The task completed; carries the full status payload
    Completed(TaskStatus),
    /// The API reported the task as failed
    Failed {
        service: String,
        task_id: String,
        error: Value,
    },
    /// The deadline passed while the task was still running
    TimedOut {
        service: String,
        task_id: String,
        timeout: Duration,
        elapsed: Duration,
    },
    /// The wait was cancelled by the caller
    Cancelled { service: String, task_id: String },
}

impl TaskOutcome {
    /// Classifies the result of a wait
    ///
    /// Transport, configuration and malformed-payload errors are not task
    /// outcomes and are handed back unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ulfom_rust_sdk::task::TaskOutcome;
    /// use ulfom_rust_sdk::SdkError;
    /// use std::time::Duration;
    ///
    /// let waited = Err(SdkError::TaskTimeout {
    ///     service: "sitemap_crawl".into(),
    ///     task_id: "abc".into(),
    ///     timeout: Duration::from_secs(1),
    ///     elapsed: Duration::from_secs(1),
    /// });
    /// let outcome = TaskOutcome::from_result(waited).unwrap();
    /// assert!(matches!(outcome, TaskOutcome::TimedOut { .. }));
    /// ```
    pub fn from_result(result: Result<TaskStatus>) -> Result<Self> {
        match result {
            Ok(status) => Ok(TaskOutcome::Completed(status)),
            Err(SdkError::TaskFailed { service, task_id, error }) => {
                Ok(TaskOutcome::Failed { service, task_id, error })
            }
            Err(SdkError::TaskTimeout {
                service,
                task_id,
                timeout,
                elapsed,
            }) => Ok(TaskOutcome::TimedOut {
                service,
                task_id,
                timeout,
                elapsed,
            }),
            Err(SdkError::Cancelled { service, task_id }) => Ok(TaskOutcome::Cancelled { service, task_id }),
            Err(other) => Err(other),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskOutcome::Completed(_))
    }

    /// The completed status, if any
    pub fn into_status(self) -> Option<TaskStatus> {
        match self {
            TaskOutcome::Completed(status) => Some(status),
            _ => None,
        }
    }
}
