//! Task data types

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

use super::{
    DEFAULT_POLL_INTERVAL, LEGACY_TASK_STATUS_COMPLETE, TASK_STATUS_COMPLETED, TASK_STATUS_FAILED,
    TASK_STATUS_PENDING, TASK_STATUS_RUNNING,
};
use crate::error::{Result, SdkError};

/// State tag of a task as reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Failed,
    /// Any tag the SDK does not know; treated as non-terminal
    Other(String),
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskState::Pending => TASK_STATUS_PENDING,
            TaskState::Running => TASK_STATUS_RUNNING,
            TaskState::Completed => TASK_STATUS_COMPLETED,
            TaskState::Failed => TASK_STATUS_FAILED,
            TaskState::Other(tag) => tag,
        }
    }
}

impl From<String> for TaskState {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            TASK_STATUS_PENDING => TaskState::Pending,
            TASK_STATUS_RUNNING => TaskState::Running,
            TASK_STATUS_COMPLETED => TaskState::Completed,
            TASK_STATUS_FAILED => TaskState::Failed,
            LEGACY_TASK_STATUS_COMPLETE => {
                warn!(
                    "API reported legacy state '{}', treating it as '{}'",
                    LEGACY_TASK_STATUS_COMPLETE, TASK_STATUS_COMPLETED
                );
                TaskState::Completed
            }
            _ => TaskState::Other(tag),
        }
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        match state {
            TaskState::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot returned by a task status query
///
/// Fields the SDK does not interpret are kept in `extra`, so the full
/// payload reaches the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    #[serde(rename = "status", alias = "state")]
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task status: {}", self.state)
    }
}

/// A task accepted by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier assigned by the API
    pub task_id: String,
    pub service: String,
    pub target: String,
    pub parameters: Map<String, Value>,
    /// Remaining fields of the creation response
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task {} (service: {}, target: {})", self.task_id, self.service, self.target)
    }
}

/// Body of a task creation request
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    #[serde(rename = "url")]
    pub target: String,
    pub parameters: Map<String, Value>,
}

/// Polling cadence and deadline for waiting on a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl PollConfig {
    /// Creates a poll configuration; `timeout = None` waits indefinitely
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidConfig`] for a zero poll interval.
    pub fn new(poll_interval: Duration, timeout: Option<Duration>) -> Result<Self> {
        if poll_interval.is_zero() {
            return Err(SdkError::InvalidConfig("poll_interval must be positive".into()));
        }
        Ok(Self { poll_interval, timeout })
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Applies per-call overrides on top of this configuration
    pub(crate) fn resolve(&self, poll_interval: Option<Duration>, timeout: Option<Duration>) -> Result<Self> {
        Self::new(poll_interval.unwrap_or(self.poll_interval), timeout.or(self.timeout))
    }
}
