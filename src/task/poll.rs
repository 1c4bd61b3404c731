//! Request shaping and the poll state machine shared by both helpers
//!
//! Nothing in here performs I/O or reads the clock. The blocking and async
//! helpers feed it instants and decoded payloads, so both execution models
//! make identical decisions.

use log::debug;
use serde_json::{Map, Value};
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use super::types::{CreateTaskRequest, PollConfig, Task, TaskState, TaskStatus};
use crate::error::{Result, SdkError};
use crate::transport::ApiRequest;

/// Placeholder descriptor for failures reported without an `error` field
pub const UNKNOWN_ERROR: &str = "Unknown error";

const ENVELOPE_SUCCESS: &str = "success";

pub(crate) fn create_request(service: &str, target: &str, parameters: Option<Value>) -> Result<ApiRequest> {
    if service.is_empty() {
        return Err(SdkError::InvalidArgument("service cannot be empty".into()));
    }
    if target.is_empty() {
        return Err(SdkError::InvalidArgument("target cannot be empty".into()));
    }
    let parameters = match parameters {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(SdkError::InvalidArgument(format!(
                "parameters must be a JSON object, got {}",
                other
            )))
        }
    };
    let body = CreateTaskRequest {
        target: target.to_string(),
        parameters,
    };
    Ok(ApiRequest::post(format!("/task/{}", service), serde_json::to_value(body)?))
}

pub(crate) fn status_request(service: &str, task_id: &str) -> ApiRequest {
    ApiRequest::get(format!("/task/{}/{}", service, task_id))
}

/// Strips the `{"status": "success", "data": {...}}` envelope when present
///
/// An object only counts as an envelope when its `data` is an object and it
/// carries no task state of its own: `status` is absent or `"success"`, and
/// there is no `state` field.
pub(crate) fn unwrap_envelope(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if is_envelope(&map) => map.remove("data").unwrap_or(Value::Null),
        other => other,
    }
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    let wraps_object = matches!(map.get("data"), Some(Value::Object(_)));
    let status_is_envelope = match map.get("status") {
        None => true,
        Some(Value::String(tag)) => tag == ENVELOPE_SUCCESS,
        Some(_) => false,
    };
    wraps_object && status_is_envelope && !map.contains_key("state")
}

/// Builds a [`Task`] from a creation response and the request that produced it
pub(crate) fn parse_task(service: &str, request: &ApiRequest, response: Value) -> Result<Task> {
    let mut fields = match unwrap_envelope(response) {
        Value::Object(map) => map,
        other => {
            return Err(SdkError::MalformedResponse(format!(
                "task creation returned a non-object payload: {}",
                other
            )))
        }
    };
    let task_id = match fields.remove("task_id") {
        Some(Value::String(id)) if !id.is_empty() => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(SdkError::MalformedResponse(
                "task creation response has no task_id".into(),
            ))
        }
    };

    let body = request.body.as_ref();
    let target = body
        .and_then(|b| b.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let parameters = body
        .and_then(|b| b.get("parameters"))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Ok(Task {
        task_id,
        service: service.to_string(),
        target,
        parameters,
        extra: fields,
    })
}

pub(crate) fn parse_status(response: Value) -> Result<TaskStatus> {
    Ok(serde_json::from_value(unwrap_envelope(response))?)
}

/// Per-call loop state for one wait
pub(crate) struct PollLoop<'a> {
    service: &'a str,
    task_id: &'a str,
    config: PollConfig,
    started: Instant,
    queries: usize,
}

impl<'a> PollLoop<'a> {
    pub fn start(service: &'a str, task_id: &'a str, config: PollConfig, now: Instant) -> Self {
        debug!(
            "Waiting for task {} on '{}' (interval {:?}, timeout {:?})",
            task_id,
            service,
            config.poll_interval(),
            config.timeout()
        );
        Self {
            service,
            task_id,
            config,
            started: now,
            queries: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.config.poll_interval()
    }

    pub fn queries(&self) -> usize {
        self.queries
    }

    /// Runs after each suspension. The first query always goes out; later
    /// ones are skipped once the deadline has passed during the sleep.
    pub fn check_deadline(&self, now: Instant) -> Result<()> {
        match self.expired(now) {
            Some(err) if self.queries > 0 => Err(err),
            _ => Ok(()),
        }
    }

    /// Evaluates one status snapshot
    pub fn observe(&mut self, status: TaskStatus, now: Instant) -> ControlFlow<Result<TaskStatus>> {
        self.queries += 1;
        debug!(
            "Task {} on '{}' is {} after {} queries",
            self.task_id, self.service, status.state, self.queries
        );

        match status.state {
            TaskState::Completed => ControlFlow::Break(Ok(status)),
            TaskState::Failed => ControlFlow::Break(Err(SdkError::TaskFailed {
                service: self.service.to_string(),
                task_id: self.task_id.to_string(),
                error: status.error.unwrap_or_else(|| Value::String(UNKNOWN_ERROR.into())),
            })),
            _ => match self.expired(now) {
                Some(err) => ControlFlow::Break(Err(err)),
                None => ControlFlow::Continue(()),
            },
        }
    }

    fn expired(&self, now: Instant) -> Option<SdkError> {
        let timeout = self.config.timeout()?;
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed >= timeout).then(|| SdkError::TaskTimeout {
            service: self.service.to_string(),
            task_id: self.task_id.to_string(),
            timeout,
            elapsed,
        })
    }
}
