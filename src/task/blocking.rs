//! Blocking task helper

use log::info;
use serde_json::Value;
use std::ops::ControlFlow;
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use super::poll::{self, PollLoop};
use super::types::{PollConfig, Task, TaskStatus};
use crate::error::Result;
use crate::transport::Transport;

/// Creates tasks and waits for them on the calling thread
///
/// While waiting, the thread sleeps between status queries and does nothing
/// else. There is no way to interrupt a wait other than letting it reach a
/// terminal state or its timeout; use [`super::TaskHelper`] when the wait must
/// be cancellable.
#[derive(Clone, Debug)]
pub struct BlockingTaskHelper<T, C = SystemClock> {
    transport: T,
    clock: C,
    config: PollConfig,
}

impl<T: Transport> BlockingTaskHelper<T, SystemClock> {
    /// Creates a helper with the default poll configuration (1 second
    /// interval, no timeout)
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use ulfom_rust_sdk::task::BlockingTaskHelper;
    /// use ulfom_rust_sdk::transport::BlockingClient;
    ///
    /// let client = BlockingClient::new("https://www.ulfom.com/api/v1").unwrap();
    /// let tasks = BlockingTaskHelper::new(client);
    /// ```
    pub fn new(transport: T) -> Self {
        Self::with_clock(transport, SystemClock)
    }
}

impl<T: Transport, C: Clock> BlockingTaskHelper<T, C> {
    /// Creates a helper that reads time from and sleeps through `clock`
    pub fn with_clock(transport: T, clock: C) -> Self {
        Self {
            transport,
            clock,
            config: PollConfig::default(),
        }
    }

    /// Replaces the per-helper poll configuration
    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    pub fn poll_config(&self) -> PollConfig {
        self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Creates a new task
    ///
    /// `parameters` must be a JSON object when given and defaults to `{}`.
    ///
    /// # Arguments
    ///
    /// * `service` - Name of the service that processes the task
    /// * `target` - URL or resource identifier the service works on
    /// * `parameters` - Optional service-specific parameters
    ///
    /// # Errors
    ///
    /// [`crate::SdkError::InvalidArgument`] for an empty service or target,
    /// a transport error if the request fails, and
    /// [`crate::SdkError::MalformedResponse`] if the reply has no `task_id`.
    pub fn create_task(&self, service: &str, target: &str, parameters: Option<Value>) -> Result<Task> {
        let request = poll::create_request(service, target, parameters)?;
        let response = self.transport.send(request.clone())?;
        let task = poll::parse_task(service, &request, response)?;
        info!("Created {}", task);
        Ok(task)
    }

    /// Fetches the current status of a task with a single request
    pub fn get_task_status(&self, service: &str, task_id: &str) -> Result<TaskStatus> {
        let response = self.transport.send(poll::status_request(service, task_id))?;
        poll::parse_status(response)
    }

    /// Polls a task until it completes, fails or times out
    ///
    /// `poll_interval` and `timeout` override the helper's configuration for
    /// this call. The first status query is sent one full interval after the
    /// call starts.
    ///
    /// # Arguments
    ///
    /// * `service` - Name of the service that owns the task
    /// * `task_id` - Identifier returned when the task was created
    /// * `poll_interval` - Delay between status queries for this call
    /// * `timeout` - Maximum time to wait for this call
    ///
    /// # Errors
    ///
    /// [`crate::SdkError::TaskFailed`] when the API reports the task as
    /// failed, [`crate::SdkError::TaskTimeout`] when the deadline passes first,
    /// and any transport error unchanged.
    pub fn wait_for_task(
        &self,
        service: &str,
        task_id: &str,
        poll_interval: Option<Duration>,
        timeout: Option<Duration>,
    ) -> Result<TaskStatus> {
        let config = self.config.resolve(poll_interval, timeout)?;
        let mut poll = PollLoop::start(service, task_id, config, self.clock.now());

        loop {
            self.clock.sleep(poll.interval());
            poll.check_deadline(self.clock.now())?;

            let status = self.get_task_status(service, task_id)?;
            if let ControlFlow::Break(outcome) = poll.observe(status, self.clock.now()) {
                return outcome;
            }
        }
    }

    /// Creates a task and waits for it
    ///
    /// Nothing is done to the created task if waiting fails.
    ///
    /// # Arguments
    ///
    /// * `service` - Name of the service that processes the task
    /// * `target` - URL or resource identifier the service works on
    /// * `parameters` - Optional service-specific parameters
    /// * `poll_interval` - Delay between status queries for this call
    /// * `timeout` - Maximum time to wait for this call
    pub fn create_and_wait(
        &self,
        service: &str,
        target: &str,
        parameters: Option<Value>,
        poll_interval: Option<Duration>,
        timeout: Option<Duration>,
    ) -> Result<TaskStatus> {
        let task = self.create_task(service, target, parameters)?;
        self.wait_for_task(service, &task.task_id, poll_interval, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use crate::task::TaskState;
    use crate::testing::{ManualClock, ScriptedTransport};
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn running() -> Value {
        json!({"status": "success", "data": {"status": "running"}})
    }

    fn helper<'a>(
        transport: &'a ScriptedTransport,
        clock: &'a ManualClock,
        timeout_ms: u64,
    ) -> BlockingTaskHelper<&'a ScriptedTransport, &'a ManualClock> {
        BlockingTaskHelper::with_clock(transport, clock).with_poll_config(
            PollConfig::new(Duration::from_millis(100), Some(Duration::from_millis(timeout_ms))).unwrap(),
        )
    }

    #[test]
    fn test_wait_for_task_success() {
        let transport = ScriptedTransport::new([
            running(),
            running(),
            json!({"status": "success", "data": {"status": "completed", "result": {"key": "value"}}}),
        ]);
        let clock = ManualClock::new();

        let status = assert_ok!(helper(&transport, &clock, 1000).wait_for_task("sitemap_crawl", "test-task-123", None, None));
        assert_eq!(status.state, TaskState::Completed);
        assert_eq!(status.result, Some(json!({"key": "value"})));
        assert_eq!(transport.status_queries(), 3);
        assert_eq!(clock.elapsed(), Duration::from_millis(300));
        assert_eq!(transport.requests()[0].endpoint, "/task/sitemap_crawl/test-task-123");
    }

    #[test]
    fn test_wait_for_task_timeout() {
        let transport = ScriptedTransport::new([running()]);
        let clock = ManualClock::new();

        let err = assert_err!(helper(&transport, &clock, 300).wait_for_task("sitemap_crawl", "test-task-123", None, None));
        match err {
            SdkError::TaskTimeout { timeout, elapsed, .. } => {
                assert_eq!(timeout, Duration::from_millis(300));
                assert!(elapsed >= timeout);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        // queries at 100ms and 200ms; the deadline passes during the third sleep
        assert_eq!(transport.status_queries(), 2);
        assert_eq!(clock.elapsed(), Duration::from_millis(300));
    }

    #[test]
    fn test_wait_for_task_failure_carries_descriptor() {
        let transport = ScriptedTransport::new([
            running(),
            json!({"status": "failed", "error": {"code": 502, "message": "upstream down"}}),
        ]);
        let clock = ManualClock::new();

        let err = assert_err!(helper(&transport, &clock, 10_000).wait_for_task("sitemap_crawl", "t1", None, None));
        match err {
            SdkError::TaskFailed { service, task_id, error } => {
                assert_eq!(service, "sitemap_crawl");
                assert_eq!(task_id, "t1");
                assert_eq!(error["message"], "upstream down");
            }
            other => panic!("expected task failure, got {:?}", other),
        }
        assert_eq!(transport.status_queries(), 2);
    }

    #[test]
    fn test_create_and_wait() {
        let transport = ScriptedTransport::new([
            json!({"task_id": "abc"}),
            running(),
            running(),
            json!({"status": "completed", "result": {"pages": 3}}),
        ]);
        let clock = ManualClock::new();

        let status = assert_ok!(helper(&transport, &clock, 1000).create_and_wait(
            "sitemap_crawl",
            "https://example.com",
            None,
            None,
            None
        ));
        assert_eq!(status.result, Some(json!({"pages": 3})));

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].endpoint, "/task/sitemap_crawl");
        assert_eq!(requests[0].body, Some(json!({"url": "https://example.com", "parameters": {}})));
        assert_eq!(transport.status_queries(), 3);
        assert!(clock.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn test_create_and_wait_stops_before_deadline_crossing_query() {
        let transport = ScriptedTransport::new([json!({"task_id": "abc"}), running()]);
        let clock = ManualClock::new();

        let err = assert_err!(helper(&transport, &clock, 250).create_and_wait(
            "sitemap_crawl",
            "https://example.com",
            None,
            None,
            None
        ));
        assert!(matches!(err, SdkError::TaskTimeout { .. }));
        assert_eq!(transport.status_queries(), 2);
        assert!(clock.elapsed() >= Duration::from_millis(200));
        assert!(clock.elapsed() <= Duration::from_millis(300));
    }

    #[test]
    fn test_create_failure_skips_wait() {
        let transport = ScriptedTransport::default().push_failure("connection refused");
        let clock = ManualClock::new();

        let err = assert_err!(helper(&transport, &clock, 1000).create_and_wait(
            "sitemap_crawl",
            "https://example.com",
            None,
            None,
            None
        ));
        assert!(err.is_transport());
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_transport_failure_while_polling_is_not_retried() {
        let transport = ScriptedTransport::new([running()]).push_failure("connection reset");
        let clock = ManualClock::new();

        let err = assert_err!(helper(&transport, &clock, 10_000).wait_for_task("sitemap_crawl", "t1", None, None));
        assert!(matches!(err, SdkError::Connection(ref msg) if msg == "connection reset"));
        assert_eq!(transport.status_queries(), 2);
    }

    #[test]
    fn test_per_call_overrides_win() {
        let transport = ScriptedTransport::new([running(), json!({"status": "completed"})]);
        let clock = ManualClock::new();

        let tasks = helper(&transport, &clock, 100);
        assert_ok!(tasks.wait_for_task(
            "sitemap_crawl",
            "t1",
            Some(Duration::from_millis(20)),
            Some(Duration::from_secs(5))
        ));
        assert_eq!(clock.elapsed(), Duration::from_millis(40));
    }

    #[test]
    fn test_zero_interval_rejected_before_any_request() {
        let transport = ScriptedTransport::new([running()]);
        let clock = ManualClock::new();

        let err = assert_err!(helper(&transport, &clock, 100).wait_for_task(
            "sitemap_crawl",
            "t1",
            Some(Duration::ZERO),
            None
        ));
        assert!(matches!(err, SdkError::InvalidConfig(_)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_malformed_status_propagates() {
        let transport = ScriptedTransport::new([json!({"progress": 10})]);
        let clock = ManualClock::new();

        let err = assert_err!(helper(&transport, &clock, 1000).get_task_status("sitemap_crawl", "t1"));
        assert!(matches!(err, SdkError::Json(_)));
    }
}
