//! Async task helper

use log::{debug, info};
use serde_json::Value;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::clock::{AsyncClock, TokioClock};
use super::poll::{self, PollLoop};
use super::types::{PollConfig, Task, TaskStatus};
use crate::error::{Result, SdkError};
use crate::transport::AsyncTransport;

/// Creates tasks and waits for them without blocking the runtime
///
/// Between status queries the wait yields to the scheduler. Dropping the
/// returned future (or aborting the tokio task driving it) stops the poll
/// loop at its current await point; no further requests are sent.
#[derive(Clone, Debug)]
pub struct TaskHelper<T, C = TokioClock> {
    transport: T,
    clock: C,
    config: PollConfig,
}

impl<T: AsyncTransport> TaskHelper<T, TokioClock> {
    /// Creates a helper with the default poll configuration (1 second
    /// interval, no timeout)
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use ulfom_rust_sdk::task::TaskHelper;
    /// use ulfom_rust_sdk::transport::Client;
    /// use std::time::Duration;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new("https://www.ulfom.com/api/v1")?;
    /// let tasks = TaskHelper::new(client);
    /// let status = tasks
    ///     .create_and_wait("sitemap_crawl", "https://example.com", None, None, Some(Duration::from_secs(60)))
    ///     .await?;
    /// println!("Result: {:?}", status.result);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(transport: T) -> Self {
        Self::with_clock(transport, TokioClock)
    }
}

impl<T: AsyncTransport, C: AsyncClock> TaskHelper<T, C> {
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
    /// [`SdkError::InvalidArgument`] for an empty service or target, a
    /// transport error if the request fails, and
    /// [`SdkError::MalformedResponse`] if the reply has no `task_id`.
    pub async fn create_task(&self, service: &str, target: &str, parameters: Option<Value>) -> Result<Task> {
        let request = poll::create_request(service, target, parameters)?;
        let response = self.transport.send(request.clone()).await?;
        let task = poll::parse_task(service, &request, response)?;
        info!("Created {}", task);
        Ok(task)
    }

    /// Fetches the current status of a task with a single request
    pub async fn get_task_status(&self, service: &str, task_id: &str) -> Result<TaskStatus> {
        let response = self.transport.send(poll::status_request(service, task_id)).await?;
        poll::parse_status(response)
    }

    /// Polls a task until it completes, fails or times out
    ///
    /// `poll_interval` and `timeout` override the helper's configuration for
    /// this call. The first status query is sent one full interval after the
    /// call starts, and queries never overlap.
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
    /// [`SdkError::TaskFailed`] when the API reports the task as failed,
    /// [`SdkError::TaskTimeout`] when the deadline passes first, and any
    /// transport error unchanged.
    pub async fn wait_for_task(
        &self,
        service: &str,
        task_id: &str,
        poll_interval: Option<Duration>,
        timeout: Option<Duration>,
    ) -> Result<TaskStatus> {
        let config = self.config.resolve(poll_interval, timeout)?;
        let mut poll = PollLoop::start(service, task_id, config, self.clock.now());

        loop {
            self.clock.sleep(poll.interval()).await;
            poll.check_deadline(self.clock.now())?;

            let status = self.get_task_status(service, task_id).await?;
            if let ControlFlow::Break(outcome) = poll.observe(status, self.clock.now()) {
                return outcome;
            }
        }
    }

    /// Like [`TaskHelper::wait_for_task`], but stops as soon as `cancel`
    /// fires, whether the loop is sleeping or awaiting a status query
    ///
    /// # Errors
    ///
    /// [`SdkError::Cancelled`] on cancellation, otherwise the same errors as
    /// [`TaskHelper::wait_for_task`].
    pub async fn wait_for_task_cancellable(
        &self,
        service: &str,
        task_id: &str,
        poll_interval: Option<Duration>,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<TaskStatus> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Wait for task {} on '{}' cancelled", task_id, service);
                Err(SdkError::Cancelled {
                    service: service.to_string(),
                    task_id: task_id.to_string(),
                })
            }
            outcome = self.wait_for_task(service, task_id, poll_interval, timeout) => outcome,
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
    pub async fn create_and_wait(
        &self,
        service: &str,
        target: &str,
        parameters: Option<Value>,
        poll_interval: Option<Duration>,
        timeout: Option<Duration>,
    ) -> Result<TaskStatus> {
        let task = self.create_task(service, target, parameters).await?;
        self.wait_for_task(service, &task.task_id, poll_interval, timeout).await
    }

    /// Creates a task and waits for it until `cancel` fires
    ///
    /// Cancellation during creation abandons the request; cancellation during
    /// the wait leaves the created task running remotely.
    ///
    /// # Errors
    ///
    /// [`SdkError::Cancelled`] on cancellation. When `cancel` fires before the
    /// API has assigned an id, `task_id` in that error is an empty string and
    /// does not name a task. Otherwise the same errors as
    /// [`TaskHelper::create_and_wait`].
    pub async fn create_and_wait_cancellable(
        &self,
        service: &str,
        target: &str,
        parameters: Option<Value>,
        poll_interval: Option<Duration>,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<TaskStatus> {
        let task = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(SdkError::Cancelled {
                    service: service.to_string(),
                    task_id: String::new(),
                });
            }
            task = self.create_task(service, target, parameters) => task?,
        };
        self.wait_for_task_cancellable(service, &task.task_id, poll_interval, timeout, cancel)
            .await
    }
}
