//! Task lifecycle: create a task, poll its status, resolve the outcome
//!
//! [`TaskHelper`] waits cooperatively on a tokio runtime and can be
//! cancelled; [`BlockingTaskHelper`] occupies the calling thread. Both share
//! the same request shaping and poll state machine, so they agree on which
//! states are terminal and on when a deadline has passed.

mod blocking;
mod clock;
mod helper;
mod outcome;
mod poll;
mod types;

pub use blocking::BlockingTaskHelper;
pub use clock::{AsyncClock, Clock, SystemClock, TokioClock};
pub use helper::TaskHelper;
pub use outcome::TaskOutcome;
pub use poll::UNKNOWN_ERROR;
pub use types::{CreateTaskRequest, PollConfig, Task, TaskState, TaskStatus};

use std::time::Duration;

/// Task status constants
pub const TASK_STATUS_PENDING: &str = "pending";
pub const TASK_STATUS_RUNNING: &str = "running";
pub const TASK_STATUS_COMPLETED: &str = "completed";
pub const TASK_STATUS_FAILED: &str = "failed";

/// Older API deployments report success as `complete`. It is accepted as an
/// alias of [`TASK_STATUS_COMPLETED`] and logged at warn level.
pub const LEGACY_TASK_STATUS_COMPLETE: &str = "complete";

/// Poll interval used when neither the helper nor the call sets one
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
