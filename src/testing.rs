//! In-memory transport and clock used by the unit tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{Result, SdkError};
use crate::task::Clock;
use crate::transport::{ApiRequest, AsyncTransport, Transport};

/// Answers requests from a script and records every request it sees.
/// The last scripted reply repeats once the script runs dry.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<std::result::Result<Value, String>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Value>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_failure(self, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of status queries seen so far
    pub fn status_queries(&self) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == reqwest::Method::GET && r.endpoint.starts_with("/task/"))
            .count()
    }

    fn reply(&self, request: ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request);
        let mut replies = self.replies.lock().unwrap();
        let next = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        match next {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(SdkError::Connection(message)),
            None => Err(SdkError::Connection("script exhausted".into())),
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: ApiRequest) -> Result<Value> {
        self.reply(request)
    }
}

#[async_trait]
impl AsyncTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.reply(request)
    }
}

/// Clock whose sleeps advance time instantly
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) {
        *self.offset.lock().unwrap() += duration;
    }
}
