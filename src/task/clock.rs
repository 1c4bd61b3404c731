//! Time sources used while waiting on tasks
//!
//! The poll loop never reads ambient time directly. It asks a clock for the
//! current monotonic instant and asks the same clock to suspend, so tests can
//! substitute a clock that advances instantly.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic clock that suspends by blocking the current thread
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Monotonic clock that suspends by yielding to the async scheduler
#[async_trait]
pub trait AsyncClock: Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// [`Clock`] backed by `std::time::Instant` and `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// [`AsyncClock`] backed by `tokio::time`, which honours a paused runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl AsyncClock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
