//! Mock async spawner for testing
//!
//! Runs tasks inline (or drops them) and exposes timers whose outcome is
//! fixed at construction, so timeout paths can be exercised without a clock.

use super::{AsyncSpawner, BoxFuture, JoinHandle};
use std::future::Future;
use std::time::Duration;

/// Deterministic spawner
///
/// `new()` drops spawned tasks, which leaves model-set slots `Pending`;
/// `blocking()` runs each task to completion before `spawn` returns.
/// Timers never fire unless the spawner was built with
/// [`MockSpawner::with_expired_timers`], in which case every `sleep`
/// completes immediately.
#[derive(Clone, Debug, Default)]
pub struct MockSpawner {
    run_tasks: bool,
    timers_expired: bool,
}

impl MockSpawner {
    /// Spawner that drops every task unrun
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawner that runs tasks inline
    pub fn blocking() -> Self {
        Self {
            run_tasks: true,
            ..Self::default()
        }
    }

    /// Make every `sleep` complete immediately
    pub fn with_expired_timers(mut self) -> Self {
        self.timers_expired = true;
        self
    }

    pub fn runs_tasks(&self) -> bool {
        self.run_tasks
    }
}

impl AsyncSpawner for MockSpawner {
    fn spawn<F>(&self, task: F) -> JoinHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.run_tasks {
            futures::executor::block_on(task);
        } else {
            log::debug!("MockSpawner dropped a task");
        }
        JoinHandle::new(())
    }

    fn sleep(&self, _duration: Duration) -> BoxFuture<'static, ()> {
        if self.timers_expired {
            Box::pin(futures::future::ready(()))
        } else {
            Box::pin(futures::future::pending())
        }
    }

    fn runtime_name(&self) -> &'static str {
        "Mock"
    }
}
