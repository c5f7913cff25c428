//! Tokio async runtime implementation

use super::{AsyncSpawner, BoxFuture, JoinHandle};
use std::future::Future;
use std::time::Duration;

/// Tokio-based async spawner
///
/// Spawns tasks on the ambient Tokio runtime; must be used from inside one.
/// The returned [`JoinHandle`] wraps a `tokio::task::JoinHandle<()>`.
#[derive(Clone, Debug, Default, Copy)]
pub struct TokioSpawner;

impl TokioSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl AsyncSpawner for TokioSpawner {
    fn spawn<F>(&self, task: F) -> JoinHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        JoinHandle::new(tokio::spawn(task))
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }

    fn runtime_name(&self) -> &'static str {
        "Tokio"
    }
}
