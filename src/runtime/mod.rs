//! Async runtime abstraction
//!
//! The pipeline never names an executor directly: background model-set
//! loading is spawned and fetch timeouts are timed through [`AsyncSpawner`],
//! so the same code runs under Tokio or under the deterministic mock used
//! in tests.

pub mod mock;
#[cfg(feature = "runtime-tokio")]
pub mod tokio_impl;

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A boxed future that can be sent across threads
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Type-erased handle to a spawned slot load
///
/// Dropping it detaches the task. Downcast to the runtime's own handle type
/// (`tokio::task::JoinHandle<()>` under Tokio) to await or abort it.
#[derive(Debug)]
pub struct JoinHandle {
    inner: Box<dyn std::any::Any + Send>,
}

impl JoinHandle {
    pub fn new<T: Send + 'static>(handle: T) -> Self {
        Self {
            inner: Box::new(handle),
        }
    }

    pub fn downcast<T: 'static>(self) -> Option<T> {
        self.inner.downcast::<T>().ok().map(|b| *b)
    }
}

/// Task spawner and timer source
///
/// # Example
/// ```ignore
/// let spawner = TokioSpawner::new();
/// spawner.spawn(async move {
///     pipeline.load_model_indexed(0, &paths).await;
/// });
/// ```
pub trait AsyncSpawner: Send + Sync + Clone + Debug {
    /// Run `task` in the background
    fn spawn<F>(&self, task: F) -> JoinHandle
    where
        F: Future<Output = ()> + Send + 'static;

    /// Future that completes once `duration` has elapsed
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;

    /// Get the name of this runtime (for debugging)
    fn runtime_name(&self) -> &'static str;
}

pub use mock::MockSpawner;

#[cfg(feature = "runtime-tokio")]
pub use tokio_impl::TokioSpawner;
