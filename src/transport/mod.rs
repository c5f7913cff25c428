//! Transport abstraction for fetching model bytes
//!
//! This module provides the trait the acquisition pipeline fetches through,
//! so loading works the same against HTTP, a local document root, or a
//! scripted mock.

pub mod mock;
#[cfg(feature = "runtime-tokio")]
pub mod fs;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error type for fetch operations
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP {status} fetching {path}")]
    Status { path: String, status: u16 },

    #[error("Network failure fetching {path}: {reason}")]
    Network { path: String, reason: String },

    #[error("Fetching {path} timed out after {after:?}")]
    Timeout { path: String, after: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// 404 for `path`
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::Status {
            path: path.into(),
            status: 404,
        }
    }

    /// Whether this error was produced by the per-fetch timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type for fetch operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Asynchronous byte fetcher
///
/// Uses async-trait for dyn compatibility.
///
/// # Example
/// ```ignore
/// let transport = MockTransport::new().with_bytes("./models/M1.glb", glb);
/// let bytes = transport.fetch_bytes("./models/M1.glb").await?;
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the complete body at `path`
    ///
    /// Dropping the returned future abandons the request.
    async fn fetch_bytes(&self, path: &str) -> TransportResult<Vec<u8>>;

    /// Get the name of this transport (for debugging)
    fn transport_name(&self) -> &'static str;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch_bytes(&self, path: &str) -> TransportResult<Vec<u8>> {
        (**self).fetch_bytes(path).await
    }

    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }
}

// Re-export implementations
pub use mock::{MockResponse, MockTransport};

#[cfg(feature = "runtime-tokio")]
pub use fs::FileTransport;
