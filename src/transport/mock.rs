//! Mock transport for testing
//!
//! Serves scripted responses per path and records every fetch in order, so
//! tests can assert exactly which candidate paths were tried.

use super::{Transport, TransportError, TransportResult};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Scripted outcome for one path
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// Successful body
    Bytes(Vec<u8>),
    /// HTTP error status
    Status(u16),
    /// Connection-level failure
    Network(String),
    /// Never completes
    Hang,
}

/// Mock transport
///
/// Clones share routes and the call log. Unrouted paths answer 404.
#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    routes: Arc<RwLock<HashMap<String, MockResponse>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    /// Create a transport that answers 404 for every path
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `path` to `response`
    pub fn with_route(self, path: impl Into<String>, response: MockResponse) -> Self {
        self.set_route(path, response);
        self
    }

    /// Route `path` to a successful body
    pub fn with_bytes(self, path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.with_route(path, MockResponse::Bytes(bytes))
    }

    /// Change the response for `path` after construction
    pub fn set_route(&self, path: impl Into<String>, response: MockResponse) {
        self.routes.write().insert(path.into(), response);
    }

    /// Every fetched path, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of fetches made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of fetches made for one path
    pub fn calls_for(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|p| *p == path).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch_bytes(&self, path: &str) -> TransportResult<Vec<u8>> {
        self.calls.lock().push(path.to_string());

        let response = self.routes.read().get(path).cloned();
        match response {
            Some(MockResponse::Bytes(bytes)) => Ok(bytes),
            Some(MockResponse::Status(status)) => Err(TransportError::Status {
                path: path.to_string(),
                status,
            }),
            Some(MockResponse::Network(reason)) => Err(TransportError::Network {
                path: path.to_string(),
                reason,
            }),
            Some(MockResponse::Hang) => futures::future::pending().await,
            None => Err(TransportError::not_found(path)),
        }
    }

    fn transport_name(&self) -> &'static str {
        "Mock"
    }
}
