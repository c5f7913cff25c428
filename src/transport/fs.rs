//! Static document-root transport
//!
//! Serves site-relative paths (`./models/a.glb`, `/assets/b.glb`,
//! `c.glb`) from a directory on disk using Tokio's async file IO.

use super::{Transport, TransportError, TransportResult};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Transport reading files below a root directory
#[derive(Clone, Debug)]
pub struct FileTransport {
    root: PathBuf,
}

impl FileTransport {
    /// Create a transport rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a request path onto the filesystem
    ///
    /// Leading `/` and `.` components are dropped; any `..` component is
    /// refused so requests cannot escape the root.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) => return None,
            }
        }
        (resolved != self.root).then_some(resolved)
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn fetch_bytes(&self, path: &str) -> TransportResult<Vec<u8>> {
        let Some(file) = self.resolve(path) else {
            return Err(TransportError::Status {
                path: path.to_string(),
                status: 403,
            });
        };

        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TransportError::not_found(path))
            }
            Err(e) => Err(TransportError::Io(e)),
        }
    }

    fn transport_name(&self) -> &'static str {
        "File"
    }
}
