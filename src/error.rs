//! Error types for showcase_assets

use thiserror::Error;

/// Main error type for asset operations
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Container error: {0}")]
    Container(#[from] crate::loader::ContainerError),

    #[error("Scene error: {0}")]
    Scene(#[from] crate::model::SceneError),

    #[error("Transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("Fallback error: {0}")]
    Fallback(#[from] crate::fallback::FallbackError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Broad category of a failure, used for logging and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultClass {
    /// Fetch failed: HTTP status, network error, timeout
    Transport,
    /// Bytes were not a usable `.glb` or its JSON did not convert
    Container,
    /// Converted cleanly but carried nothing to show
    Semantic,
    /// The caller passed something invalid
    Programmer,
}

impl FaultClass {
    /// Whether faults of this class are recovered by trying the next path
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FaultClass::Programmer)
    }
}

impl AssetError {
    pub fn fault_class(&self) -> FaultClass {
        match self {
            Self::Transport(_) => FaultClass::Transport,
            Self::Container(_) => FaultClass::Container,
            Self::Scene(crate::model::SceneError::EmptyScene) => FaultClass::Semantic,
            Self::Scene(_) => FaultClass::Container,
            Self::Fallback(_) | Self::InvalidArgument(_) => FaultClass::Programmer,
        }
    }
}

/// Result type alias for asset operations
pub type Result<T> = std::result::Result<T, AssetError>;
