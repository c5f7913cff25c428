//! showcase_assets - GLB model acquisition with placeholder fallback
//!
//! # Features
//! - Strict `.glb` container reader (header, chunk walk, JSON/BIN extraction)
//! - Transport abstraction (static files via Tokio, scripted mock)
//! - Async runtime abstraction (Tokio, mock)
//! - Sequential multi-path retry with procedural placeholder substitution
//! - Background model sets with per-slot state and progressive reveal
//!
//! # Quick Start
//!
//! ```ignore
//! use showcase_assets::{FileTransport, ModelPipeline, NamingScheme, TokioSpawner};
//!
//! let pipeline = ModelPipeline::new(FileTransport::new("public"), TokioSpawner::new());
//! let coin = pipeline.load_model(&["./coin.glb"]).await?;
//! let models = pipeline.load_model_set(5, &NamingScheme::single("./models", "M"));
//! ```
//!
//! # Feature Flags
//!
//! - `runtime-tokio`: Enable the Tokio spawner and the filesystem transport

// Core modules
pub mod fallback;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod runtime;
pub mod scene;
pub mod transport;

// Support modules
pub mod showcase;

// Error types
mod error;
pub use error::{AssetError, FaultClass, Result};

// Re-export container types
pub use loader::{
    read_container, BinaryContainer, ChunkKind, ContainerError, ContainerWriter, GlbHeader,
};

// Re-export model types
pub use model::{AnimationClip, GltfSceneParser, ParsedScene, SceneError, SceneParser};

// Re-export scene types
pub use scene::{
    fit_to_view, Aabb, Color, FitOptions, FitPolicy, Material, Mesh, MeshFactory, NodeKind,
    PrimitiveShape, ProceduralMeshFactory, SceneHandle, SceneNode, Stage, Transform, Vertex,
};

// Re-export transport types
#[cfg(feature = "runtime-tokio")]
pub use transport::FileTransport;
pub use transport::{MockResponse, MockTransport, Transport, TransportError};

// Re-export runtime types
pub use runtime::mock::MockSpawner;
#[cfg(feature = "runtime-tokio")]
pub use runtime::tokio_impl::TokioSpawner;
pub use runtime::{AsyncSpawner, JoinHandle};

// Re-export fallback types
pub use fallback::{
    synthesize, Decoration, FallbackError, PlaceholderKind, PlaceholderSpec,
    PLACEHOLDER_GENERATOR,
};

// Re-export pipeline types
pub use pipeline::{
    AssetInfo, CameraInfo, LoadMetricsHandle, LoadResult, ModelPipeline, ModelSet,
    NamingScheme, PipelineConfig, Provenance, SlotHandle, SlotState,
};

pub use showcase::{Showcase, SlotUpdate};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
