//! Model acquisition pipeline
//!
//! [`ModelPipeline`] turns an ordered list of candidate paths into a
//! [`LoadResult`]. Paths are tried strictly one after another; the first one
//! that fetches, decodes and converts into a non-empty scene wins. When every
//! candidate fails the configured placeholder is synthesized instead, so the
//! only error a caller can see is a programming mistake such as an empty
//! candidate list.
//!
//! # Example
//! ```ignore
//! let pipeline = ModelPipeline::new(FileTransport::new("site"), TokioSpawner::new());
//! let result = pipeline.load_model(&["./models/M1.glb", "./assets/M1.glb"]).await?;
//! if result.is_placeholder() {
//!     log::info!("showing a stand-in for M1");
//! }
//! ```

pub mod metrics;
pub mod naming;
pub mod slots;

pub use metrics::{LoadMetrics, LoadMetricsHandle};
pub use naming::NamingScheme;
pub use slots::{ModelSet, SlotHandle, SlotState};

use crate::error::{AssetError, Result};
use crate::fallback::{synthesize, PlaceholderSpec};
use crate::loader::read_container;
use crate::model::{AnimationClip, GltfSceneParser, ParsedScene, SceneError, SceneParser};
use crate::runtime::{AsyncSpawner, MockSpawner};
use crate::scene::{fit_to_view, FitOptions, MeshFactory, ProceduralMeshFactory, SceneHandle};
use crate::transport::{Transport, TransportError};
use futures::future::{self, Either};
use futures::stream::{FuturesUnordered, Stream};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Abandon a single fetch after this long; `None` leaves timing to the
    /// transport
    pub fetch_timeout: Option<Duration>,
    /// What to synthesize when every candidate fails
    pub placeholder: PlaceholderSpec,
    /// Post-load centring and scaling, applied to real and placeholder
    /// results alike
    pub fit: Option<FitOptions>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: None,
            placeholder: PlaceholderSpec::showcase_cube(),
            fit: Some(FitOptions::viewer()),
        }
    }
}

impl PipelineConfig {
    /// Abandon each fetch after `timeout`
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Set the placeholder synthesized on exhaustion
    pub fn with_placeholder(mut self, placeholder: PlaceholderSpec) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Fit results with `fit`, failing on a non-positive or non-finite target
    pub fn with_fit(mut self, fit: FitOptions) -> Result<Self> {
        fit.validate()?;
        self.fit = Some(fit);
        Ok(self)
    }

    /// Leave results exactly as parsed or synthesized
    pub fn without_fit(mut self) -> Self {
        self.fit = None;
        self
    }

    /// Check settings that can be assigned directly through the public fields
    pub fn validate(&self) -> Result<()> {
        match &self.fit {
            Some(fit) => fit.validate(),
            None => Ok(()),
        }
    }
}

/// Provenance record; advisory only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetInfo {
    pub generator: String,
    pub version: Option<String>,
}

/// Where a result came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Parsed from the candidate at `path`
    Parsed { path: String },
    /// Synthesized after every candidate failed
    Placeholder,
}

/// Camera description; never populated since cameras embedded in files are
/// not read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraInfo {
    pub name: Option<String>,
}

/// Uniform outcome of a load, real or synthesized
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub scene_root: SceneHandle,
    /// Every scene in the asset; the first entry is `scene_root`
    pub scenes: Vec<SceneHandle>,
    pub animations: Vec<AnimationClip>,
    pub cameras: Vec<CameraInfo>,
    pub asset_info: AssetInfo,
    pub provenance: Provenance,
}

impl LoadResult {
    /// Result wrapping a synthesized scene
    pub fn placeholder(scene_root: SceneHandle, asset_info: AssetInfo) -> Self {
        Self {
            scenes: vec![scene_root.clone()],
            scene_root,
            animations: Vec::new(),
            cameras: Vec::new(),
            asset_info,
            provenance: Provenance::Placeholder,
        }
    }

    fn parsed(scene: ParsedScene, path: &str) -> Self {
        let scene_root = SceneHandle::new(scene.root);
        let mut scenes = vec![scene_root.clone()];
        scenes.extend(scene.other_scenes.into_iter().map(SceneHandle::new));

        Self {
            scene_root,
            scenes,
            animations: scene.animations,
            cameras: Vec::new(),
            asset_info: AssetInfo {
                generator: scene.generator.unwrap_or_default(),
                version: scene.version,
            },
            provenance: Provenance::Parsed {
                path: path.to_string(),
            },
        }
    }

    /// Whether this result was synthesized
    pub fn is_placeholder(&self) -> bool {
        self.provenance == Provenance::Placeholder
    }

    /// Path of the winning candidate for real results
    pub fn source_path(&self) -> Option<&str> {
        match &self.provenance {
            Provenance::Parsed { path } => Some(path),
            Provenance::Placeholder => None,
        }
    }
}

/// Fetch, decode and convert models, falling back to placeholders
pub struct ModelPipeline<T: Transport, S: AsyncSpawner = MockSpawner> {
    transport: T,
    spawner: S,
    parser: Arc<dyn SceneParser>,
    factory: Arc<dyn MeshFactory>,
    config: PipelineConfig,
    metrics: LoadMetricsHandle,
}

impl<T: Transport, S: AsyncSpawner> std::fmt::Debug for ModelPipeline<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelPipeline")
            .field("transport", &self.transport.transport_name())
            .field("runtime", &self.spawner.runtime_name())
            .field("parser", &self.parser.parser_name())
            .field("factory", &self.factory.factory_name())
            .field("config", &self.config)
            .finish()
    }
}

impl<T: Transport, S: AsyncSpawner> ModelPipeline<T, S> {
    /// Pipeline with the glTF parser, procedural geometry and default config
    pub fn new(transport: T, spawner: S) -> Self {
        Self {
            transport,
            spawner,
            parser: Arc::new(GltfSceneParser::new()),
            factory: Arc::new(ProceduralMeshFactory::new()),
            config: PipelineConfig::default(),
            metrics: LoadMetricsHandle::new(),
        }
    }

    /// Replace the configuration, rejecting an invalid one
    pub fn with_config(mut self, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Use a different JSON-to-scene converter
    pub fn with_parser(mut self, parser: Arc<dyn SceneParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Use a different geometry source for placeholders
    pub fn with_factory(mut self, factory: Arc<dyn MeshFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get a reference to the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the shared load metrics
    pub fn metrics(&self) -> &LoadMetricsHandle {
        &self.metrics
    }

    /// Load one model from `paths`, trying them in order
    ///
    /// Never fails once `paths` is non-empty: exhaustion yields a
    /// placeholder for slot 0.
    pub async fn load_model<P: AsRef<str> + Sync>(&self, paths: &[P]) -> Result<LoadResult> {
        self.load_model_indexed(0, paths).await
    }

    /// Like [`load_model`](Self::load_model), with `index` selecting the
    /// placeholder color
    pub async fn load_model_indexed<P: AsRef<str> + Sync>(
        &self,
        index: usize,
        paths: &[P],
    ) -> Result<LoadResult> {
        if paths.is_empty() {
            return Err(AssetError::InvalidArgument(
                "candidate path list is empty".to_string(),
            ));
        }
        Ok(self.load_candidates(index, paths).await)
    }

    /// Start loads for slots `0..count` together and yield each
    /// `(index, result)` as it completes
    pub fn load_model_set<'a>(
        &'a self,
        count: usize,
        scheme: &NamingScheme,
    ) -> impl Stream<Item = (usize, LoadResult)> + 'a {
        let loads = FuturesUnordered::new();
        for index in 0..count {
            let paths = scheme.candidates(index);
            loads.push(async move { (index, self.load_candidates(index, &paths).await) });
        }
        loads
    }

    /// Synthesize the configured placeholder for slot `index` without any I/O
    pub fn placeholder(&self, index: usize) -> LoadResult {
        let result = synthesize(&self.config.placeholder, index, self.factory.as_ref());
        self.apply_fit(&result);
        result
    }

    async fn load_candidates<P: AsRef<str> + Sync>(&self, index: usize, paths: &[P]) -> LoadResult {
        for path in paths {
            let path = path.as_ref();
            let started = Instant::now();
            match self.try_candidate(path).await {
                Ok(scene) => {
                    self.metrics.record_real_load(path, started.elapsed());
                    log::info!("Loaded model {index} from {path}");
                    let result = LoadResult::parsed(scene, path);
                    self.apply_fit(&result);
                    return result;
                }
                Err(err) => {
                    let class = err.fault_class();
                    self.metrics.record_fault(class);
                    if matches!(&err, AssetError::Transport(e) if e.is_timeout()) {
                        self.metrics.record_timeout();
                    }
                    log::warn!("Failed to load {path} ({class:?}): {err}");
                }
            }
        }

        log::info!(
            "All {} candidates failed for model {index}, using placeholder",
            paths.len()
        );
        self.metrics.record_placeholder();
        self.placeholder(index)
    }

    async fn try_candidate(&self, path: &str) -> Result<ParsedScene> {
        self.metrics.record_attempt();
        let bytes = self.fetch(path).await?;

        let container = read_container(&bytes)?;
        log::debug!(
            "{path}: {} bytes of JSON, {} chunks",
            container.content.len(),
            container.chunks.len()
        );
        let scene = self
            .parser
            .parse_scene_graph(&container.content, container.body)?;
        if !scene.has_content() {
            return Err(SceneError::EmptyScene.into());
        }
        Ok(scene)
    }

    async fn fetch(&self, path: &str) -> std::result::Result<Vec<u8>, TransportError> {
        let fetch = self.transport.fetch_bytes(path);
        let Some(after) = self.config.fetch_timeout else {
            return fetch.await;
        };

        match future::select(fetch, self.spawner.sleep(after)).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(TransportError::Timeout {
                path: path.to_string(),
                after,
            }),
        }
    }

    fn apply_fit(&self, result: &LoadResult) {
        if let Some(fit) = &self.config.fit {
            fit_to_view(&mut result.scene_root.write(), fit);
        }
    }
}

impl<T, S> ModelPipeline<T, S>
where
    T: Transport + 'static,
    S: AsyncSpawner + 'static,
{
    /// Spawn one background load per slot and return the slot handles
    ///
    /// Every slot starts `Pending`; its index is sent on the completion
    /// channel once its result is published.
    pub fn spawn_model_set(self: &Arc<Self>, count: usize, scheme: &NamingScheme) -> ModelSet {
        let (tx, rx) = futures::channel::mpsc::unbounded();
        let slots: Vec<SlotHandle> = (0..count).map(SlotHandle::new).collect();

        for slot in &slots {
            let pipeline = Arc::clone(self);
            let slot = slot.clone();
            let paths = scheme.candidates(slot.index());
            let tx = tx.clone();

            self.spawner.spawn(async move {
                slot.mark_loading();
                let result = pipeline.load_candidates(slot.index(), &paths).await;
                slot.publish(result);
                // receiver may already be gone
                let _ = tx.unbounded_send(slot.index());
            });
        }

        ModelSet {
            slots,
            completions: rx,
        }
    }
}
