//! Procedural placeholder synthesis
//!
//! When every candidate path of a load fails, the pipeline substitutes a
//! model built here from a [`PlaceholderSpec`]. Synthesis performs no I/O and
//! cannot fail: specs are validated when they are built, so a bad spec is
//! reported to the programmer up front instead of at substitution time.
//!
//! The presets mirror the four viewer styles the pipeline serves: a gold
//! [`coin`](PlaceholderSpec::coin), the generic
//! [`showcase_cube`](PlaceholderSpec::showcase_cube), the
//! [`voxel_block`](PlaceholderSpec::voxel_block) and the
//! [`database`](PlaceholderSpec::database) cylinder.

use crate::pipeline::{AssetInfo, LoadResult};
use crate::scene::{
    Color, Material, MeshFactory, PrimitiveShape, SceneHandle, SceneNode, Transform,
};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Generator tag carried by every synthesized [`LoadResult`]
pub const PLACEHOLDER_GENERATOR: &str = "showcase_assets placeholder";

const SCATTER_SEED: u64 = 0x5eed_cafe;

/// Error type for placeholder specs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FallbackError {
    #[error("Invalid placeholder spec: {0}")]
    InvalidSpec(String),
}

/// Geometry of the placeholder body, centred on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaceholderKind {
    /// Flat Y-aligned cylinder, like a coin lying on its side
    Disc {
        radius: f32,
        thickness: f32,
        segments: u32,
    },
    Cube {
        size: f32,
    },
    Sphere {
        radius: f32,
    },
    Cylinder {
        radius: f32,
        height: f32,
        segments: u32,
    },
}

impl PlaceholderKind {
    /// Primitive used to build the body
    pub fn shape(&self) -> PrimitiveShape {
        match *self {
            Self::Disc {
                radius,
                thickness,
                segments,
            } => PrimitiveShape::Cylinder {
                radius_top: radius,
                radius_bottom: radius,
                height: thickness,
                segments,
            },
            Self::Cube { size } => PrimitiveShape::Box {
                width: size,
                height: size,
                depth: size,
            },
            Self::Sphere { radius } => PrimitiveShape::Sphere {
                radius,
                width_segments: 32,
                height_segments: 16,
            },
            Self::Cylinder {
                radius,
                height,
                segments,
            } => PrimitiveShape::Cylinder {
                radius_top: radius,
                radius_bottom: radius,
                height,
                segments,
            },
        }
    }
}

/// Extra geometry layered on top of the body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoration {
    /// Crease outline of the body
    Edges { color: Color, opacity: f32 },
    /// Small cubes at pseudo-random offsets derived from the slot index
    ScatteredCubes {
        count: u32,
        size: f32,
        spread: f32,
        color: Color,
        opacity: f32,
    },
    /// Thin rings stacked along the Y axis, centred on the origin
    Bands {
        count: u32,
        radius: f32,
        height: f32,
        spacing: f32,
        segments: u32,
        color: Color,
        opacity: f32,
    },
}

impl Decoration {
    fn validate(&self) -> Result<(), FallbackError> {
        let opacity_ok = |o: f32| (0.0..=1.0).contains(&o);
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let ok = match *self {
            Self::Edges { opacity, .. } => opacity_ok(opacity),
            Self::ScatteredCubes {
                count,
                size,
                spread,
                opacity,
                ..
            } => count > 0 && positive(size) && spread.is_finite() && spread >= 0.0 && opacity_ok(opacity),
            Self::Bands {
                count,
                radius,
                height,
                spacing,
                segments,
                opacity,
                ..
            } => {
                count > 0
                    && positive(radius)
                    && positive(height)
                    && spacing.is_finite()
                    && segments >= 3
                    && opacity_ok(opacity)
            }
        };
        if ok {
            Ok(())
        } else {
            Err(FallbackError::InvalidSpec(format!("bad decoration {self:?}")))
        }
    }
}

/// Validated description of a placeholder model
///
/// Build one with [`PlaceholderSpec::builder`] or use a preset.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderSpec {
    kind: PlaceholderKind,
    palette: Vec<Color>,
    shininess: f32,
    decorations: Vec<Decoration>,
}

impl PlaceholderSpec {
    /// Start building a spec for `kind`
    pub fn builder(kind: PlaceholderKind) -> PlaceholderSpecBuilder {
        PlaceholderSpecBuilder {
            kind,
            palette: Vec::new(),
            shininess: 30.0,
            decorations: Vec::new(),
        }
    }

    /// Gold disc used by the scroll-animated coin
    pub fn coin() -> Self {
        Self {
            kind: PlaceholderKind::Disc {
                radius: 1.0,
                thickness: 0.15,
                segments: 32,
            },
            palette: vec![Color(0xffd700)],
            shininess: 100.0,
            decorations: Vec::new(),
        }
    }

    /// Coloured 2x2x2 cube with a faint white outline
    pub fn showcase_cube() -> Self {
        Self {
            kind: PlaceholderKind::Cube { size: 2.0 },
            palette: SHOWCASE_PALETTE.to_vec(),
            shininess: 100.0,
            decorations: vec![Decoration::Edges {
                color: Color::WHITE,
                opacity: 0.3,
            }],
        }
    }

    /// Blocky cube with three translucent detail cubes and black outline
    pub fn voxel_block() -> Self {
        Self {
            kind: PlaceholderKind::Cube { size: 2.0 },
            palette: VOXEL_PALETTE.to_vec(),
            shininess: 30.0,
            decorations: vec![
                Decoration::ScatteredCubes {
                    count: 3,
                    size: 0.4,
                    spread: 1.5,
                    color: Color::WHITE,
                    opacity: 0.8,
                },
                Decoration::Edges {
                    color: Color::BLACK,
                    opacity: 1.0,
                },
            ],
        }
    }

    /// Database-drum cylinder with three white bands
    pub fn database() -> Self {
        Self {
            kind: PlaceholderKind::Cylinder {
                radius: 1.2,
                height: 2.0,
                segments: 16,
            },
            palette: SHOWCASE_PALETTE.to_vec(),
            shininess: 100.0,
            decorations: vec![
                Decoration::Bands {
                    count: 3,
                    radius: 1.3,
                    height: 0.1,
                    spacing: 0.6,
                    segments: 16,
                    color: Color::WHITE,
                    opacity: 0.8,
                },
                Decoration::Edges {
                    color: Color::WHITE,
                    opacity: 0.3,
                },
            ],
        }
    }

    pub fn kind(&self) -> PlaceholderKind {
        self.kind
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Body color for slot `index`, cycling through the palette
    pub fn color_for(&self, index: usize) -> Color {
        // palette is never empty once built
        self.palette[index % self.palette.len()]
    }
}

const SHOWCASE_PALETTE: [Color; 5] = [
    Color(0x3b82f6),
    Color(0x10b981),
    Color(0x8b5cf6),
    Color(0xf59e0b),
    Color(0x6366f1),
];

const VOXEL_PALETTE: [Color; 10] = [
    Color(0x8b4513),
    Color(0x228b22),
    Color(0x4169e1),
    Color(0xff6347),
    Color(0x9932cc),
    Color(0xff8c00),
    Color(0x20b2aa),
    Color(0xdc143c),
    Color(0x32cd32),
    Color(0x1e90ff),
];

/// Builder for [`PlaceholderSpec`]
#[derive(Debug, Clone)]
pub struct PlaceholderSpecBuilder {
    kind: PlaceholderKind,
    palette: Vec<Color>,
    shininess: f32,
    decorations: Vec<Decoration>,
}

impl PlaceholderSpecBuilder {
    /// Append one palette color
    pub fn color(mut self, color: Color) -> Self {
        self.palette.push(color);
        self
    }

    /// Replace the palette
    pub fn palette(mut self, palette: impl IntoIterator<Item = Color>) -> Self {
        self.palette = palette.into_iter().collect();
        self
    }

    pub fn shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn decoration(mut self, decoration: Decoration) -> Self {
        self.decorations.push(decoration);
        self
    }

    /// Validate and finish
    pub fn build(self) -> Result<PlaceholderSpec, FallbackError> {
        if self.palette.is_empty() {
            return Err(FallbackError::InvalidSpec("palette is empty".to_string()));
        }
        if !self.kind.shape().is_valid() {
            return Err(FallbackError::InvalidSpec(format!(
                "degenerate body {:?}",
                self.kind
            )));
        }
        if !self.shininess.is_finite() || self.shininess < 0.0 {
            return Err(FallbackError::InvalidSpec(format!(
                "shininess {} out of range",
                self.shininess
            )));
        }
        for decoration in &self.decorations {
            decoration.validate()?;
        }

        Ok(PlaceholderSpec {
            kind: self.kind,
            palette: self.palette,
            shininess: self.shininess,
            decorations: self.decorations,
        })
    }
}

/// Offset of detail cube `cube` for slot `index`, each axis within
/// `-spread..=spread`
fn scatter_offset(index: usize, cube: u32, spread: f32) -> [f32; 3] {
    let mut key = [0u8; 12];
    key[..8].copy_from_slice(&(index as u64).to_le_bytes());
    key[8..].copy_from_slice(&cube.to_le_bytes());
    let hash = xxh3_64_with_seed(&key, SCATTER_SEED);

    const MASK: u64 = 0x1f_ffff;
    let axis = |k: u32| {
        let unit = ((hash >> (k * 21)) & MASK) as f32 / MASK as f32;
        (unit * 2.0 - 1.0) * spread
    };
    [axis(0), axis(1), axis(2)]
}

/// Build the placeholder scene graph for slot `index`
pub fn synthesize_scene(
    spec: &PlaceholderSpec,
    index: usize,
    factory: &dyn MeshFactory,
) -> SceneNode {
    let body_shape = spec.kind.shape();
    let material = Material::phong(spec.color_for(index), spec.shininess);
    let mut root = SceneNode::group(Some("placeholder".to_string()))
        .with_child(factory.create_primitive_mesh(&body_shape, &material));

    for decoration in &spec.decorations {
        match *decoration {
            Decoration::Edges { color, opacity } => {
                let material = Material::translucent(color, opacity);
                root.children
                    .push(factory.create_edges(&body_shape, &material));
            }
            Decoration::ScatteredCubes {
                count,
                size,
                spread,
                color,
                opacity,
            } => {
                let shape = PrimitiveShape::Box {
                    width: size,
                    height: size,
                    depth: size,
                };
                let material = Material::translucent(color, opacity);
                for cube in 0..count {
                    let offset = scatter_offset(index, cube, spread);
                    root.children.push(
                        factory
                            .create_primitive_mesh(&shape, &material)
                            .with_transform(Transform::from_translation(offset)),
                    );
                }
            }
            Decoration::Bands {
                count,
                radius,
                height,
                spacing,
                segments,
                color,
                opacity,
            } => {
                let shape = PrimitiveShape::Cylinder {
                    radius_top: radius,
                    radius_bottom: radius,
                    height,
                    segments,
                };
                let material = Material::translucent(color, opacity);
                let first = -(count as f32 - 1.0) * spacing * 0.5;
                for band in 0..count {
                    let y = first + band as f32 * spacing;
                    root.children.push(
                        factory
                            .create_primitive_mesh(&shape, &material)
                            .with_transform(Transform::from_translation([0.0, y, 0.0])),
                    );
                }
            }
        }
    }

    root
}

/// Synthesize a complete placeholder [`LoadResult`] for slot `index`
pub fn synthesize(spec: &PlaceholderSpec, index: usize, factory: &dyn MeshFactory) -> LoadResult {
    let root = synthesize_scene(spec, index, factory);
    LoadResult::placeholder(
        SceneHandle::new(root),
        AssetInfo {
            generator: PLACEHOLDER_GENERATOR.to_string(),
            version: None,
        },
    )
}
