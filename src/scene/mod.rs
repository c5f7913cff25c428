//! Scene graph value types
//!
//! Loaded and synthesized models are trees of [`SceneNode`]s. Node kinds are
//! a closed set ([`NodeKind`]) so traversals match exhaustively instead of
//! probing for mesh-like fields.

pub mod fit;
pub mod mesh;
pub mod primitives;
pub mod stage;

pub use fit::{fit_to_view, FitOptions, FitPolicy};
pub use mesh::{Mesh, PrimitiveType, Vertex};
pub use primitives::{MeshFactory, PrimitiveShape, ProceduralMeshFactory};
pub use stage::Stage;

use glam::{Mat4, Quat, Vec3};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;
use uuid::Uuid;

/// Spatial transform (translation, rotation, scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: [f32; 3],
    pub rotation: [f32; 4], // quaternion (x, y, z, w)
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0], // identity quaternion
            scale: [1.0; 3],
        }
    }
}

impl Transform {
    /// Pure translation
    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Local-to-parent matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::from(self.scale),
            Quat::from_array(self.rotation),
            Vec3::from(self.translation),
        )
    }
}

/// 24-bit RGB color written as a hex literal, e.g. `Color(0xffd700)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Self = Self(0xffffff);
    pub const BLACK: Self = Self(0x000000);

    /// Linear components in `0.0..=1.0`
    pub fn rgb(&self) -> [f32; 3] {
        let c = self.0;
        [
            ((c >> 16) & 0xff) as f32 / 255.0,
            ((c >> 8) & 0xff) as f32 / 255.0,
            (c & 0xff) as f32 / 255.0,
        ]
    }

    /// RGBA with the given alpha
    pub fn with_alpha(&self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.rgb();
        [r, g, b, alpha]
    }
}

/// Surface description handed to the rendering engine
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    /// Base color (RGBA)
    pub base_color: [f32; 4],
    /// Specular exponent for Phong-style shading
    pub shininess: f32,
    /// Whether alpha blending is required
    pub transparent: bool,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            base_color: [1.0, 1.0, 1.0, 1.0],
            shininess: 30.0,
            transparent: false,
            double_sided: false,
        }
    }
}

impl Material {
    /// Opaque shaded material
    pub fn phong(color: Color, shininess: f32) -> Self {
        Self {
            base_color: color.with_alpha(1.0),
            shininess,
            ..Default::default()
        }
    }

    /// Material with an explicit opacity; values below 1 enable blending
    pub fn translucent(color: Color, opacity: f32) -> Self {
        Self {
            base_color: color.with_alpha(opacity),
            transparent: opacity < 1.0,
            ..Default::default()
        }
    }

    pub fn opacity(&self) -> f32 {
        self.base_color[3]
    }
}

/// Renderable triangle geometry
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub mesh: Mesh,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshNode {
    pub fn new(mesh: Mesh, material: Material) -> Self {
        Self {
            mesh,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

/// Unconnected line segments, two consecutive positions per segment
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegments {
    pub positions: Vec<[f32; 3]>,
    pub material: Material,
}

impl LineSegments {
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }
}

/// What a node carries besides its transform and children
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure transform node
    Group,
    Mesh(MeshNode),
    Lines(LineSegments),
}

/// A node in the scene hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: Option<String>,
    /// Local transform relative to the parent
    pub transform: Transform,
    pub visible: bool,
    pub kind: NodeKind,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn with_kind(name: Option<String>, kind: NodeKind) -> Self {
        Self {
            name,
            transform: Transform::default(),
            visible: true,
            kind,
            children: Vec::new(),
        }
    }

    /// Empty group node
    pub fn group(name: Option<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    /// Mesh node with no children
    pub fn mesh(name: Option<String>, mesh: MeshNode) -> Self {
        Self::with_kind(name, NodeKind::Mesh(mesh))
    }

    /// Line-segment node with no children
    pub fn lines(name: Option<String>, lines: LineSegments) -> Self {
        Self::with_kind(name, NodeKind::Lines(lines))
    }

    /// Builder-style child attachment
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style transform replacement
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Whether this node has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Number of mesh nodes in this subtree
    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node, _| {
            if matches!(node.kind, NodeKind::Mesh(_)) {
                count += 1;
            }
        });
        count
    }

    /// Depth-first visit with each node's world matrix (self is the root)
    pub fn traverse<F>(&self, visit: &mut F)
    where
        F: FnMut(&SceneNode, &Mat4),
    {
        self.traverse_from(Mat4::IDENTITY, visit);
    }

    fn traverse_from<F>(&self, parent: Mat4, visit: &mut F)
    where
        F: FnMut(&SceneNode, &Mat4),
    {
        let world = parent * self.transform.matrix();
        visit(self, &world);
        for child in &self.children {
            child.traverse_from(world, visit);
        }
    }

    /// Depth-first mutable visit
    pub fn traverse_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&mut SceneNode),
    {
        visit(self);
        for child in &mut self.children {
            child.traverse_mut(visit);
        }
    }

    /// Axis-aligned bounds of all geometry in this subtree, in the
    /// coordinate space of this node's parent
    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut bounds: Option<Aabb> = None;
        let mut extend = |p: Vec3| match bounds.as_mut() {
            Some(b) => b.extend(p),
            None => bounds = Some(Aabb::from_point(p)),
        };

        self.traverse(&mut |node, world| match &node.kind {
            NodeKind::Group => {}
            NodeKind::Mesh(m) => {
                for p in m.mesh.positions() {
                    extend(world.transform_point3(p));
                }
            }
            NodeKind::Lines(l) => {
                for p in &l.positions {
                    extend(world.transform_point3(Vec3::from(*p)));
                }
            }
        });

        bounds
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Zero-size box at a point
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Grow to contain `p`
    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Largest of the three extents
    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }

    /// Whether any axis has (near) zero extent
    pub fn is_degenerate(&self) -> bool {
        self.size().min_element() <= f32::EPSILON
    }
}

/// Shared handle to a scene-graph root
///
/// Cloning the handle shares the node; every handle created with
/// [`SceneHandle::new`] gets a fresh identity.
#[derive(Debug, Clone)]
pub struct SceneHandle {
    id: Uuid,
    node: Arc<RwLock<SceneNode>>,
}

impl SceneHandle {
    /// Wrap a node in a new handle
    pub fn new(node: SceneNode) -> Self {
        Self {
            id: Uuid::new_v4(),
            node: Arc::new(RwLock::new(node)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn read(&self) -> RwLockReadGuard<'_, SceneNode> {
        self.node.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, SceneNode> {
        self.node.write()
    }

    /// Whether both handles point at the same node
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}
