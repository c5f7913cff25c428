//! Primitive mesh construction
//!
//! [`MeshFactory`] is the rendering-engine capability used to build
//! placeholder geometry. [`ProceduralMeshFactory`] generates the geometry on
//! the CPU with Y-up, origin-centred conventions.

use super::mesh::{Mesh, Vertex};
use super::{LineSegments, Material, MeshNode, SceneNode};
use glam::Vec3;
use std::collections::HashMap;
use std::f32::consts::PI;

/// Default crease angle for edge overlays, in degrees
pub const EDGE_THRESHOLD_DEGREES: f32 = 1.0;

/// Shape of a procedural primitive; every shape is centred on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveShape {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    /// Y-aligned cylinder; equal radii and a small height make a disc
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

impl PrimitiveShape {
    /// Whether every dimension is finite and positive and segment counts
    /// are large enough to enclose a volume
    pub fn is_valid(&self) -> bool {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        match *self {
            Self::Box {
                width,
                height,
                depth,
            } => positive(width) && positive(height) && positive(depth),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => {
                positive(radius_top) && positive(radius_bottom) && positive(height) && segments >= 3
            }
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => positive(radius) && width_segments >= 3 && height_segments >= 2,
        }
    }
}

/// Rendering-engine capability for building primitive geometry
pub trait MeshFactory: Send + Sync {
    /// Build a mesh node for `shape` with the given material
    fn create_primitive_mesh(&self, shape: &PrimitiveShape, material: &Material) -> SceneNode;

    /// Build a line-segment node outlining the creases of `shape`
    fn create_edges(&self, shape: &PrimitiveShape, material: &Material) -> SceneNode;

    /// Get the name of this factory (for debugging)
    fn factory_name(&self) -> &'static str;
}

/// CPU-side geometry generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralMeshFactory;

impl ProceduralMeshFactory {
    pub fn new() -> Self {
        Self
    }
}

impl MeshFactory for ProceduralMeshFactory {
    fn create_primitive_mesh(&self, shape: &PrimitiveShape, material: &Material) -> SceneNode {
        let mesh = build_geometry(shape);
        SceneNode::mesh(mesh.name.clone(), MeshNode::new(mesh, material.clone()))
    }

    fn create_edges(&self, shape: &PrimitiveShape, material: &Material) -> SceneNode {
        let mesh = build_geometry(shape);
        SceneNode::lines(
            Some("edges".to_string()),
            LineSegments {
                positions: edge_segments(&mesh, EDGE_THRESHOLD_DEGREES),
                material: material.clone(),
            },
        )
    }

    fn factory_name(&self) -> &'static str {
        "Procedural"
    }
}

/// Generate indexed triangle geometry for a shape
pub fn build_geometry(shape: &PrimitiveShape) -> Mesh {
    match *shape {
        PrimitiveShape::Box {
            width,
            height,
            depth,
        } => box_geometry(Vec3::new(width, height, depth)),
        PrimitiveShape::Cylinder {
            radius_top,
            radius_bottom,
            height,
            segments,
        } => cylinder_geometry(radius_top, radius_bottom, height, segments.max(3)),
        PrimitiveShape::Sphere {
            radius,
            width_segments,
            height_segments,
        } => sphere_geometry(radius, width_segments.max(3), height_segments.max(2)),
    }
}

fn box_geometry(size: Vec3) -> Mesh {
    // (normal, u, v) with u x v == normal so quads wind counter-clockwise
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    const CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in FACES {
        let (n, u_axis, v_axis) = (Vec3::from(normal), Vec3::from(u), Vec3::from(v));
        let base = vertices.len() as u32;
        for [a, b] in CORNERS {
            let unit = n * 0.5 + u_axis * (a - 0.5) + v_axis * (b - 0.5);
            vertices.push(Vertex::new((unit * size).to_array(), normal, [a, b]));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    Mesh::new(Some("box".to_string()), vertices, indices)
}

fn cylinder_geometry(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Mesh {
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;
    let ring = segments as usize + 1;

    let mut vertices = Vec::with_capacity(ring * 4 + 2);
    let mut indices = Vec::with_capacity(segments as usize * 12);

    // Side: top row then bottom row, seam duplicated
    for (row, (y, radius)) in [(half, radius_top), (-half, radius_bottom)]
        .into_iter()
        .enumerate()
    {
        for i in 0..ring {
            let u = i as f32 / segments as f32;
            let (sin, cos) = (u * 2.0 * PI).sin_cos();
            let normal = Vec3::new(sin, slope, cos).normalize();
            vertices.push(Vertex::new(
                [radius * sin, y, radius * cos],
                normal.to_array(),
                [u, 1.0 - row as f32],
            ));
        }
    }
    for i in 0..segments {
        let a = i;
        let b = i + ring as u32;
        let c = i + 1 + ring as u32;
        let d = i + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    // Caps
    for (y, radius, up) in [(half, radius_top, true), (-half, radius_bottom, false)] {
        let normal = if up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
        let center = vertices.len() as u32;
        vertices.push(Vertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
        for i in 0..ring {
            let (sin, cos) = (i as f32 / segments as f32 * 2.0 * PI).sin_cos();
            vertices.push(Vertex::new(
                [radius * sin, y, radius * cos],
                normal,
                [sin * 0.5 + 0.5, cos * 0.5 + 0.5],
            ));
        }
        for i in 0..segments {
            let (p, q) = (center + 1 + i, center + 2 + i);
            if up {
                indices.extend_from_slice(&[center, p, q]);
            } else {
                indices.extend_from_slice(&[center, q, p]);
            }
        }
    }

    Mesh::new(Some("cylinder".to_string()), vertices, indices)
}

fn sphere_geometry(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let row = width_segments + 1;
    let mut vertices = Vec::with_capacity((row * (height_segments + 1)) as usize);
    let mut indices = Vec::new();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let (phi_sin, phi_cos) = (v * PI).sin_cos();
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let (theta_sin, theta_cos) = (u * 2.0 * PI).sin_cos();
            let normal = Vec3::new(-theta_cos * phi_sin, phi_cos, theta_sin * phi_sin);
            vertices.push(Vertex::new(
                (normal * radius).to_array(),
                normal.to_array(),
                [u, 1.0 - v],
            ));
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh::new(Some("sphere".to_string()), vertices, indices)
}

type EdgeKey = ([i64; 3], [i64; 3]);

struct EdgeRecord {
    a: Vec3,
    b: Vec3,
    normal: Vec3,
    shared: bool,
    keep: bool,
}

fn quantize(p: Vec3) -> [i64; 3] {
    let q = (p * 1e4).round();
    [q.x as i64, q.y as i64, q.z as i64]
}

/// Line-segment endpoints for every crease of a triangle mesh
///
/// An edge is kept when it borders a single triangle, or when the normals of
/// its two triangles differ by more than `threshold_degrees`. Vertices are
/// merged by position so duplicated seam vertices do not create false edges.
pub fn edge_segments(mesh: &Mesh, threshold_degrees: f32) -> Vec<[f32; 3]> {
    let cos_threshold = threshold_degrees.to_radians().cos();
    let mut lookup: HashMap<EdgeKey, usize> = HashMap::new();
    let mut records: Vec<EdgeRecord> = Vec::new();

    for tri in mesh.triangles() {
        let v = tri.map(|i| Vec3::from(mesh.vertices[i as usize].position));
        let normal = (v[1] - v[0]).cross(v[2] - v[0]);
        if normal.length_squared() <= 1e-12 {
            continue;
        }
        let normal = normal.normalize();

        for (p, q) in [(0, 1), (1, 2), (2, 0)] {
            let (ka, kb) = (quantize(v[p]), quantize(v[q]));
            if ka == kb {
                continue;
            }
            let key = if ka < kb { (ka, kb) } else { (kb, ka) };
            match lookup.get(&key) {
                Some(&i) => {
                    let record = &mut records[i];
                    if !record.shared {
                        record.shared = true;
                        record.keep = record.normal.dot(normal) <= cos_threshold;
                    }
                }
                None => {
                    lookup.insert(key, records.len());
                    records.push(EdgeRecord {
                        a: v[p],
                        b: v[q],
                        normal,
                        shared: false,
                        keep: true,
                    });
                }
            }
        }
    }

    records
        .into_iter()
        .filter(|r| r.keep)
        .flat_map(|r| [r.a.to_array(), r.b.to_array()])
        .collect()
}
