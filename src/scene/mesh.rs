//! Mesh geometry
//!
//! Vertex layout and indexed geometry shared by parsed and procedural meshes.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A vertex with position, normal, UV and color data
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// 3D position
    pub position: [f32; 3],
    /// Normal vector
    pub normal: [f32; 3],
    /// Texture coordinates
    pub uv: [f32; 2],
    /// Vertex color (RGBA)
    pub color: [f32; 4],
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0], // Default up (Z+)
            uv: [0.0, 0.0],
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Size of a vertex in bytes
    pub const fn size() -> usize {
        std::mem::size_of::<Self>()
    }
}

/// Type of primitive to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Indexed geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Optional name of the mesh
    pub name: Option<String>,
    pub primitive_type: PrimitiveType,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a triangle-list mesh
    pub fn new(name: Option<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name,
            primitive_type: PrimitiveType::Triangles,
            vertices,
            indices,
        }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of whole triangles in a triangle-list mesh
    pub fn triangle_count(&self) -> usize {
        match self.primitive_type {
            PrimitiveType::Triangles => self.indices.len() / 3,
            _ => 0,
        }
    }

    /// Vertex buffer as raw bytes
    pub fn vertex_buffer(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes
    pub fn index_buffer(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Iterate over vertex positions
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| Vec3::from(v.position))
    }

    /// Iterate over the triangles of a triangle-list mesh as index triples,
    /// skipping any triple that references a missing vertex
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let vertex_count = self.vertices.len();
        let triangles: &[u32] = if self.primitive_type == PrimitiveType::Triangles {
            self.indices.as_slice()
        } else {
            &[]
        };
        triangles
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .filter(move |t| t.iter().all(|&i| (i as usize) < vertex_count))
    }

    /// Replace vertex normals with smooth normals averaged from face normals
    pub fn compute_smooth_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];

        for [i0, i1, i2] in self.triangles() {
            let v0 = Vec3::from(self.vertices[i0 as usize].position);
            let v1 = Vec3::from(self.vertices[i1 as usize].position);
            let v2 = Vec3::from(self.vertices[i2 as usize].position);

            let normal = (v1 - v0).cross(v2 - v0);

            // Only add if not degenerate
            if normal.length_squared() > 1e-6 {
                let normal = normal.normalize();
                for i in [i0, i1, i2] {
                    normals[i as usize] += normal;
                }
            }
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(normals) {
            vertex.normal = if normal.length_squared() > 1e-6 {
                normal.normalize().to_array()
            } else {
                // Isolated vertices or degenerate geometry
                [0.0, 0.0, 1.0]
            };
        }
    }
}
