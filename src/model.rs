//! glTF JSON to scene-graph conversion
//!
//! The pipeline hands the chunks extracted by [`crate::loader::read_container`]
//! to a [`SceneParser`]. [`GltfSceneParser`] is the stock implementation on top
//! of the `gltf` crate; callers with their own engine can plug in another.

use crate::scene::{
    LineSegments, Material, Mesh, MeshNode, PrimitiveType, SceneNode, Transform, Vertex,
};
use gltf::Gltf;
use thiserror::Error;

/// Nesting limit for node hierarchies; deeper trees are rejected
pub const MAX_NODE_DEPTH: usize = 64;

/// Error type for scene conversion
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GLTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("Unsupported asset: {0}")]
    UnsupportedAsset(String),

    #[error("Scene has no renderable content")]
    EmptyScene,

    #[error("Node hierarchy deeper than {0} levels")]
    TooDeep(usize),

    #[error("Failed to load scene: {0}")]
    LoadError(String),
}

/// Animation clip summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationClip {
    pub name: Option<String>,
    pub channel_count: usize,
}

/// Output of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedScene {
    /// The default scene (or the first one if none is marked default)
    pub root: SceneNode,
    /// Every other scene in document order
    pub other_scenes: Vec<SceneNode>,
    pub animations: Vec<AnimationClip>,
    pub generator: Option<String>,
    pub version: Option<String>,
}

impl ParsedScene {
    /// Whether the root has at least one child and some geometry below it
    pub fn has_content(&self) -> bool {
        !self.root.is_empty() && self.root.bounding_box().is_some()
    }
}

/// Converts a glTF JSON document (plus its binary chunk) into a scene graph
pub trait SceneParser: Send + Sync {
    fn parse_scene_graph(&self, json: &str, blob: Option<&[u8]>)
        -> Result<ParsedScene, SceneError>;

    /// Get the name of this parser (for debugging)
    fn parser_name(&self) -> &'static str;
}

/// Returns the asset version string, rejecting documents without an asset
/// block or with a major version below 2
pub fn check_asset_version(json: &str) -> Result<String, SceneError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let asset = value
        .get("asset")
        .ok_or_else(|| SceneError::UnsupportedAsset("missing asset block".to_string()))?;
    let version = asset
        .get("version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| SceneError::UnsupportedAsset("missing asset version".to_string()))?;

    let major = version
        .split('.')
        .next()
        .and_then(|m| m.parse::<u32>().ok())
        .ok_or_else(|| SceneError::UnsupportedAsset(format!("bad version {version:?}")))?;
    if major < 2 {
        return Err(SceneError::UnsupportedAsset(format!(
            "version {version} is older than 2.0"
        )));
    }
    Ok(version.to_string())
}

/// Scene parser backed by the `gltf` crate
///
/// Geometry is read from the GLB binary chunk only; buffers referencing
/// external or data URIs resolve to nothing and their primitives are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfSceneParser;

impl GltfSceneParser {
    pub fn new() -> Self {
        Self
    }
}

impl SceneParser for GltfSceneParser {
    fn parse_scene_graph(
        &self,
        json: &str,
        blob: Option<&[u8]>,
    ) -> Result<ParsedScene, SceneError> {
        let version = check_asset_version(json)?;
        let gltf = Gltf::from_slice(json.as_bytes())?;

        log::debug!(
            "Parsed glTF {version} with {} nodes and {} meshes",
            gltf.nodes().len(),
            gltf.meshes().len()
        );

        let default_index = gltf
            .default_scene()
            .or_else(|| gltf.scenes().next())
            .map(|scene| scene.index());

        let mut root = None;
        let mut other_scenes = Vec::new();
        for scene in gltf.scenes() {
            let mut node = SceneNode::group(scene.name().map(str::to_string));
            for child in scene.nodes() {
                node.children.push(convert_node(&child, blob, 1)?);
            }
            if Some(scene.index()) == default_index {
                root = Some(node);
            } else {
                other_scenes.push(node);
            }
        }

        let animations = gltf
            .animations()
            .map(|animation| AnimationClip {
                name: animation.name().map(str::to_string),
                channel_count: animation.channels().count(),
            })
            .collect();

        Ok(ParsedScene {
            root: root.unwrap_or_else(|| SceneNode::group(None)),
            other_scenes,
            animations,
            generator: gltf.document.as_json().asset.generator.clone(),
            version: Some(version),
        })
    }

    fn parser_name(&self) -> &'static str {
        "gltf"
    }
}

fn convert_node(
    node: &gltf::Node<'_>,
    blob: Option<&[u8]>,
    depth: usize,
) -> Result<SceneNode, SceneError> {
    if depth > MAX_NODE_DEPTH {
        return Err(SceneError::TooDeep(MAX_NODE_DEPTH));
    }

    let (translation, rotation, scale) = node.transform().decomposed();
    let mut out = SceneNode::group(node.name().map(str::to_string)).with_transform(Transform {
        translation,
        rotation,
        scale,
    });

    if let Some(mesh) = node.mesh() {
        let name = mesh.name().map(str::to_string);
        for (prim_idx, primitive) in mesh.primitives().enumerate() {
            match convert_primitive(&primitive, name.clone(), blob)? {
                Some(child) => out.children.push(child),
                None => log::debug!(
                    "Skipping primitive {prim_idx} of mesh {}",
                    mesh.name().unwrap_or("unnamed")
                ),
            }
        }
    }

    for child in node.children() {
        out.children.push(convert_node(&child, blob, depth + 1)?);
    }
    Ok(out)
}

fn convert_material(material: &gltf::Material<'_>) -> Material {
    let base_color = material.pbr_metallic_roughness().base_color_factor();
    Material {
        name: material.name().map(str::to_string),
        base_color,
        transparent: material.alpha_mode() == gltf::material::AlphaMode::Blend,
        double_sided: material.double_sided(),
        ..Default::default()
    }
}

fn convert_primitive(
    primitive: &gltf::Primitive<'_>,
    name: Option<String>,
    blob: Option<&[u8]>,
) -> Result<Option<SceneNode>, SceneError> {
    let reader = primitive.reader(|buffer| match buffer.source() {
        gltf::buffer::Source::Bin => blob,
        gltf::buffer::Source::Uri(_) => None,
    });

    let Some(positions) = reader.read_positions() else {
        return Ok(None);
    };
    let positions: Vec<[f32; 3]> = positions.collect();
    let material = convert_material(&primitive.material());

    let mode = match primitive.mode() {
        gltf::mesh::Mode::Triangles => PrimitiveType::Triangles,
        gltf::mesh::Mode::TriangleStrip => PrimitiveType::TriangleStrip,
        gltf::mesh::Mode::TriangleFan => PrimitiveType::TriangleFan,
        gltf::mesh::Mode::Lines => PrimitiveType::Lines,
        gltf::mesh::Mode::LineStrip | gltf::mesh::Mode::LineLoop => PrimitiveType::LineStrip,
        gltf::mesh::Mode::Points => {
            log::warn!("Point primitives are not supported, skipping");
            return Ok(None);
        }
    };

    let indices: Vec<u32> = match reader.read_indices() {
        Some(iter) => iter.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
        return Err(SceneError::LoadError(format!(
            "index {bad} out of range for {} vertices",
            positions.len()
        )));
    }

    if matches!(mode, PrimitiveType::Lines | PrimitiveType::LineStrip) {
        let closed = primitive.mode() == gltf::mesh::Mode::LineLoop;
        let pairs = line_pairs(&indices, mode, closed);
        let positions = pairs.iter().map(|&i| positions[i as usize]).collect();
        return Ok(Some(SceneNode::lines(
            name,
            LineSegments {
                positions,
                material,
            },
        )));
    }

    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());
    let tex_coords: Option<Vec<[f32; 2]>> =
        reader.read_tex_coords(0).map(|iter| iter.into_f32().collect());
    let colors: Option<Vec<[f32; 4]>> =
        reader.read_colors(0).map(|iter| iter.into_rgba_f32().collect());

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, &position)| Vertex {
            position,
            normal: normals
                .as_ref()
                .and_then(|n| n.get(i).copied())
                .unwrap_or([0.0, 0.0, 0.0]),
            uv: tex_coords
                .as_ref()
                .and_then(|t| t.get(i).copied())
                .unwrap_or([0.0, 0.0]),
            color: colors
                .as_ref()
                .and_then(|c| c.get(i).copied())
                .unwrap_or([1.0, 1.0, 1.0, 1.0]),
        })
        .collect();

    let mut mesh = Mesh::new(name.clone(), vertices, triangle_list(&indices, mode));
    if normals.is_none() {
        log::debug!("Generating smooth normals for {}", name.as_deref().unwrap_or("unnamed"));
        mesh.compute_smooth_normals();
    }

    Ok(Some(SceneNode::mesh(name, MeshNode::new(mesh, material))))
}

/// Expand strip and fan index orders into a plain triangle list
fn triangle_list(indices: &[u32], mode: PrimitiveType) -> Vec<u32> {
    match mode {
        PrimitiveType::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .flat_map(|(i, w)| {
                if i % 2 == 0 {
                    [w[0], w[1], w[2]]
                } else {
                    [w[1], w[0], w[2]]
                }
            })
            .collect(),
        PrimitiveType::TriangleFan => match indices.split_first() {
            Some((&hub, rest)) => rest
                .windows(2)
                .flat_map(|w| [hub, w[0], w[1]])
                .collect(),
            None => Vec::new(),
        },
        _ => indices[..indices.len() - indices.len() % 3].to_vec(),
    }
}

/// Expand line strips (and loops) into independent segment pairs
fn line_pairs(indices: &[u32], mode: PrimitiveType, closed: bool) -> Vec<u32> {
    match mode {
        PrimitiveType::LineStrip => {
            let mut pairs: Vec<u32> = indices.windows(2).flat_map(|w| [w[0], w[1]]).collect();
            if closed && indices.len() > 2 {
                if let (Some(&first), Some(&last)) = (indices.first(), indices.last()) {
                    pairs.extend([last, first]);
                }
            }
            pairs
        }
        _ => indices[..indices.len() - indices.len() % 2].to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeKind;

    /// Tetrahedron with four vertices and twelve u16 indices in one buffer
    fn tetrahedron() -> (String, Vec<u8>) {
        let positions: [[f32; 3]; 4] = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        let indices: [u16; 12] = [0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];
        let mut blob = bytemuck::cast_slice::<_, u8>(&positions).to_vec();
        blob.extend_from_slice(bytemuck::cast_slice(&indices));

        let json = r#"{
            "asset": {"version": "2.0", "generator": "unit-test"},
            "scene": 0,
            "scenes": [{"nodes": [0]}],
            "nodes": [{"name": "tetra", "mesh": 0, "translation": [1, 2, 3]}],
            "meshes": [{"name": "tetra", "primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
            "buffers": [{"byteLength": 72}],
            "bufferViews": [
                {"buffer": 0, "byteOffset": 0, "byteLength": 48},
                {"buffer": 0, "byteOffset": 48, "byteLength": 24}
            ],
            "accessors": [
                {"bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3",
                 "min": [0, 0, 0], "max": [1, 1, 1]},
                {"bufferView": 1, "componentType": 5123, "count": 12, "type": "SCALAR"}
            ]
        }"#;
        (json.to_string(), blob)
    }

    #[test]
    fn test_parse_tetrahedron() {
        let (json, blob) = tetrahedron();
        let parsed = GltfSceneParser::new()
            .parse_scene_graph(&json, Some(&blob))
            .unwrap();

        assert!(parsed.has_content());
        assert_eq!(parsed.generator.as_deref(), Some("unit-test"));
        assert_eq!(parsed.version.as_deref(), Some("2.0"));
        assert_eq!(parsed.root.mesh_count(), 1);

        let node = &parsed.root.children[0];
        assert_eq!(node.name.as_deref(), Some("tetra"));
        assert_eq!(node.transform.translation, [1.0, 2.0, 3.0]);
        let NodeKind::Mesh(mesh) = &node.children[0].kind else {
            panic!("expected a mesh child");
        };
        assert_eq!(mesh.mesh.triangle_count(), 4);
        // normals were generated
        assert!(mesh.mesh.vertices.iter().all(|v| v.normal != [0.0; 3]));
    }

    #[test]
    fn test_animation_inventory() {
        let (_, mut blob) = tetrahedron();
        blob.extend_from_slice(bytemuck::cast_slice(&[0.0f32, 1.0, 2.0, 3.0]));

        let json = r#"{
            "asset": {"version": "2.0"},
            "scenes": [{"nodes": [0]}],
            "nodes": [{"name": "tetra", "mesh": 0}],
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
            "buffers": [{"byteLength": 88}],
            "bufferViews": [
                {"buffer": 0, "byteOffset": 0, "byteLength": 48},
                {"buffer": 0, "byteOffset": 48, "byteLength": 24},
                {"buffer": 0, "byteOffset": 72, "byteLength": 16}
            ],
            "accessors": [
                {"bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3",
                 "min": [0, 0, 0], "max": [1, 1, 1]},
                {"bufferView": 1, "componentType": 5123, "count": 12, "type": "SCALAR"},
                {"bufferView": 2, "componentType": 5126, "count": 4, "type": "SCALAR",
                 "min": [0], "max": [3]}
            ],
            "animations": [{
                "name": "spin",
                "samplers": [{"input": 2, "output": 0}],
                "channels": [{"sampler": 0, "target": {"node": 0, "path": "translation"}}]
            }]
        }"#;

        let parsed = GltfSceneParser::new()
            .parse_scene_graph(json, Some(&blob))
            .unwrap();
        assert_eq!(
            parsed.animations,
            vec![AnimationClip {
                name: Some("spin".to_string()),
                channel_count: 1,
            }]
        );
        // first scene is used when no default is set
        assert!(parsed.has_content());
    }

    #[test]
    fn test_point_primitives_are_skipped() {
        let (json, blob) = tetrahedron();
        let json = json.replace(r#""indices": 1}"#, r#""indices": 1, "mode": 0}"#);
        let parsed = GltfSceneParser::new()
            .parse_scene_graph(&json, Some(&blob))
            .unwrap();
        assert_eq!(parsed.root.mesh_count(), 0);
        assert!(!parsed.has_content());
    }

    #[test]
    fn test_missing_blob_skips_geometry() {
        let (json, _) = tetrahedron();
        let parsed = GltfSceneParser::new().parse_scene_graph(&json, None).unwrap();
        assert_eq!(parsed.root.children.len(), 1);
        assert!(!parsed.has_content());
    }

    #[test]
    fn test_asset_version_gate() {
        assert!(matches!(
            check_asset_version(r#"{"asset":{}}"#),
            Err(SceneError::UnsupportedAsset(_))
        ));
        assert!(matches!(
            check_asset_version(r#"{"scenes":[]}"#),
            Err(SceneError::UnsupportedAsset(_))
        ));
        assert!(matches!(
            check_asset_version(r#"{"asset":{"version":"1.0"}}"#),
            Err(SceneError::UnsupportedAsset(_))
        ));
        assert!(matches!(check_asset_version("not json"), Err(SceneError::Json(_))));
        assert_eq!(
            check_asset_version(r#"{"asset":{"version":"2.0"}}"#).unwrap(),
            "2.0"
        );
    }

    #[test]
    fn test_document_without_scenes_is_empty() {
        let parsed = GltfSceneParser::new()
            .parse_scene_graph(r#"{"asset":{"version":"2.0"}}"#, None)
            .unwrap();
        assert!(parsed.root.is_empty());
        assert!(!parsed.has_content());
        assert!(parsed.animations.is_empty());
    }

    #[test]
    fn test_strip_and_fan_expansion() {
        assert_eq!(
            triangle_list(&[0, 1, 2, 3], PrimitiveType::TriangleStrip),
            vec![0, 1, 2, 2, 1, 3]
        );
        assert_eq!(
            triangle_list(&[0, 1, 2, 3], PrimitiveType::TriangleFan),
            vec![0, 1, 2, 0, 2, 3]
        );
        assert_eq!(triangle_list(&[0, 1, 2, 3], PrimitiveType::Triangles), vec![0, 1, 2]);
    }

    #[test]
    fn test_line_loop_closes() {
        assert_eq!(
            line_pairs(&[0, 1, 2], PrimitiveType::LineStrip, true),
            vec![0, 1, 1, 2, 2, 0]
        );
        assert_eq!(line_pairs(&[0, 1, 2], PrimitiveType::Lines, false), vec![0, 1]);
    }
}
