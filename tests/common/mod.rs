//! Shared fixtures for integration tests

#![allow(dead_code)]

use showcase_assets::ContainerWriter;

/// JSON for a tetrahedron whose geometry lives in the BIN chunk
pub const TETRAHEDRON_JSON: &str = r#"{
    "asset": {"version": "2.0", "generator": "fixture"},
    "scene": 0,
    "scenes": [{"name": "main", "nodes": [0]}],
    "nodes": [{"name": "tetra", "mesh": 0}],
    "meshes": [{"name": "tetra", "primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
    "animations": [],
    "buffers": [{"byteLength": 72}],
    "bufferViews": [
        {"buffer": 0, "byteOffset": 0, "byteLength": 48},
        {"buffer": 0, "byteOffset": 48, "byteLength": 24}
    ],
    "accessors": [
        {"bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3",
         "min": [0, 0, 0], "max": [4, 4, 4]},
        {"bufferView": 1, "componentType": 5123, "count": 12, "type": "SCALAR"}
    ]
}"#;

/// Vertex and index data matching [`TETRAHEDRON_JSON`]
pub fn tetrahedron_blob() -> Vec<u8> {
    let positions: [[f32; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [4.0, 0.0, 0.0],
        [0.0, 4.0, 0.0],
        [0.0, 0.0, 4.0],
    ];
    let indices: [u16; 12] = [0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];
    let mut blob = bytemuck::cast_slice::<_, u8>(&positions).to_vec();
    blob.extend_from_slice(bytemuck::cast_slice(&indices));
    blob
}

/// A complete, parseable `.glb` holding one tetrahedron 4 units across
pub fn tetrahedron_glb() -> Vec<u8> {
    ContainerWriter::new()
        .json(TETRAHEDRON_JSON)
        .bin(&tetrahedron_blob())
        .build()
}

/// Structurally valid `.glb` whose scene is empty
pub fn empty_scene_glb() -> Vec<u8> {
    ContainerWriter::new()
        .json(r#"{"asset":{"version":"2.0"},"scenes":[{"nodes":[]}]}"#)
        .build()
}

/// A 32-byte container with `{"asset":{}}` as its only chunk
pub fn minimal_glb() -> Vec<u8> {
    ContainerWriter::new().json(r#"{"asset":{}}"#).build()
}
