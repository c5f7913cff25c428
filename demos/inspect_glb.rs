//! Print the container layout and scene summary of a `.glb` file
//!
//! Usage: cargo run --example inspect_glb -- path/to/model.glb

use showcase_assets::{read_container, GltfSceneParser, NodeKind, SceneParser};

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: inspect_glb <file.glb>"))?;
    let data = std::fs::read(&path)?;

    println!("showcase_assets v{}", showcase_assets::VERSION);
    println!("{path}: {} bytes", data.len());

    let container = read_container(&data)?;
    println!(
        "  version {}, declared length {}",
        container.header.version, container.header.total_length
    );
    for chunk in &container.chunks {
        println!(
            "  chunk {:?} at offset {} ({} bytes)",
            chunk.kind, chunk.offset, chunk.length
        );
    }

    let scene = GltfSceneParser::new().parse_scene_graph(&container.content, container.body)?;
    println!(
        "  generator {:?}, asset version {:?}",
        scene.generator, scene.version
    );
    println!(
        "  {} nodes, {} meshes, {} animations",
        scene.root.node_count(),
        scene.root.mesh_count(),
        scene.animations.len()
    );

    let mut triangles = 0;
    scene.root.traverse(&mut |node, _| {
        if let NodeKind::Mesh(mesh) = &node.kind {
            triangles += mesh.mesh.triangle_count();
        }
    });
    println!("  {triangles} triangles");

    if let Some(bounds) = scene.root.bounding_box() {
        println!("  bounds {:?} .. {:?}", bounds.min, bounds.max);
    }
    Ok(())
}
