//! Integration tests for candidate retry and placeholder fallback

mod common;

use futures::executor::block_on;
use showcase_assets::{
    AssetError, ContainerWriter, FitOptions, FitPolicy, MockResponse, MockSpawner, MockTransport,
    ModelPipeline, NodeKind, PipelineConfig, PlaceholderSpec, Provenance, PLACEHOLDER_GENERATOR,
};
use std::time::Duration;

fn pipeline(transport: MockTransport) -> ModelPipeline<MockTransport> {
    ModelPipeline::new(transport, MockSpawner::new())
}

#[test]
fn test_missing_path_scenario() {
    let pipeline = pipeline(MockTransport::new());

    let result = block_on(pipeline.load_model(&["/missing.glb"])).unwrap();
    assert!(result.is_placeholder());
    assert_eq!(result.asset_info.generator, PLACEHOLDER_GENERATOR);
    assert_eq!(pipeline.transport().call_count(), 1);
}

#[test]
fn test_exhaustion_yields_non_degenerate_placeholder() {
    let transport = MockTransport::new()
        .with_route("a.glb", MockResponse::Status(500))
        .with_route("b.glb", MockResponse::Network("connection reset".into()))
        .with_bytes("c.glb", b"not a glb at all".to_vec())
        .with_bytes("d.glb", ContainerWriter::new().version(1).json("{}").build());
    let pipeline = pipeline(transport);

    let result = block_on(pipeline.load_model(&["a.glb", "b.glb", "c.glb", "d.glb"])).unwrap();
    assert_eq!(result.asset_info.generator, PLACEHOLDER_GENERATOR);
    assert_eq!(result.provenance, Provenance::Placeholder);

    let bounds = result.scene_root.read().bounding_box().unwrap();
    let size = bounds.size();
    assert!(size.x > 0.0 && size.y > 0.0 && size.z > 0.0);

    let metrics = pipeline.metrics();
    assert_eq!(metrics.attempts(), 4);
    assert_eq!(metrics.transport_faults(), 2);
    assert_eq!(metrics.container_faults(), 2);
    assert_eq!(metrics.placeholders(), 1);
}

#[test]
fn test_first_success_stops_the_search() {
    let transport = MockTransport::new()
        .with_bytes("first.glb", common::tetrahedron_glb())
        .with_bytes("second.glb", common::tetrahedron_glb());
    let pipeline = pipeline(transport);

    let result = block_on(pipeline.load_model(&["first.glb", "second.glb"])).unwrap();
    assert!(!result.is_placeholder());
    assert_eq!(result.source_path(), Some("first.glb"));
    assert_eq!(pipeline.transport().calls(), vec!["first.glb".to_string()]);
}

#[test]
fn test_second_candidate_after_first_fails() {
    let transport = MockTransport::new().with_bytes("./assets/M1.glb", common::tetrahedron_glb());
    let pipeline = pipeline(transport);

    let result =
        block_on(pipeline.load_model(&["./models/M1.glb", "./assets/M1.glb"])).unwrap();
    assert!(!result.is_placeholder());
    assert_eq!(result.asset_info.generator, "fixture");
    assert_eq!(result.asset_info.version.as_deref(), Some("2.0"));
    assert_eq!(
        pipeline.transport().calls(),
        vec!["./models/M1.glb".to_string(), "./assets/M1.glb".to_string()]
    );
}

#[test]
fn test_empty_candidate_list_fails_fast() {
    let pipeline = pipeline(MockTransport::new());
    let paths: [&str; 0] = [];

    let result = block_on(pipeline.load_model(&paths));
    assert!(matches!(result, Err(AssetError::InvalidArgument(_))));
    assert_eq!(pipeline.transport().call_count(), 0);
    assert_eq!(pipeline.metrics().placeholders(), 0);
}

#[test]
fn test_empty_scene_falls_through_to_next_path() {
    let transport = MockTransport::new()
        .with_bytes("empty.glb", common::empty_scene_glb())
        .with_bytes("full.glb", common::tetrahedron_glb());
    let pipeline = pipeline(transport);

    let result = block_on(pipeline.load_model(&["empty.glb", "full.glb"])).unwrap();
    assert_eq!(result.source_path(), Some("full.glb"));
    assert_eq!(pipeline.metrics().semantic_faults(), 1);
}

#[test]
fn test_real_result_shape() {
    let transport = MockTransport::new().with_bytes("m.glb", common::tetrahedron_glb());
    let pipeline = pipeline(transport);

    let result = block_on(pipeline.load_model(&["m.glb"])).unwrap();
    assert_eq!(result.scenes.len(), 1);
    assert!(result.scenes[0].ptr_eq(&result.scene_root));
    assert!(result.cameras.is_empty());
    assert!(result.animations.is_empty());

    let root = result.scene_root.read();
    assert_eq!(root.name.as_deref(), Some("main"));
    assert_eq!(root.mesh_count(), 1);
    let mut shadowed = 0;
    root.traverse(&mut |node, _| {
        if let NodeKind::Mesh(mesh) = &node.kind {
            assert!(mesh.cast_shadow && mesh.receive_shadow);
            shadowed += 1;
        }
    });
    assert_eq!(shadowed, 1);
}

#[test]
fn test_viewer_fit_clamps_large_models() {
    let transport = MockTransport::new().with_bytes("m.glb", common::tetrahedron_glb());
    let pipeline = pipeline(transport);

    let result = block_on(pipeline.load_model(&["m.glb"])).unwrap();
    let root = result.scene_root.read();
    let bounds = root.bounding_box().unwrap();
    // 4 units shrinks to the 3-unit target, centred and lifted by 0.1
    assert!((bounds.max_extent() - 3.0).abs() < 1e-4);
    assert!(bounds.center().x.abs() < 1e-4);
    assert!((bounds.center().y - 0.1).abs() < 1e-4);
    assert!(!root.visible);
}

#[test]
fn test_coin_configuration() {
    let config = PipelineConfig::default()
        .with_placeholder(PlaceholderSpec::coin())
        .with_fit(FitOptions::coin())
        .unwrap();
    let pipeline = pipeline(MockTransport::new()).with_config(config).unwrap();

    let result = block_on(pipeline.load_model(&["./coin.glb"])).unwrap();
    let root = result.scene_root.read();
    assert!(root.visible);
    let bounds = root.bounding_box().unwrap();
    assert!((bounds.max_extent() - 2.0).abs() < 1e-4);
    assert!(bounds.center().length() < 1e-4);
}

#[test]
fn test_stray_byte_in_json_still_loads() {
    let json = common::TETRAHEDRON_JSON.replacen("fixture", "fixt\u{1}ure", 1);
    let json: Vec<u8> = json.bytes().map(|b| if b == 1 { 0xff } else { b }).collect();
    let glb = ContainerWriter::new()
        .chunk(showcase_assets::loader::CHUNK_TYPE_JSON, &json)
        .bin(&common::tetrahedron_blob())
        .build();
    let pipeline = pipeline(MockTransport::new().with_bytes("m.glb", glb));

    let result = block_on(pipeline.load_model(&["m.glb"])).unwrap();
    assert!(!result.is_placeholder());
    assert_eq!(result.asset_info.generator, "fixt\u{fffd}ure");
    assert_eq!(pipeline.transport().call_count(), 1);
}

#[test]
fn test_zero_fit_target_fails_fast() {
    let collapse = FitOptions::coin().with_policy(FitPolicy::Exact { target: 0.0 });
    let result = PipelineConfig::default().with_fit(collapse);
    assert!(matches!(result, Err(AssetError::InvalidArgument(_))));

    // the default config keeps placeholders at a usable size
    let pipeline = pipeline(MockTransport::new());
    let result = block_on(pipeline.load_model(&["/missing.glb"])).unwrap();
    let bounds = result.scene_root.read().bounding_box().unwrap();
    assert!(!bounds.is_degenerate());
    assert!(bounds.size().min_element() > 0.0);
}

#[test]
fn test_without_fit_leaves_geometry_alone() {
    let transport = MockTransport::new().with_bytes("m.glb", common::tetrahedron_glb());
    let pipeline = pipeline(transport)
        .with_config(PipelineConfig::default().without_fit())
        .unwrap();

    let result = block_on(pipeline.load_model(&["m.glb"])).unwrap();
    let bounds = result.scene_root.read().bounding_box().unwrap();
    assert_eq!(bounds.max_extent(), 4.0);
    assert!(result.scene_root.read().visible);
}

#[test]
fn test_repeated_loads_are_equivalent_but_distinct() {
    let transport = MockTransport::new().with_bytes("m.glb", common::tetrahedron_glb());
    let pipeline = pipeline(transport);

    let a = block_on(pipeline.load_model(&["m.glb"])).unwrap();
    let b = block_on(pipeline.load_model(&["m.glb"])).unwrap();
    assert!(!a.scene_root.ptr_eq(&b.scene_root));
    assert_ne!(a.scene_root.id(), b.scene_root.id());
    assert_eq!(*a.scene_root.read(), *b.scene_root.read());

    a.scene_root.write().visible = true;
    assert!(!b.scene_root.read().visible);
}

#[test]
fn test_hanging_fetch_times_out() {
    let transport = MockTransport::new()
        .with_route("hang.glb", MockResponse::Hang)
        .with_bytes("ok.glb", common::tetrahedron_glb());
    let pipeline = ModelPipeline::new(transport, MockSpawner::new().with_expired_timers())
        .with_config(PipelineConfig::default().with_fetch_timeout(Duration::from_millis(50)))
        .unwrap();

    let result = block_on(pipeline.load_model(&["hang.glb", "ok.glb"])).unwrap();
    assert_eq!(result.source_path(), Some("ok.glb"));
    assert_eq!(pipeline.metrics().timeouts(), 1);
}

#[test]
fn test_placeholder_color_follows_index() {
    let pipeline = pipeline(MockTransport::new());

    let first = block_on(pipeline.load_model_indexed(0, &["x.glb"])).unwrap();
    let second = block_on(pipeline.load_model_indexed(1, &["x.glb"])).unwrap();
    let color = |r: &showcase_assets::LoadResult| match &r.scene_root.read().children[0].kind {
        NodeKind::Mesh(mesh) => mesh.material.base_color,
        _ => panic!("placeholder body should be a mesh"),
    };
    assert_ne!(color(&first), color(&second));
}
