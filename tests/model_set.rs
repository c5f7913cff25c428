//! Integration tests for concurrent model sets and the showcase carousel

mod common;

use futures::executor::block_on;
use futures::StreamExt;
use showcase_assets::{
    MockSpawner, MockTransport, ModelPipeline, NamingScheme, Showcase, SlotState, SlotUpdate,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn transport_with(paths: &[&str]) -> MockTransport {
    paths.iter().fold(MockTransport::new(), |t, path| {
        t.with_bytes(*path, common::tetrahedron_glb())
    })
}

#[test]
fn test_load_model_set_delivers_each_index_once() {
    let transport = transport_with(&["./models/M1.glb", "./models/M3.glb"]);
    let pipeline = ModelPipeline::new(transport, MockSpawner::new());
    let scheme = NamingScheme::single("./models", "M");

    let results: Vec<_> = block_on(pipeline.load_model_set(5, &scheme).collect());
    assert_eq!(results.len(), 5);

    let by_index: BTreeMap<usize, bool> = results
        .iter()
        .map(|(index, result)| (*index, result.is_placeholder()))
        .collect();
    assert_eq!(by_index.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    assert!(!by_index[&0]);
    assert!(by_index[&1]);
    assert!(!by_index[&2]);
    assert!(by_index[&3]);
    assert!(by_index[&4]);

    // one fetch per slot, since every slot has a single candidate
    assert_eq!(pipeline.transport().call_count(), 5);
}

#[test]
fn test_probing_scheme_tries_directories_in_order() {
    let transport = transport_with(&["models/minecraft1.glb"]);
    let pipeline = ModelPipeline::new(transport, MockSpawner::new());
    let scheme = NamingScheme::probing("minecraft");

    let results: Vec<_> = block_on(pipeline.load_model_set(1, &scheme).collect());
    assert_eq!(results[0].1.source_path(), Some("models/minecraft1.glb"));
    assert_eq!(
        pipeline.transport().calls(),
        vec![
            "./models/minecraft1.glb",
            "./assets/minecraft1.glb",
            "./minecraft1.glb",
            "models/minecraft1.glb",
        ]
    );
}

#[test]
fn test_spawn_model_set_publishes_slots() {
    let transport = transport_with(&["./models/M2.glb"]);
    let pipeline = Arc::new(ModelPipeline::new(transport, MockSpawner::blocking()));
    let scheme = NamingScheme::single("./models", "M");

    let set = pipeline.spawn_model_set(3, &scheme);
    assert_eq!(set.len(), 3);
    assert_eq!(set.settled_count(), 3);

    assert!(matches!(set.slots[0].state(), SlotState::Placeholder(_)));
    assert!(matches!(set.slots[1].state(), SlotState::Ready(_)));
    assert!(set.slots[2].is_placeholder());

    let completed: Vec<usize> = block_on(set.completions.collect());
    assert_eq!(completed, vec![0, 1, 2]);
}

#[test]
fn test_dropped_tasks_leave_slots_pending() {
    let pipeline = Arc::new(ModelPipeline::new(MockTransport::new(), MockSpawner::new()));
    let set = pipeline.spawn_model_set(2, &NamingScheme::single("./models", "M"));

    assert!(set.slots.iter().all(|slot| slot.is_pending()));
    assert_eq!(set.settled_count(), 0);
    assert!(block_on(set.completions.collect::<Vec<_>>()).is_empty());
}

#[test]
fn test_showcase_absorbs_background_results() {
    let transport = transport_with(&["./models/M1.glb"]);
    let pipeline = Arc::new(ModelPipeline::new(transport, MockSpawner::blocking()));
    let mut set = pipeline.spawn_model_set(3, &NamingScheme::single("./models", "M"));

    let mut showcase = Showcase::new(set.len());
    assert_eq!(showcase.absorb(&mut set).unwrap(), 3);

    // slot 0 is displayed and is the only root on stage
    let displayed = showcase.displayed().unwrap();
    assert!(!displayed.is_placeholder());
    assert_eq!(showcase.stage().len(), 1);
    assert_eq!(showcase.stage().visible_count(), 1);

    assert!(showcase.next().unwrap());
    assert!(showcase.displayed().unwrap().is_placeholder());
    assert_eq!(showcase.stage().len(), 1);
}

#[test]
fn test_late_real_result_replaces_displayed_placeholder() {
    let transport = MockTransport::new();
    let pipeline = ModelPipeline::new(transport.clone(), MockSpawner::new());
    let scheme = NamingScheme::single("./models", "M");
    let mut showcase = Showcase::new(1);

    let first: Vec<_> = block_on(pipeline.load_model_set(1, &scheme).collect());
    let (index, placeholder) = first.into_iter().next().unwrap();
    let placeholder_id = placeholder.scene_root.id();
    assert_eq!(showcase.apply(index, placeholder).unwrap(), SlotUpdate::Filled);

    // the file appears later and a retry succeeds
    transport.set_route(
        "./models/M1.glb",
        showcase_assets::MockResponse::Bytes(common::tetrahedron_glb()),
    );
    let retry: Vec<_> = block_on(pipeline.load_model_set(1, &scheme).collect());
    let (index, real) = retry.into_iter().next().unwrap();
    let real_id = real.scene_root.id();

    assert_eq!(showcase.apply(index, real).unwrap(), SlotUpdate::Replaced);
    assert!(!showcase.stage().contains(placeholder_id));
    assert!(showcase.stage().contains(real_id));

    // a placeholder arriving afterwards is dropped
    let stale = pipeline.placeholder(0);
    assert_eq!(showcase.apply(0, stale).unwrap(), SlotUpdate::Ignored);
    assert!(showcase.stage().contains(real_id));
}

#[cfg(feature = "runtime-tokio")]
mod tokio_runtime {
    use super::*;
    use showcase_assets::{FileTransport, TokioSpawner};

    #[tokio::test(flavor = "multi_thread")]
    async fn test_spawned_set_on_tokio() {
        let root = std::env::temp_dir().join(format!("showcase-assets-{}", std::process::id()));
        std::fs::create_dir_all(root.join("models")).unwrap();
        std::fs::write(root.join("models/M1.glb"), common::tetrahedron_glb()).unwrap();

        let pipeline = Arc::new(ModelPipeline::new(
            FileTransport::new(&root),
            TokioSpawner::new(),
        ));
        let set = pipeline.spawn_model_set(2, &NamingScheme::single("./models", "M"));

        let mut completed: Vec<usize> = set.completions.collect().await;
        completed.sort_unstable();
        assert_eq!(completed, vec![0, 1]);
        assert!(set.slots[0].is_ready());
        assert!(set.slots[1].is_placeholder());

        std::fs::remove_dir_all(&root).unwrap();
    }
}
