//! Background loading of a five-model carousel from a static site directory
//!
//! Usage: cargo run --example showcase_loading --features runtime-tokio -- public

#[cfg(feature = "runtime-tokio")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use futures::StreamExt;
    use showcase_assets::{
        FileTransport, ModelPipeline, NamingScheme, PipelineConfig, Showcase, TokioSpawner,
    };
    use std::sync::Arc;
    use std::time::Duration;

    let root = std::env::args().nth(1).unwrap_or_else(|| "public".to_string());

    println!("showcase_assets Carousel Demo");
    println!("=============================\n");

    let config = PipelineConfig::default().with_fetch_timeout(Duration::from_secs(5));
    let pipeline = Arc::new(
        ModelPipeline::new(FileTransport::new(&root), TokioSpawner::new()).with_config(config)?,
    );

    let mut set = pipeline.spawn_model_set(5, &NamingScheme::single("./models", "M"));
    let mut showcase = Showcase::new(set.len());

    while let Some(index) = set.completions.next().await {
        if let Some(result) = set.slot(index).and_then(|slot| slot.result()) {
            let kind = if result.is_placeholder() { "placeholder" } else { "model" };
            println!("slot {index}: {kind} {:?}", result.source_path());
            showcase.apply(index, result)?;
        }
    }

    for _ in 0..showcase.len() {
        let shown = showcase.displayed().map(|r| r.is_placeholder());
        println!("showing slot {} (placeholder: {shown:?})", showcase.current());
        showcase.next()?;
    }

    let metrics = pipeline.metrics();
    println!(
        "\n{} attempts, {} real, {} placeholders ({:.0}%)",
        metrics.attempts(),
        metrics.real_loads(),
        metrics.placeholders(),
        metrics.placeholder_rate()
    );
    Ok(())
}

#[cfg(not(feature = "runtime-tokio"))]
fn main() {
    println!("This example requires the runtime-tokio feature.");
    println!("Run with: cargo run --example showcase_loading --features runtime-tokio");
}
