//! Prepare visualization data
//!
//! Loads the commander dataset and card metadata, scores every commander pair
//! and writes nodes.json / edges.json for the graph front end.
//!
//! Configuration via environment variables (see `PipelineConfig::from_env`):
//! DATA_DIR, COMMANDER_DATA, CARD_METADATA, OUTPUT_DIR, SCORING_CONFIG, PARALLEL
//!
//! Usage: RUST_LOG=commander_graph=debug cargo run --release --bin prepare_viz_data

use anyhow::Result;
use commander_graph::report::{example_frequencies, TribeWeightDistribution};
use commander_graph::{
    calculate_card_frequencies, normalize_tribe_counts, process_nodes, save_results,
    CardMetadataTable, CommanderDataset, GraphScorer, PipelineConfig, TracingObserver,
};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn banner(title: &str) {
    println!("\n{}", "=".repeat(80));
    println!("{}", title);
    println!("{}", "=".repeat(80));
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "commander_graph=info,prepare_viz_data=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let total_start = Instant::now();
    let config = PipelineConfig::from_env()?;
    config.scoring.validate()?;

    banner("COMMANDER GRAPH: PREPARE VISUALIZATION DATA");
    println!("  Commander data: {:?}", config.commander_data);
    println!("  Card metadata:  {:?}", config.card_metadata);
    println!("  Output dir:     {:?}", config.output_dir);
    println!("  Parallel:       {}", config.parallel);

    // ========================================================================
    // Step 1: Load inputs
    // ========================================================================
    println!("\nStep 1: Loading data...");
    let dataset = CommanderDataset::load(&config.commander_data)?;
    let metadata = CardMetadataTable::load(&config.card_metadata)?;

    // ========================================================================
    // Step 2: Nodes
    // ========================================================================
    println!("\nStep 2: Processing nodes...");
    let nodes = process_nodes(&dataset, &config.scoring);
    println!("  Nodes: {}", nodes.len());

    // ========================================================================
    // Step 3: Global card frequencies
    // ========================================================================
    println!("\nStep 3: Calculating global card frequencies...");
    let frequencies = calculate_card_frequencies(&dataset, &config.scoring.categories);
    println!("  Distinct cards: {}", frequencies.len());
    example_frequencies(&frequencies, &config.scoring.example_cards);

    // ========================================================================
    // Step 4: Tribe normalization
    // ========================================================================
    println!("\nStep 4: Calculating normalized tribe weights...");
    let normalized_tribes = normalize_tribe_counts(&dataset);
    println!("  Commanders with tribes: {}", normalized_tribes.len());

    // ========================================================================
    // Step 5: Edges
    // ========================================================================
    println!("\nStep 5: Processing edges...");
    let edge_start = Instant::now();
    let scorer = GraphScorer::new(
        &dataset,
        &nodes,
        &metadata,
        &frequencies,
        &normalized_tribes,
        &config.scoring,
    );
    let edges = if config.parallel {
        scorer.build_edges_parallel(&TracingObserver)
    } else {
        scorer.build_edges(&TracingObserver)
    };
    println!("  Edges: {}", edges.len());
    println!("  Time: {:.1}s", edge_start.elapsed().as_secs_f64());

    TribeWeightDistribution::from_edges(&edges).log();

    // ========================================================================
    // Step 6: Save
    // ========================================================================
    println!("\nStep 6: Saving processed data...");
    save_results(&nodes, &edges, &config.output_dir)?;

    banner("COMPLETE");
    println!("  Nodes: {}", nodes.len());
    println!("  Edges: {}", edges.len());
    println!("  Output: {:?}", config.output_dir);
    println!("  Total time: {:.1}s", total_start.elapsed().as_secs_f64());
    println!("{}", "=".repeat(80));

    Ok(())
}
