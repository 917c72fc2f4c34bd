//! Pipeline Integration Tests
//!
//! Runs the full load → score → save flow against small fixture files in a
//! temporary directory, the same sequence the `prepare_viz_data` binary runs.

use approx::assert_relative_eq;
use commander_graph::report::TribeWeightDistribution;
use commander_graph::{
    calculate_card_frequencies, load_results, normalize_tribe_counts, process_nodes,
    save_results, CardMetadataTable, CommanderDataset, EdgeRecord, GraphScorer, NodeRecord,
    NoopObserver, PipelineConfig,
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const COMMANDERS: &str = r#"{
    "The Ur-Dragon": {
        "deck_count": 20000, "rank": 3, "color_identity": ["W", "U", "B", "R", "G"],
        "card_groups": {
            "High Synergy Cards": [{"name": "Dragonspeaker Shaman"}, {"name": "Sarkhan's Unsealing"}],
            "Creatures": [{"name": "Dragonspeaker Shaman"}, {"name": "Old Gnawbone"}],
            "Mana Artifacts": [{"name": "Sol Ring"}, {"name": "Arcane Signet"}],
            "Lands": [{"name": "Command Tower"}]
        },
        "tribes": [
            {"name": "Dragons", "count": 8000},
            {"name": "5-color", "count": 2000},
            {"name": "Tribal", "count": 1000}
        ]
    },
    "Tiamat": {
        "deck_count": 5000, "rank": 150, "color_identity": ["W", "U", "B", "R", "G"],
        "card_groups": {
            "High Synergy Cards": [{"name": "Sarkhan's Unsealing"}],
            "Creatures": [{"name": "Old Gnawbone"}],
            "Mana Artifacts": [{"name": "Sol Ring"}],
            "Lands": [{"name": "Command Tower"}, {"name": "Exotic Orchard"}]
        },
        "tribes": [
            {"name": "Dragons", "count": 600},
            {"name": "Tribal", "count": 300},
            {"name": "Treasure", "count": 100}
        ]
    },
    "Unreleased Commander": null,
    "Krenko, Mob Boss": {
        "deck_count": 15000, "rank": 10, "color_identity": ["R"],
        "card_groups": {
            "Creatures": [{"name": "Goblin King"}],
            "Mana Artifacts": [{"name": "Sol Ring"}]
        }
    },
    "Talrand, Sky Summoner": {
        "deck_count": 4000, "rank": 90, "color_identity": ["U"],
        "card_groups": { "Instants": [{"name": "Counterspell"}] }
    }
}"#;

const CARD_METADATA: &[&str] = &[
    "[",
    r#"{"name": "Sol Ring", "color_identity": [], "rarity": "uncommon", "released_at": "2020-11-20"},"#,
    r#"{"name": "Sol Ring", "color_identity": [], "rarity": "uncommon", "released_at": "1993-08-05", "image_uris": {"normal": "https://img/sol.jpg"}},"#,
    r#"{"name": "Arcane Signet", "color_identity": [], "rarity": "common"},"#,
    r#"{"name": "Command Tower", "color_identity": [], "rarity": "common"},"#,
    r#"{"name": "Exotic Orchard", "color_identity": [], "rarity": "rare"},"#,
    r#"{"name": "Dragonspeaker Shaman", "color_identity": ["R"], "rarity": "uncommon"},"#,
    r#"{"name": "Sarkhan's Unsealing", "color_identity": ["R"], "rarity": "rare"},"#,
    r#"{"name": "Old Gnawbone", "color_identity": ["G"], "rarity": "mythic"},"#,
    r#"{"name": "Goblin King", "color_identity": ["R"], "rarity": "rare"},"#,
    r#"this line is not json,"#,
    r#"{"name": "Counterspell", "color_identity": ["U"], "rarity": "uncommon"}"#,
    "]",
];

fn write_fixtures(dir: &Path) {
    fs::write(dir.join("extracted_commander_data.json"), COMMANDERS).unwrap();
    fs::write(
        dir.join("default-cards-20241223222017.json"),
        CARD_METADATA.join("\n"),
    )
    .unwrap();
}

fn config_for(dir: &Path, parallel: bool) -> PipelineConfig {
    let vars: HashMap<&str, String> = [
        ("DATA_DIR", dir.display().to_string()),
        ("PARALLEL", parallel.to_string()),
    ]
    .into_iter()
    .collect();
    PipelineConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

fn run(config: &PipelineConfig) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
    let dataset = CommanderDataset::load(&config.commander_data).unwrap();
    let metadata = CardMetadataTable::load(&config.card_metadata).unwrap();

    let nodes = process_nodes(&dataset, &config.scoring);
    let frequencies = calculate_card_frequencies(&dataset, &config.scoring.categories);
    let tribes = normalize_tribe_counts(&dataset);
    let scorer = GraphScorer::new(&dataset, &nodes, &metadata, &frequencies, &tribes, &config.scoring);

    let edges = if config.parallel {
        scorer.build_edges_parallel(&NoopObserver)
    } else {
        scorer.build_edges(&NoopObserver)
    };

    save_results(&nodes, &edges, &config.output_dir).unwrap();
    (nodes, edges)
}

fn edge<'e>(edges: &'e [EdgeRecord], source: &str, target: &str) -> Option<&'e EdgeRecord> {
    edges.iter().find(|e| e.source == source && e.target == target)
}

#[test]
fn test_full_pipeline_round_trip() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let config = config_for(dir.path(), false);

    let (nodes, edges) = run(&config);
    let (saved_nodes, saved_edges) = load_results(&config.output_dir).unwrap();

    assert_eq!(saved_nodes, nodes);
    assert_eq!(saved_edges, edges);
    assert!(config.output_dir.ends_with("viz_data"));
}

#[test]
fn test_nodes_follow_input_order_and_skip_null() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let (nodes, _) = run(&config_for(dir.path(), false));

    let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["The Ur-Dragon", "Tiamat", "Krenko, Mob Boss", "Talrand, Sky Summoner"]
    );
    assert_eq!(nodes[0].card_counts.get("Mana Artifacts"), Some(&2));
    assert_eq!(nodes[0].rank, Some(3));
}

#[test]
fn test_dragon_pair_edge() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let (_, edges) = run(&config_for(dir.path(), false));

    let dragons = edge(&edges, "The Ur-Dragon", "Tiamat").expect("dragon edge");

    // Dragons min(0.727, 0.6)
    assert_relative_eq!(dragons.tribes_weight, 0.6, epsilon = 1e-9);
    // Dragons (1.0) + Tribal ((0.7225 + 0.85) / 2) over 2.5725
    assert_relative_eq!(dragons.tribes_simplified_weight, 0.694, epsilon = 1e-9);
    assert_eq!(dragons.raw_overlaps.get("Mana Artifacts"), Some(&1));
    assert_eq!(dragons.raw_overlaps.get("Lands"), Some(&1));
    assert_eq!(dragons.raw_overlaps.len(), 10);
    assert!(dragons.composite_weight > 0.0 && dragons.composite_weight <= 1.0);
}

#[test]
fn test_colorless_staples_link_disjoint_colors() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let (_, edges) = run(&config_for(dir.path(), false));

    // Krenko shares Sol Ring with both dragon commanders
    let krenko = edge(&edges, "The Ur-Dragon", "Krenko, Mob Boss").expect("krenko edge");
    assert_eq!(krenko.raw_overlaps.get("Mana Artifacts"), Some(&1));
    assert_eq!(krenko.tribes_weight, 0.0);
    assert_eq!(krenko.tribes_simplified_weight, 0.0);

    // Talrand shares nothing with anyone
    assert!(edges
        .iter()
        .all(|e| e.source != "Talrand, Sky Summoner" && e.target != "Talrand, Sky Summoner"));
    assert!(edges.iter().all(|e| e.composite_weight > 0.0));
}

#[test]
fn test_parallel_run_writes_identical_files() {
    let sequential_dir = TempDir::new().unwrap();
    let parallel_dir = TempDir::new().unwrap();
    write_fixtures(sequential_dir.path());
    write_fixtures(parallel_dir.path());

    let sequential = config_for(sequential_dir.path(), false);
    let parallel = config_for(parallel_dir.path(), true);
    assert!(parallel.parallel);
    run(&sequential);
    run(&parallel);

    for file in ["nodes.json", "edges.json"] {
        let a = fs::read_to_string(sequential.output_dir.join(file)).unwrap();
        let b = fs::read_to_string(parallel.output_dir.join(file)).unwrap();
        assert_eq!(a, b, "{} differs", file);
    }
}

#[test]
fn test_metadata_loader_tolerates_array_dump() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let config = config_for(dir.path(), false);

    let metadata = CardMetadataTable::load(&config.card_metadata).unwrap();
    assert_eq!(metadata.len(), 9);
    assert_eq!(metadata.skipped_lines(), 3);

    let sol_ring = metadata.get("Sol Ring").unwrap();
    assert_eq!(sol_ring.image_uris.normal.as_deref(), Some("https://img/sol.jpg"));
    assert_eq!(sol_ring.released_at.map(|d| d.to_string()).as_deref(), Some("1993-08-05"));
}

#[test]
fn test_tribe_distribution_over_run() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let (_, edges) = run(&config_for(dir.path(), false));

    let distribution = TribeWeightDistribution::from_edges(&edges);
    assert_eq!(distribution.total(), 1);
    assert_eq!(distribution.buckets[2], 1);
    assert_eq!(distribution.max, Some(0.6));
}

#[test]
fn test_missing_input_reports_path() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path(), false);
    let err = CommanderDataset::load(&config.commander_data).unwrap_err();
    assert!(format!("{:#}", err).contains("extracted_commander_data.json"));
}
