//! Criterion benchmarks for the commander pair loop.
//!
//! Synthetic dataset: commanders cycling through color pairs, each listing a
//! slice of a shared card pool across three categories.

use commander_graph::{
    calculate_card_frequencies, normalize_tribe_counts, process_nodes, CardMetadataTable,
    ColorIdentity, CommanderDataset, GraphScorer, NoopObserver, ScoringConfig,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Map, Value};

const COLORS: [&str; 5] = ["W", "U", "B", "R", "G"];
const TRIBES: [&str; 6] = ["Dragons", "Elves", "Goblins", "Tokens", "Counters", "Spellslinger"];
const POOL: usize = 400;

fn card_name(i: usize) -> String {
    format!("Card {i:03}")
}

fn card_colors(i: usize) -> Vec<&'static str> {
    if i % 4 == 0 {
        Vec::new()
    } else {
        vec![COLORS[i % 5]]
    }
}

fn dataset(commanders: usize) -> CommanderDataset {
    let mut root = Map::new();
    for c in 0..commanders {
        let cards = |offset: usize| -> Vec<Value> {
            (0..25)
                .map(|k| json!({ "name": card_name((c * 7 + k * 3 + offset) % POOL) }))
                .collect()
        };
        root.insert(
            format!("Commander {c}"),
            json!({
                "deck_count": 100 + c,
                "rank": c + 1,
                "color_identity": [COLORS[c % 5], COLORS[(c + 2) % 5]],
                "card_groups": {
                    "Creatures": cards(0),
                    "Instants": cards(11),
                    "Lands": cards(29),
                },
                "tribes": [
                    { "name": TRIBES[c % 6], "count": 50 + c },
                    { "name": TRIBES[(c + 1) % 6], "count": 30 },
                    { "name": TRIBES[(c + 3) % 6], "count": 10 },
                ],
            }),
        );
    }
    CommanderDataset::from_json_str(&Value::Object(root).to_string()).unwrap()
}

fn metadata() -> CardMetadataTable {
    (0..POOL)
        .map(|i| (card_name(i), ColorIdentity::from_symbols(card_colors(i))))
        .collect()
}

fn bench_build_edges(c: &mut Criterion) {
    let config = ScoringConfig {
        debug_pairs: Vec::new(),
        ..ScoringConfig::default()
    };
    let metadata = metadata();
    let mut group = c.benchmark_group("build_edges");
    group.sample_size(10);

    for commanders in [100usize, 300] {
        let dataset = dataset(commanders);
        let nodes = process_nodes(&dataset, &config);
        let frequencies = calculate_card_frequencies(&dataset, &config.categories);
        let tribes = normalize_tribe_counts(&dataset);
        let scorer = GraphScorer::new(&dataset, &nodes, &metadata, &frequencies, &tribes, &config);

        group.bench_with_input(BenchmarkId::new("sequential", commanders), &scorer, |b, s| {
            b.iter(|| black_box(s.build_edges(&NoopObserver)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", commanders), &scorer, |b, s| {
            b.iter(|| black_box(s.build_edges_parallel(&NoopObserver)))
        });
    }

    group.finish();
}

fn bench_frequencies(c: &mut Criterion) {
    let config = ScoringConfig::default();
    let dataset = dataset(300);
    c.bench_function("calculate_card_frequencies_300", |b| {
        b.iter(|| black_box(calculate_card_frequencies(&dataset, &config.categories)))
    });
}

criterion_group!(benches, bench_build_edges, bench_frequencies);
criterion_main!(benches);
