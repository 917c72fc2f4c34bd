//! Graph Scorer - Main coordinator for commander pair scoring
//!
//! Resolves every node's card lists and tribe distribution once, then scores
//! each unordered pair (i < j in node order) with all metrics and composes
//! the edge records. Includes both sequential and parallel (Rayon)
//! implementations; both return the same edges in the same order.

use crate::config::ScoringConfig;
use crate::data::{CardMetadataTable, CommanderDataset};
use crate::diagnostics::{PairObserver, PairReport};
use crate::graph::{CategoryMap, EdgeRecord, NodeRecord};
use crate::metrics::*;
use crate::utils::{mean_over, normalize_raw_weight, round_to, CommanderProfile};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One category's contribution to a pair score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScore {
    pub overlap: OverlapResult,
    pub uniqueness: f64,
}

/// Unrounded pair metrics
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    /// Indexed like the configured category list
    pub categories: Vec<CategoryScore>,
    pub raw_weight: f64,
    pub normalized_weight: f64,
    pub uniqueness_weight: f64,
    pub tribes_weight: f64,
    pub tribes_simplified_weight: f64,
    pub composite_weight: f64,
}

impl PairScore {
    /// Rounded edge record for serialization
    pub fn to_edge(&self, source: &str, target: &str, config: &ScoringConfig) -> EdgeRecord {
        let precision = config.precision;
        let round = |value: f64| round_to(value, precision);

        let mut raw_overlaps = CategoryMap::with_capacity(self.categories.len());
        let mut normalized_overlaps = CategoryMap::with_capacity(self.categories.len());
        let mut uniqueness_scores = CategoryMap::with_capacity(self.categories.len());
        for (category, score) in config.categories.iter().zip(&self.categories) {
            raw_overlaps.push(category.as_str(), score.overlap.raw);
            normalized_overlaps.push(category.as_str(), round(score.overlap.normalized));
            uniqueness_scores.push(category.as_str(), round(score.uniqueness));
        }

        EdgeRecord {
            source: source.to_string(),
            target: target.to_string(),
            raw_weight: round(self.raw_weight),
            normalized_weight: round(self.normalized_weight),
            uniqueness_weight: round(self.uniqueness_weight),
            tribes_weight: round(self.tribes_weight),
            tribes_simplified_weight: round(self.tribes_simplified_weight),
            composite_weight: round(self.composite_weight),
            raw_overlaps,
            normalized_overlaps,
            uniqueness_scores,
        }
    }
}

/// Main graph scorer
pub struct GraphScorer<'a> {
    config: &'a ScoringConfig,
    frequencies: &'a CardFrequencies,
    /// Node order; `None` when the node has no commander record
    profiles: Vec<Option<CommanderProfile<'a>>>,
    tribes: Vec<Option<&'a TribeWeights>>,
}

impl<'a> GraphScorer<'a> {
    /// Resolve card lists and tribe distributions for every node
    pub fn new(
        dataset: &'a CommanderDataset,
        nodes: &'a [NodeRecord],
        metadata: &CardMetadataTable,
        frequencies: &'a CardFrequencies,
        normalized_tribes: &'a NormalizedTribes,
        config: &'a ScoringConfig,
    ) -> Self {
        let profiles = nodes
            .iter()
            .map(|node| {
                dataset.get(&node.id).map(|record| {
                    CommanderProfile::build(&node.id, record, &config.categories, metadata)
                })
            })
            .collect();
        let tribes = nodes
            .iter()
            .map(|node| normalized_tribes.get(&node.id))
            .collect();

        Self {
            config,
            frequencies,
            profiles,
            tribes,
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Node index of `commander`
    pub fn position(&self, commander: &str) -> Option<usize> {
        self.profiles
            .iter()
            .position(|p| p.as_ref().is_some_and(|p| p.name == commander))
    }

    /// Score nodes `i` and `j`; `None` when either has no commander record
    pub fn score_pair(&self, i: usize, j: usize) -> Option<PairScore> {
        let p1 = self.profiles.get(i)?.as_ref()?;
        let p2 = self.profiles.get(j)?.as_ref()?;
        let config = self.config;
        let slots = config.categories.len();

        let categories: Vec<CategoryScore> = p1
            .categories
            .iter()
            .zip(&p2.categories)
            .map(|(cards1, cards2)| CategoryScore {
                overlap: calculate_overlap(cards1, cards2, p1.colors, p2.colors),
                uniqueness: calculate_uniqueness_weight(cards1, cards2, self.frequencies),
            })
            .collect();

        let total_raw_overlap: usize = categories.iter().map(|c| c.overlap.raw).sum();
        let raw_weight =
            normalize_raw_weight(total_raw_overlap, p1.total_cards.min(p2.total_cards));
        let normalized_weight = mean_over(categories.iter().map(|c| c.overlap.normalized), slots);
        let uniqueness_weight = mean_over(categories.iter().map(|c| c.uniqueness), slots);

        let (tribes_weight, tribes_simplified_weight) = match (self.tribes[i], self.tribes[j]) {
            (Some(t1), Some(t2)) => (
                tribes_weight_between(t1, t2),
                tribes_simplified_weight_between(
                    t1,
                    t2,
                    config.tribe_top_n,
                    config.tribe_position_decay,
                ),
            ),
            _ => (0.0, 0.0),
        };

        let composite_weight =
            config.overlap_blend * normalized_weight + config.uniqueness_blend * uniqueness_weight;

        Some(PairScore {
            categories,
            raw_weight,
            normalized_weight,
            uniqueness_weight,
            tribes_weight,
            tribes_simplified_weight,
            composite_weight,
        })
    }

    /// Edge between nodes `i` and `j`, if both have data and the composite is positive
    ///
    /// The composite is tested after rounding, so no written edge carries a
    /// zero composite_weight.
    pub fn edge(&self, i: usize, j: usize, observer: &dyn PairObserver) -> Option<EdgeRecord> {
        let score = self.score_pair(i, j)?;
        let p1 = self.profiles[i].as_ref()?;
        let p2 = self.profiles[j].as_ref()?;

        if self.config.is_debug_pair(p1.name, p2.name) {
            observer.observe(&PairReport {
                source: p1,
                target: p2,
                categories: &self.config.categories,
                frequencies: self.frequencies,
                source_tribes: self.tribes[i],
                target_tribes: self.tribes[j],
                tribe_top_n: self.config.tribe_top_n,
                tribe_position_decay: self.config.tribe_position_decay,
                score: &score,
            });
        }

        let composite = round_to(score.composite_weight, self.config.precision);
        (composite > 0.0).then(|| score.to_edge(p1.name, p2.name, self.config))
    }

    /// All edges from node `i` to later nodes
    fn edges_from(&self, i: usize, observer: &dyn PairObserver) -> Vec<EdgeRecord> {
        (i + 1..self.len())
            .filter_map(|j| self.edge(i, j, observer))
            .collect()
    }

    fn log_progress(&self, index: usize) {
        if index.checked_rem(self.config.progress_interval) == Some(0) {
            tracing::info!("Processing commander {}/{}...", index + 1, self.len());
        }
    }

    /// Score every unordered pair sequentially
    pub fn build_edges(&self, observer: &dyn PairObserver) -> Vec<EdgeRecord> {
        let mut edges = Vec::new();
        for i in 0..self.len() {
            self.log_progress(i);
            edges.extend(self.edges_from(i, observer));
        }

        tracing::info!(edges = edges.len(), "Processed edges");
        edges
    }

    /// Score every unordered pair IN PARALLEL
    ///
    /// Outer commanders are distributed across threads; per-commander results
    /// are concatenated in node order, so the output matches `build_edges`.
    pub fn build_edges_parallel(&self, observer: &dyn PairObserver) -> Vec<EdgeRecord> {
        let completed = AtomicUsize::new(0);

        let per_commander: Vec<Vec<EdgeRecord>> = (0..self.len())
            .into_par_iter()
            .map(|i| {
                let edges = self.edges_from(i, observer);
                self.log_progress(completed.fetch_add(1, Ordering::Relaxed));
                edges
            })
            .collect();

        let edges: Vec<EdgeRecord> = per_commander.into_iter().flatten().collect();
        tracing::info!(edges = edges.len(), "Processed edges");
        edges
    }
}
