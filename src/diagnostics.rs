//! Per-pair diagnostics
//!
//! Scoring stays pure; selected commander pairs (see
//! `ScoringConfig::debug_pairs`) are handed to a `PairObserver` together with
//! everything needed to explain their score: shared cards with their global
//! usage and the matched top tribes.

use crate::metrics::tribes::{top_tribe_matches, TribeMatch, TribeWeights};
use crate::metrics::uniqueness::{shared_card_usage, CardFrequencies, SharedCard};
use crate::scorer::PairScore;
use crate::utils::CommanderProfile;
use smallvec::SmallVec;

/// A scored pair with the inputs that produced its score
pub struct PairReport<'r, 'a> {
    pub source: &'r CommanderProfile<'a>,
    pub target: &'r CommanderProfile<'a>,
    pub categories: &'r [String],
    pub frequencies: &'r CardFrequencies,
    pub source_tribes: Option<&'r TribeWeights>,
    pub target_tribes: Option<&'r TribeWeights>,
    pub tribe_top_n: usize,
    pub tribe_position_decay: f64,
    /// Unrounded scores
    pub score: &'r PairScore,
}

impl<'r, 'a> PairReport<'r, 'a> {
    /// Shared cards of one category with their frequency and uniqueness
    pub fn shared_cards(&self, category_index: usize) -> Vec<SharedCard<'a>> {
        match (
            self.source.categories.get(category_index),
            self.target.categories.get(category_index),
        ) {
            (Some(cards1), Some(cards2)) => shared_card_usage(cards1, cards2, self.frequencies),
            _ => Vec::new(),
        }
    }

    /// Tribes present in both top-N lists
    pub fn tribe_matches(&self) -> SmallVec<[TribeMatch<'r>; 4]> {
        match (self.source_tribes, self.target_tribes) {
            (Some(t1), Some(t2)) => {
                top_tribe_matches(t1, t2, self.tribe_top_n, self.tribe_position_decay)
            }
            _ => SmallVec::new(),
        }
    }
}

/// Receives reports for the configured debug pairs
///
/// Must be `Sync`: the parallel pair loop calls it from worker threads.
pub trait PairObserver: Sync {
    fn observe(&self, report: &PairReport<'_, '_>);
}

/// Ignores every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PairObserver for NoopObserver {
    fn observe(&self, _report: &PairReport<'_, '_>) {}
}

/// Emits each report as `debug` tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PairObserver for TracingObserver {
    fn observe(&self, report: &PairReport<'_, '_>) {
        let source = report.source.name;
        let target = report.target.name;

        tracing::debug!(source, target, "Analyzing uniqueness");

        for (index, category) in report.categories.iter().enumerate() {
            let shared = report.shared_cards(index);
            if shared.is_empty() {
                continue;
            }
            for card in &shared {
                tracing::debug!(
                    source,
                    target,
                    category = category.as_str(),
                    card = card.name,
                    "used by {:.1}% of commanders, uniqueness {:.3}",
                    card.frequency * 100.0,
                    card.uniqueness
                );
            }
            let uniqueness = report
                .score
                .categories
                .get(index)
                .map_or(0.0, |c| c.uniqueness);
            tracing::debug!(
                source,
                target,
                category = category.as_str(),
                shared = shared.len(),
                "Category uniqueness score: {:.3}",
                uniqueness
            );
        }

        match (report.source_tribes, report.target_tribes) {
            (Some(t1), Some(t2)) => {
                let top1: Vec<&str> = t1.top(report.tribe_top_n).iter().map(|(t, _)| *t).collect();
                let top2: Vec<&str> = t2.top(report.tribe_top_n).iter().map(|(t, _)| *t).collect();
                tracing::debug!(source, target, ?top1, ?top2, "Top tribes");

                for m in report.tribe_matches() {
                    tracing::debug!(
                        source,
                        target,
                        tribe = m.tribe,
                        "positions {} and {}, score {:.3}",
                        m.position1 + 1,
                        m.position2 + 1,
                        m.score
                    );
                }
            }
            _ => tracing::debug!(source, target, "No tribe data for one or both commanders"),
        }

        tracing::debug!(
            source,
            target,
            "Tribes weight {:.3}, simplified {:.3}, composite {:.3}",
            report.score.tribes_weight,
            report.score.tribes_simplified_weight,
            report.score.composite_weight
        );
    }
}
