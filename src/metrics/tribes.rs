//! METRIC: TRIBAL SIMILARITY
//!
//! Commanders carry a list of tribal themes with the number of decks built
//! around each. Counts are first normalized per commander so commanders with
//! very different deck volumes can be compared:
//!
//! Example (Ur-Dragon):
//!   Dragons 8,000 / 5-color 2,000 / Tribal 1,000 → total 11,000
//!   weights 0.727 / 0.182 / 0.091
//!
//! Two pair scores are derived from the normalized table:
//!
//! **tribes_weight** (strongest shared theme):
//!   for each tribe both commanders know, similarity = min(w1, w2);
//!   score = max over shared tribes. A shared theme is only as strong as its
//!   weaker participant, and the single strongest shared theme decides.
//!
//! **tribes_simplified_weight** (position-matched top N):
//!   rank each commander's tribes by weight and keep the top N. Slot i weighs
//!   decay^i. Each tribe present in both top-N lists contributes the average
//!   of its two slot weights; the sum is divided by Σ decay^i over all N slots.
//!   Tribe weights themselves do not enter the score, only ranks do.
//!
//!   decay = 0.85:  #1 1.000   #2 0.850   #3 0.723
//!
//! Both scores are 0 when either commander has no tribe data.

use crate::data::CommanderDataset;
use crate::utils::safe_ratio;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// One commander's tribe distribution, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TribeWeights {
    entries: Vec<(String, f64)>,
}

impl TribeWeights {
    pub fn get(&self, tribe: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == tribe)
            .map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, w)| (name.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest-weighted `top_n` tribes; ties keep input order
    pub fn top(&self, top_n: usize) -> SmallVec<[(&str, f64); 8]> {
        let mut ranked: SmallVec<[(&str, f64); 8]> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(top_n);
        ranked
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TribeWeights {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(name, w)| (name.into(), w)).collect(),
        }
    }
}

/// Commander → tribe distribution; commanders without tribe data are absent
#[derive(Debug, Clone, Default)]
pub struct NormalizedTribes {
    table: FxHashMap<String, TribeWeights>,
}

impl NormalizedTribes {
    pub fn get(&self, commander: &str) -> Option<&TribeWeights> {
        self.table.get(commander)
    }

    pub fn contains(&self, commander: &str) -> bool {
        self.table.contains_key(commander)
    }

    pub fn insert(&mut self, commander: impl Into<String>, weights: TribeWeights) {
        self.table.insert(commander.into(), weights);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Normalize tribe counts for each commander by their total tribal deck count
///
/// Commanders are skipped when the record is missing, carries no tribes, or
/// the counts sum to zero. Repeated tribe names are merged.
pub fn normalize_tribe_counts(dataset: &CommanderDataset) -> NormalizedTribes {
    let mut normalized = NormalizedTribes::default();

    for (commander, record) in dataset.records() {
        let Some(tribes) = record.tribes.as_ref() else {
            continue;
        };

        let mut merged: Vec<(&str, u64)> = Vec::with_capacity(tribes.len());
        for tribe in tribes {
            match merged.iter_mut().find(|(name, _)| *name == tribe.name) {
                Some((_, count)) => *count += tribe.count,
                None => merged.push((tribe.name.as_str(), tribe.count)),
            }
        }

        let total_tribal_decks: u64 = merged.iter().map(|(_, count)| count).sum();
        if total_tribal_decks == 0 {
            continue;
        }

        let weights: TribeWeights = merged
            .into_iter()
            .map(|(name, count)| (name, count as f64 / total_tribal_decks as f64))
            .collect();

        if tracing::enabled!(tracing::Level::DEBUG) {
            let distribution: Vec<String> = weights
                .top(weights.len())
                .iter()
                .map(|(tribe, w)| format!("{}={:.3}", tribe, w))
                .collect();
            tracing::debug!(
                commander,
                total_tribal_decks,
                "Tribe distribution: {}",
                distribution.join(", ")
            );
        }

        normalized.insert(commander, weights);
    }

    normalized
}

/// Strongest shared theme between two distributions
pub fn tribes_weight_between(tribes1: &TribeWeights, tribes2: &TribeWeights) -> f64 {
    tribes1
        .iter()
        .filter_map(|(tribe, w1)| tribes2.get(tribe).map(|w2| w1.min(w2)))
        .fold(0.0, f64::max)
}

/// Calculate similarity weight based on the strongest shared tribe
pub fn calculate_tribes_weight(cmd1: &str, cmd2: &str, normalized: &NormalizedTribes) -> f64 {
    match (normalized.get(cmd1), normalized.get(cmd2)) {
        (Some(t1), Some(t2)) => tribes_weight_between(t1, t2),
        _ => 0.0,
    }
}

/// decay^i for every ranked slot
pub fn position_weights(top_n: usize, position_decay: f64) -> SmallVec<[f64; 8]> {
    (0..top_n).map(|i| position_decay.powi(i as i32)).collect()
}

/// A tribe found in both commanders' top-N lists
#[derive(Debug, Clone, PartialEq)]
pub struct TribeMatch<'a> {
    pub tribe: &'a str,
    /// 0-indexed rank for the first commander
    pub position1: usize,
    /// 0-indexed rank for the second commander
    pub position2: usize,
    /// Average of the two slot weights
    pub score: f64,
}

/// Tribes shared by both top-N lists, in the first commander's rank order
pub fn top_tribe_matches<'a>(
    tribes1: &'a TribeWeights,
    tribes2: &'a TribeWeights,
    top_n: usize,
    position_decay: f64,
) -> SmallVec<[TribeMatch<'a>; 4]> {
    let weights = position_weights(top_n, position_decay);
    let top2 = tribes2.top(top_n);

    tribes1
        .top(top_n)
        .iter()
        .enumerate()
        .filter_map(|(position1, &(tribe, _))| {
            top2.iter()
                .position(|(other, _)| *other == tribe)
                .map(|position2| TribeMatch {
                    tribe,
                    position1,
                    position2,
                    score: (weights[position1] + weights[position2]) / 2.0,
                })
        })
        .collect()
}

/// Position-matched similarity between two distributions, in [0, 1]
pub fn tribes_simplified_weight_between(
    tribes1: &TribeWeights,
    tribes2: &TribeWeights,
    top_n: usize,
    position_decay: f64,
) -> f64 {
    let max_possible_score: f64 = position_weights(top_n, position_decay).iter().sum();
    let total_score: f64 = top_tribe_matches(tribes1, tribes2, top_n, position_decay)
        .iter()
        .map(|m| m.score)
        .sum();

    safe_ratio(total_score, max_possible_score)
}

/// Calculate tribal similarity from rank matches among the top N tribes
pub fn calculate_tribes_simplified_weight(
    cmd1: &str,
    cmd2: &str,
    normalized: &NormalizedTribes,
    top_n: usize,
    position_decay: f64,
) -> f64 {
    match (normalized.get(cmd1), normalized.get(cmd2)) {
        (Some(t1), Some(t2)) => tribes_simplified_weight_between(t1, t2, top_n, position_decay),
        _ => 0.0,
    }
}
