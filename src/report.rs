//! Run summaries logged by the batch pipeline
//!
//! - Example card usage after the frequency pass
//! - Distribution of nonzero tribe weights across the final edges

use crate::graph::EdgeRecord;
use crate::metrics::uniqueness::CardFrequencies;
use std::fmt;

/// Usage share of each example card, in percent
pub fn example_frequencies<'c>(
    frequencies: &CardFrequencies,
    cards: &'c [String],
) -> Vec<(&'c str, f64)> {
    let usage: Vec<(&str, f64)> = cards
        .iter()
        .map(|card| (card.as_str(), frequencies.get(card) * 100.0))
        .collect();

    for (card, percent) in &usage {
        tracing::info!("{}: Used in {:.1}% of all commanders", card, percent);
    }
    usage
}

/// Upper bounds of the tribe weight buckets
const BUCKET_BOUNDS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];
const BUCKET_LABELS: [&str; 5] = ["0.0-0.2", "0.2-0.4", "0.4-0.6", "0.6-0.8", "0.8-1.0"];

/// Histogram of nonzero edge tribes_weight values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TribeWeightDistribution {
    /// Counts for (0,0.2], (0.2,0.4], (0.4,0.6], (0.6,0.8], (0.8,1.0]
    pub buckets: [usize; 5],
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl TribeWeightDistribution {
    pub fn from_edges(edges: &[EdgeRecord]) -> Self {
        Self::from_weights(edges.iter().map(|e| e.tribes_weight))
    }

    /// Zero weights are ignored
    pub fn from_weights(weights: impl IntoIterator<Item = f64>) -> Self {
        let mut distribution = Self::default();

        for weight in weights.into_iter().filter(|w| *w > 0.0) {
            let bucket = BUCKET_BOUNDS
                .iter()
                .position(|bound| weight <= *bound)
                .unwrap_or(BUCKET_BOUNDS.len() - 1);
            distribution.buckets[bucket] += 1;
            distribution.min = Some(distribution.min.map_or(weight, |m| m.min(weight)));
            distribution.max = Some(distribution.max.map_or(weight, |m| m.max(weight)));
        }

        distribution
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Log the histogram; nothing when no edge has a tribe weight
    pub fn log(&self) {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            tracing::info!("Tribal weight distribution: {}", self);
            tracing::info!("Min weight: {:.3}", min);
            tracing::info!("Max weight: {:.3}", max);
        }
    }
}

impl fmt::Display for TribeWeightDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = BUCKET_LABELS
            .iter()
            .zip(self.buckets.iter())
            .map(|(label, count)| format!("{}: {}", label, count))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
