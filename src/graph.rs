//! Graph records written for the visualization front end
//!
//! Nodes are one summary per commander; edges carry every pair metric plus
//! the per-category breakdowns. Per-category maps serialize as JSON objects in
//! the configured category order, not hash order.

use crate::config::ScoringConfig;
use crate::data::CommanderDataset;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Category → value, kept in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for CategoryMap<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> CategoryMap<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, category: impl Into<String>, value: T) {
        self.entries.push((category.into(), value));
    }

    pub fn get(&self, category: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, T> FromIterator<(S, T)> for CategoryMap<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<T: Serialize> Serialize for CategoryMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, value) in &self.entries {
            map.serialize_entry(category, value)?;
        }
        map.end()
    }
}

struct CategoryMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for CategoryMapVisitor<T> {
    type Value = CategoryMap<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of category name to value")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = CategoryMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((category, value)) = access.next_entry::<String, T>()? {
            map.push(category, value);
        }
        Ok(map)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for CategoryMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CategoryMapVisitor(PhantomData))
    }
}

/// One commander in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    /// Null when the dataset omits it
    pub deck_count: Option<u64>,
    pub rank: Option<i64>,
    /// Commander color identity as listed in the dataset
    pub colors: Vec<String>,
    /// Listed cards per category (duplicates included)
    pub card_counts: CategoryMap<usize>,
}

/// Similarity between two commanders
///
/// All weights lie in [0, 1] and are rounded before serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    /// Shared cards over the smaller commander's total card count
    pub raw_weight: f64,
    /// Mean color-normalized overlap across categories
    pub normalized_weight: f64,
    /// Mean shared-card uniqueness across categories
    pub uniqueness_weight: f64,
    /// Strongest shared tribe
    pub tribes_weight: f64,
    /// Position-matched top-N tribes
    pub tribes_simplified_weight: f64,
    /// Blend of normalized_weight and uniqueness_weight
    pub composite_weight: f64,
    pub raw_overlaps: CategoryMap<usize>,
    pub normalized_overlaps: CategoryMap<f64>,
    pub uniqueness_scores: CategoryMap<f64>,
}

/// Build one node per commander with data, in dataset order
pub fn process_nodes(dataset: &CommanderDataset, config: &ScoringConfig) -> Vec<NodeRecord> {
    let nodes: Vec<NodeRecord> = dataset
        .records()
        .map(|(commander, record)| NodeRecord {
            id: commander.to_string(),
            deck_count: record.deck_count,
            rank: record.rank,
            colors: record.color_identity.clone(),
            card_counts: config
                .categories
                .iter()
                .map(|category| (category.as_str(), record.cards(category).len()))
                .collect(),
        })
        .collect();

    tracing::info!(nodes = nodes.len(), "Processed nodes");
    nodes
}
