//! METRIC: CARD UNIQUENESS (GLOBAL USAGE FREQUENCY)
//!
//! Rewards pairs that share niche cards over pairs that only share format
//! staples.
//!
//! frequency(card)  = commanders listing the card / all commanders
//! uniqueness(card) = 1 − frequency(card)
//!
//! Example:
//! - Sol Ring in 160/200 commanders → frequency 0.8 → uniqueness 0.2
//! - Niche tribal card in 10/200    → frequency 0.05 → uniqueness 0.95
//!
//! The pair score for one category is the mean uniqueness of the cards both
//! commanders list (0 when they share none). Cards missing from the table are
//! treated as maximally unique.

use crate::data::CommanderDataset;
use crate::utils::{count_card_usage, safe_ratio, CategoryCards};
use rustc_hash::FxHashMap;

/// Global per-card usage frequency
#[derive(Debug, Clone, Default)]
pub struct CardFrequencies {
    frequencies: FxHashMap<String, f64>,
    total_commanders: usize,
}

impl CardFrequencies {
    /// Fraction of commanders listing `card`; 0 for unseen cards
    pub fn get(&self, card: &str) -> f64 {
        self.frequencies.get(card).copied().unwrap_or(0.0)
    }

    pub fn uniqueness(&self, card: &str) -> f64 {
        1.0 - self.get(card)
    }

    /// Commander entries the frequencies were computed over
    pub fn total_commanders(&self) -> usize {
        self.total_commanders
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.frequencies.iter().map(|(card, f)| (card.as_str(), *f))
    }
}

impl FromIterator<(String, f64)> for CardFrequencies {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            frequencies: iter.into_iter().collect(),
            total_commanders: 0,
        }
    }
}

/// Calculate how often each card appears across ALL commanders
///
/// The denominator is every entry in the dataset, including entries without
/// data, so frequencies stay comparable with the commander count of the input.
pub fn calculate_card_frequencies(
    dataset: &CommanderDataset,
    categories: &[String],
) -> CardFrequencies {
    let total_commanders = dataset.len();
    let counts = count_card_usage(dataset, categories);

    let frequencies = counts
        .into_iter()
        .map(|(card, count)| {
            (card.to_string(), safe_ratio(count as f64, total_commanders as f64))
        })
        .collect();

    CardFrequencies {
        frequencies,
        total_commanders,
    }
}

/// Average uniqueness of the cards both lists share; 0 when nothing is shared
pub fn calculate_uniqueness_weight(
    cards1: &CategoryCards<'_>,
    cards2: &CategoryCards<'_>,
    frequencies: &CardFrequencies,
) -> f64 {
    let (total, shared) = cards1
        .shared(cards2)
        .fold((0.0, 0usize), |(total, n), card| {
            (total + frequencies.uniqueness(card), n + 1)
        });

    safe_ratio(total, shared as f64)
}

/// A shared card with its usage statistics, for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct SharedCard<'a> {
    pub name: &'a str,
    pub frequency: f64,
    pub uniqueness: f64,
}

/// Per-card breakdown behind `calculate_uniqueness_weight`
pub fn shared_card_usage<'a>(
    cards1: &CategoryCards<'a>,
    cards2: &CategoryCards<'a>,
    frequencies: &CardFrequencies,
) -> Vec<SharedCard<'a>> {
    cards1
        .shared(cards2)
        .map(|name| SharedCard {
            name,
            frequency: frequencies.get(name),
            uniqueness: frequencies.uniqueness(name),
        })
        .collect()
}
