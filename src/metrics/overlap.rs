//! METRIC: CARD OVERLAP (RAW AND COLOR-NORMALIZED)
//!
//! Counts cards two commanders share within one category, then normalizes the
//! count by how many shared cards were legally possible.
//!
//! Color identity rules: a deck may only play cards whose color identity fits
//! inside its commander's. Two commanders can therefore only share cards whose
//! identity fits inside the intersection of both commanders' identities. When
//! that intersection is empty, only colorless cards qualify.
//!
//! possible_overlap = min(admissible entries in list 1, admissible entries in list 2)
//! normalized       = raw_overlap / possible_overlap   (0 when nothing is admissible)
//!
//! A mono-red and a mono-blue deck sharing generic artifacts are therefore
//! compared only against their colorless slots, not their whole lists.

use crate::data::ColorIdentity;
use crate::utils::{safe_ratio, CategoryCards};

/// Result of one category comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapResult {
    /// Distinct cards listed by both commanders
    pub raw: usize,
    /// Largest overlap the shared color identity allows
    pub possible: usize,
    /// raw / possible, capped at 1.0
    pub normalized: f64,
}

/// Number of distinct cards present in both lists
pub fn raw_overlap(cards1: &CategoryCards<'_>, cards2: &CategoryCards<'_>) -> usize {
    cards1.shared(cards2).count()
}

/// Colors both commanders may play
pub fn shared_colors(colors1: ColorIdentity, colors2: ColorIdentity) -> ColorIdentity {
    colors1.intersection(colors2)
}

/// Smaller of the two counts of cards that fit the shared identity
///
/// An empty shared identity admits exactly the colorless cards.
pub fn possible_overlap(
    cards1: &CategoryCards<'_>,
    cards2: &CategoryCards<'_>,
    shared: ColorIdentity,
) -> usize {
    cards1
        .count_admissible(shared)
        .min(cards2.count_admissible(shared))
}

/// Calculate raw and color-normalized overlap for one category
pub fn calculate_overlap(
    cards1: &CategoryCards<'_>,
    cards2: &CategoryCards<'_>,
    colors1: ColorIdentity,
    colors2: ColorIdentity,
) -> OverlapResult {
    let raw = raw_overlap(cards1, cards2);
    let possible = possible_overlap(cards1, cards2, shared_colors(colors1, colors2));

    // Lists that break color rules can share more cards than are admissible
    let normalized = safe_ratio(raw as f64, possible as f64).min(1.0);

    OverlapResult {
        raw,
        possible,
        normalized,
    }
}

/// Color-normalized overlap only
pub fn calculate_normalized_overlap(
    cards1: &CategoryCards<'_>,
    cards2: &CategoryCards<'_>,
    colors1: ColorIdentity,
    colors2: ColorIdentity,
) -> f64 {
    calculate_overlap(cards1, cards2, colors1, colors2).normalized
}
