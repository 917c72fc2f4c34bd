//! Metric modules for commander pair scoring
//!
//! Each metric is implemented in its own module:
//! - `overlap`: raw and color-normalized card overlap per category
//! - `uniqueness`: global card frequencies and shared-card uniqueness
//! - `tribes`: tribe normalization and both tribal similarity variants

pub mod overlap;
pub mod uniqueness;
pub mod tribes;

// Re-export metric functions
pub use overlap::{calculate_normalized_overlap, calculate_overlap, possible_overlap, raw_overlap, shared_colors, OverlapResult};
pub use uniqueness::{calculate_card_frequencies, calculate_uniqueness_weight, shared_card_usage, CardFrequencies, SharedCard};
pub use tribes::{
    calculate_tribes_simplified_weight, calculate_tribes_weight, normalize_tribe_counts,
    position_weights, top_tribe_matches, tribes_simplified_weight_between, tribes_weight_between,
    NormalizedTribes, TribeMatch, TribeWeights,
};
