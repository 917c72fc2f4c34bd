//! Utility modules for commander scoring
//!
//! Contains shared functionality used across multiple metrics:
//! - Normalization: guarded ratios, category means, output rounding
//! - Card counting: per-card commander usage for the frequency table
//! - Card lists: category extraction and precomputed commander profiles

pub mod normalization;
pub mod card_counter;
pub mod card_lists;

// Re-export commonly used types
pub use normalization::{mean_over, normalize_raw_weight, round_to, safe_ratio};
pub use card_counter::count_card_usage;
pub use card_lists::{cards_from_category, CategoryCards, CommanderProfile};
