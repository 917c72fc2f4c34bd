//! Commander Graph
//!
//! Pairwise similarity graph between Commander decks, built from per-commander
//! card lists, card color identities and tribal theme counts.
//!
//! Module layout:
//! - `data`: commander dataset and card metadata loading
//! - `config`: scoring parameters and pipeline locations
//! - `utils/`: ratios and rounding, card usage counting, resolved card lists
//! - `metrics/`: overlap, uniqueness and tribal similarity
//! - `scorer`: pair loop composing edge records (sequential and Rayon)
//! - `graph`: node and edge records
//! - `diagnostics`, `report`: debug-pair observers and run summaries
//! - `output`: JSON result files

pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod output;
pub mod report;
pub mod scorer;
pub mod utils;

// Re-export commonly used types
pub use config::{PipelineConfig, ScoringConfig, CARD_CATEGORIES};
pub use data::{CardMetadataTable, ColorIdentity, CommanderDataset, CommanderRecord};
pub use diagnostics::{NoopObserver, PairObserver, PairReport, TracingObserver};
pub use error::ConfigError;
pub use graph::{process_nodes, CategoryMap, EdgeRecord, NodeRecord};
pub use metrics::*;
pub use output::{load_results, save_results};
pub use scorer::{GraphScorer, PairScore};
