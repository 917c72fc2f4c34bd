//! Pipeline and Scoring Configuration
//!
//! Two layers:
//! - `ScoringConfig`: immutable scoring parameters (categories, blend weights,
//!   tribe ranking parameters, rounding, diagnostics selection). Passed
//!   explicitly into every component. Optionally loaded from a JSON file.
//! - `PipelineConfig`: file locations and run mode, read from environment
//!   variables by the `prepare_viz_data` binary.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Card categories compared between commanders, in display order
pub const CARD_CATEGORIES: [&str; 10] = [
    "High Synergy Cards",
    "New Cards",
    "Creatures",
    "Instants",
    "Sorceries",
    "Enchantments",
    "Mana Artifacts",
    "Planeswalkers",
    "Utility Lands",
    "Lands",
];

/// Format staples reported after the frequency pass
pub const EXAMPLE_CARDS: [&str; 3] = ["Sol Ring", "Chatterstorm", "Arcane Signet"];

pub const DEFAULT_TRIBE_TOP_N: usize = 3;
pub const DEFAULT_POSITION_DECAY: f64 = 0.85;

/// Scoring parameters shared by every pair comparison
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Categories to compare, in output order
    pub categories: Vec<String>,
    /// Weight of the color-normalized overlap in the composite score
    pub overlap_blend: f64,
    /// Weight of the average uniqueness in the composite score
    pub uniqueness_blend: f64,
    /// Number of top tribes ranked per commander (simplified tribe weight)
    pub tribe_top_n: usize,
    /// Positional decay for ranked tribes, strictly inside (0, 1)
    pub tribe_position_decay: f64,
    /// Decimal places kept in serialized edge weights
    pub precision: u32,
    /// Commander pairs that get per-card diagnostics (either orientation)
    pub debug_pairs: Vec<(String, String)>,
    /// Cards whose usage is reported after the frequency pass
    pub example_cards: Vec<String>,
    /// Progress is logged every N outer commanders
    pub progress_interval: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            categories: CARD_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            overlap_blend: 0.5,
            uniqueness_blend: 0.5,
            tribe_top_n: DEFAULT_TRIBE_TOP_N,
            tribe_position_decay: DEFAULT_POSITION_DECAY,
            precision: 3,
            debug_pairs: vec![
                ("The Ur-Dragon".to_string(), "Tiamat".to_string()),
                (
                    "Atraxa, Praetors' Voice".to_string(),
                    "Vorinclex, Monstrous Raider".to_string(),
                ),
            ],
            example_cards: EXAMPLE_CARDS.iter().map(|c| c.to_string()).collect(),
            progress_interval: 10,
        }
    }
}

impl ScoringConfig {
    /// Load scoring parameters from a JSON file; absent fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scoring config: {:?}", path))?;

        let config: ScoringConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse scoring config JSON: {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject parameter sets that would push scores outside [0, 1]
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        if self.tribe_top_n == 0 {
            return Err(ConfigError::InvalidTopN);
        }
        let decay = self.tribe_position_decay;
        if !(decay > 0.0 && decay < 1.0) {
            return Err(ConfigError::InvalidDecay(decay));
        }
        let (overlap, uniqueness) = (self.overlap_blend, self.uniqueness_blend);
        if overlap < 0.0 || uniqueness < 0.0 || ((overlap + uniqueness) - 1.0).abs() > 1e-9 {
            return Err(ConfigError::InvalidBlendWeights { overlap, uniqueness });
        }
        if self.precision > 12 {
            return Err(ConfigError::InvalidPrecision(self.precision));
        }
        Ok(())
    }

    pub fn is_debug_pair(&self, a: &str, b: &str) -> bool {
        self.debug_pairs
            .iter()
            .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }
}

/// File locations and run mode for the batch binary
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub commander_data: PathBuf,
    pub card_metadata: PathBuf,
    pub output_dir: PathBuf,
    pub scoring: ScoringConfig,
    pub parallel: bool,
}

impl PipelineConfig {
    /// Build configuration from environment variables
    ///
    /// - `DATA_DIR`: base directory for relative defaults (default `.`)
    /// - `COMMANDER_DATA`: commander dataset JSON
    /// - `CARD_METADATA`: newline-delimited card printings
    /// - `OUTPUT_DIR`: where nodes.json / edges.json are written
    /// - `SCORING_CONFIG`: optional scoring parameter JSON
    /// - `PARALLEL`: `1` or `true` to use the rayon pair loop
    pub fn from_env() -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        Self::from_lookup(lookup)
    }

    /// Same as `from_env` with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| ".".to_string()));

        let resolve = |key: &str, default: &str| -> PathBuf {
            lookup(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(default))
        };

        let scoring = match lookup("SCORING_CONFIG") {
            Some(path) => ScoringConfig::load(Path::new(&path))?,
            None => ScoringConfig::default(),
        };

        let parallel = lookup("PARALLEL")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            commander_data: resolve("COMMANDER_DATA", "extracted_commander_data.json"),
            card_metadata: resolve("CARD_METADATA", "default-cards-20241223222017.json"),
            output_dir: resolve("OUTPUT_DIR", "viz_data"),
            scoring,
            parallel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.categories.len(), 10);
        assert_eq!(config.tribe_top_n, 3);
        assert_eq!(config.categories[0], "High Synergy Cards");
        assert_eq!(config.categories[9], "Lands");
    }

    #[test]
    fn test_decay_bounds_are_exclusive() {
        let mut config = ScoringConfig::default();
        config.tribe_position_decay = 1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidDecay(1.0)));
        config.tribe_position_decay = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidDecay(0.0)));
    }

    #[test]
    fn test_blend_weights_must_sum_to_one() {
        let mut config = ScoringConfig::default();
        config.overlap_blend = 0.7;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBlendWeights { .. })
        ));
        config.uniqueness_blend = 0.3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{ "tribe_top_n": 5, "debug_pairs": [] }"#).unwrap();
        assert_eq!(config.tribe_top_n, 5);
        assert!(config.debug_pairs.is_empty());
        assert_eq!(config.tribe_position_decay, DEFAULT_POSITION_DECAY);
        assert_eq!(config.categories.len(), 10);
    }

    #[test]
    fn test_debug_pair_matches_either_orientation() {
        let config = ScoringConfig::default();
        assert!(config.is_debug_pair("Tiamat", "The Ur-Dragon"));
        assert!(config.is_debug_pair("The Ur-Dragon", "Tiamat"));
        assert!(!config.is_debug_pair("Tiamat", "Atraxa, Praetors' Voice"));
    }

    #[test]
    fn test_pipeline_config_from_lookup() {
        let vars: HashMap<&str, &str> = [("DATA_DIR", "/data"), ("PARALLEL", "true")]
            .into_iter()
            .collect();
        let config = PipelineConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.commander_data, PathBuf::from("/data/extracted_commander_data.json"));
        assert_eq!(config.output_dir, PathBuf::from("/data/viz_data"));
        assert!(config.parallel);
    }
}
