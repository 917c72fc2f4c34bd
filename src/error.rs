//! Typed errors for scoring configuration
//!
//! Data and I/O failures travel as `anyhow::Error` with file context; only the
//! configuration checks that run before any scoring get their own type.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("position decay must lie strictly between 0 and 1 (got {0})")]
    InvalidDecay(f64),

    #[error("top_n must be at least 1")]
    InvalidTopN,

    #[error("blend weights must be non-negative and sum to 1 (overlap {overlap}, uniqueness {uniqueness})")]
    InvalidBlendWeights { overlap: f64, uniqueness: f64 },

    #[error("category list is empty")]
    NoCategories,

    #[error("rounding precision {0} is out of range (0..=12)")]
    InvalidPrecision(u32),
}
