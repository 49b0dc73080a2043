use std::io;

use thiserror::Error;

use crate::types::RuleId;

/// Error type for engine configuration, corpus validation, and persistence
/// failures. Rule inapplicability and duplicate candidates are never errors;
/// they are normal zero-result outcomes absorbed by the engine.
#[derive(Debug, Error)]
pub enum NegativeError {
    /// The negative-to-positive ratio is outside `(0, 1]`.
    #[error("ratio {ratio} is outside (0, 1]")]
    InvalidRatio {
        /// The rejected ratio value.
        ratio: f64,
    },
    /// The per-item quota range is empty or non-positive.
    #[error("quota range [{k_min}, {k_max}] is invalid: bounds must be positive and k_min <= k_max")]
    InvalidQuotaRange {
        /// The rejected lower bound.
        k_min: u32,
        /// The rejected upper bound.
        k_max: u32,
    },
    /// The positive corpus contains no records.
    #[error("positive corpus is empty")]
    EmptyCorpus,
    /// A rule id was requested that is not present in the registry.
    #[error("rule generator not registered: {0}")]
    UnknownRule(RuleId),
    /// The positive corpus failed validation.
    #[error("corpus validation failed: {reason}")]
    Corpus {
        /// What was wrong with the corpus.
        reason: String,
    },
    /// A collaborator input file could not be read or parsed.
    #[error("failed loading '{path}': {reason}")]
    CorpusLoad {
        /// The offending file.
        path: String,
        /// Why it could not be loaded.
        reason: String,
    },
    /// A persistence write failed.
    #[error("export failure: {0}")]
    Export(String),
    /// Split ratios, column mappings, or CLI values were inconsistent.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    #[allow(missing_docs)]
    Io(#[from] io::Error),
}
