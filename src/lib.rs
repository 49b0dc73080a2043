#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Engine configuration types.
pub mod config;
/// Centralized constants used across rules, engine, hashing, and export.
pub mod constants;
/// Positive corpus loading, validation, and freezing.
pub mod corpus;
/// Record and sample payload types.
pub mod data;
/// The ratio-bounded deterministic sampling engine.
pub mod engine;
/// Reusable CLI runners shared by the demo binaries.
pub mod example_apps;
/// Persistence collaborators (JSONL, Parquet, stats, manifests).
pub mod export;
/// Stable content hashing for pair ids and salts.
pub mod hash;
/// Rule catalog with stable declaration order.
pub mod registry;
/// Run reports and aggregate yield metrics.
pub mod report;
/// The four Spanish-Yine perturbation rules and their lexicon.
pub mod rules;
/// Train/dev/test split assignment helpers.
pub mod splits;
/// Shared type aliases.
pub mod types;
/// Tokenization helpers shared by the rule generators.
pub mod utils;

mod errors;
mod rng;

pub use config::{EngineConfig, QuotaRange};
pub use corpus::{CorpusColumns, PositiveCorpus, RawPair, freeze_pairs, read_positive_parquet};
pub use data::{
    NegativeSample, PositiveRecord, RuleCandidate, RuleMetadata, RuleSpec, Severity, ViolationType,
};
pub use engine::{SamplingEngine, SamplingRun};
pub use errors::NegativeError;
pub use registry::RuleRegistry;
pub use report::{NegativeStats, RuleShare, RuleSkew, SamplingReport, rule_skew};
pub use rules::{AgreementPair, Lexicon, RuleGenerator};
pub use splits::{SplitLabel, SplitRatios, assign_splits};
pub use types::{OriginTag, PairId, RuleId};
