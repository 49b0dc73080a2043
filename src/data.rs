use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::NegativeError;
use crate::splits::SplitLabel;
use crate::types::{PairId, RuleId};

/// Free-form rule detail attached to each negative, e.g. which suffix was
/// stripped and where.
pub type RuleMetadata = Map<String, Value>;

/// One clean, aligned (Spanish, Yine) sentence pair. Produced upstream with
/// a frozen id and split; never mutated here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositiveRecord {
    /// Stable opaque identifier, unique across the whole positive corpus.
    pub pair_id: PairId,
    /// Spanish sentence.
    pub source_text: String,
    /// Gold Yine sentence.
    pub target_text: String,
    /// Split inherited unchanged by any negative derived from this record.
    pub split: SplitLabel,
}

/// Linguistic category of the violation a rule simulates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Morpheme-level violation (suffix omission, agreement flip).
    #[serde(rename = "morphological")]
    Morphological,
    /// Constituent-order violation inside a noun phrase.
    #[serde(rename = "syntactic")]
    Syntactic,
    /// Source-language material leaking into the target.
    #[serde(rename = "lexical-contrastive")]
    LexicalContrastive,
}

impl ViolationType {
    /// Canonical serialized name.
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationType::Morphological => "morphological",
            ViolationType::Syntactic => "syntactic",
            ViolationType::LexicalContrastive => "lexical-contrastive",
        }
    }

    /// Parse a serialized violation name.
    pub fn parse(value: &str) -> Result<Self, NegativeError> {
        match value {
            "morphological" => Ok(ViolationType::Morphological),
            "syntactic" => Ok(ViolationType::Syntactic),
            "lexical-contrastive" => Ok(ViolationType::LexicalContrastive),
            other => Err(NegativeError::Corpus {
                reason: format!("unknown violation type '{other}'"),
            }),
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative severity grade, mapped onto a fixed numeric weight for
/// downstream consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Structure-breaking violations.
    High,
    /// Interference violations a reader could still parse around.
    Medium,
}

impl Severity {
    /// Numeric weight serialized into `NegativeSample::severity`.
    pub fn weight(self) -> f32 {
        match self {
            Severity::High => 1.0,
            Severity::Medium => 0.5,
        }
    }
}

/// Static description of one perturbation rule. One per rule, never mutated
/// at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSpec {
    /// Unique short code, e.g. `R4`.
    pub rule_id: &'static str,
    /// Violation category.
    pub violation_type: ViolationType,
    /// Qualitative severity grade.
    pub severity: Severity,
}

/// Candidate perturbation returned by a generator, before engine acceptance.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleCandidate {
    /// The corrupted target sentence.
    pub negative_text: String,
    /// Rule-specific detail (stripped morpheme, swapped order, ...).
    pub metadata: RuleMetadata,
}

/// One accepted corrupted row. Created exactly once at generation time and
/// never mutated; the set of these rows is the engine's sole output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NegativeSample {
    /// Id of the positive this row was derived from.
    pub pair_id: PairId,
    /// Spanish sentence, copied from the positive.
    pub source_text: String,
    /// Gold Yine sentence, copied from the positive.
    pub target_text: String,
    /// The corrupted Yine sentence.
    pub negative_text: String,
    /// Rule that produced the corruption.
    pub rule_id: RuleId,
    /// Violation category of that rule.
    pub violation_type: ViolationType,
    /// Numeric severity weight of that rule.
    pub severity: f32,
    /// Rule-specific detail.
    pub metadata: RuleMetadata,
    /// Split copied from the positive.
    pub split: SplitLabel,
}

impl NegativeSample {
    /// The sole uniqueness key across the whole output set. Two different
    /// rules may legitimately produce identical text for the same pair.
    pub fn dedup_key(&self) -> (PairId, RuleId, String) {
        (
            self.pair_id.clone(),
            self.rule_id.clone(),
            self.negative_text.clone(),
        )
    }
}
