use std::sync::Arc;

use serde_json::Value;

use crate::constants::rules::{
    META_MUTATION, META_ORIGINAL_TOKEN, META_REMOVED_SUFFIX, META_TOKEN_POSITION, MIN_STEM_CHARS,
};
use crate::data::{PositiveRecord, RuleCandidate, RuleMetadata};
use crate::utils::{replace_span, word_spans};

use super::{Lexicon, RuleGenerator};

/// R4: omission of an obligatory possessive-state suffix.
///
/// Scans the Yine target for a noun carrying one of the possessive-state
/// suffixes and strips it, leaving the stem intact (`wane numa-tu` ->
/// `wane numa`). Sentences without a possessive-marked noun yield nothing;
/// that narrow gate keeps this rule's yield comparatively low.
pub struct PossessiveSuffixOmission {
    lexicon: Arc<Lexicon>,
}

impl PossessiveSuffixOmission {
    /// Build the rule over a shared lexicon.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }
}

impl RuleGenerator for PossessiveSuffixOmission {
    fn apply(&self, record: &PositiveRecord, _salt: u64) -> Option<RuleCandidate> {
        let spans = word_spans(&record.target_text);
        for (position, span) in spans.iter().enumerate() {
            let lower = span.text.to_lowercase();
            for suffix in &self.lexicon.possessive_suffixes {
                if !lower.ends_with(suffix.as_str()) {
                    continue;
                }
                let cut = span.text.len().checked_sub(suffix.len())?;
                if !span.text.is_char_boundary(cut) {
                    continue;
                }
                let stem = &span.text[..cut];
                let core = stem.trim_end_matches('-');
                if core.chars().count() < MIN_STEM_CHARS {
                    continue;
                }
                // agreement endings on adjectives belong to the flip rule
                if !self.lexicon.adjective_stems.is_empty()
                    && self
                        .lexicon
                        .adjective_stems
                        .iter()
                        .any(|adj| adj == &core.to_lowercase())
                {
                    continue;
                }
                let negative_text = replace_span(&record.target_text, span, stem);
                if negative_text == record.target_text {
                    continue;
                }
                let mut metadata = RuleMetadata::new();
                metadata.insert(META_MUTATION.to_string(), Value::from("pssd_omission"));
                metadata.insert(
                    META_REMOVED_SUFFIX.to_string(),
                    Value::from(suffix.as_str()),
                );
                metadata.insert(META_ORIGINAL_TOKEN.to_string(), Value::from(span.text));
                metadata.insert(META_TOKEN_POSITION.to_string(), Value::from(position as u64));
                return Some(RuleCandidate {
                    negative_text,
                    metadata,
                });
            }
        }
        None
    }
}
