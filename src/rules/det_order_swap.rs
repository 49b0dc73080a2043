use std::sync::Arc;

use serde_json::Value;

use crate::constants::rules::{
    META_MUTATION, META_ORIGINAL_ORDER, META_SWAPPED_ORDER, MIN_NOUN_CHARS,
};
use crate::data::{PositiveRecord, RuleCandidate, RuleMetadata};
use crate::utils::word_spans;

use super::{Lexicon, RuleGenerator};

/// R6: NP-internal determiner order violation.
///
/// Finds a Yine determiner immediately followed by a noun and swaps the two
/// tokens (`eklu chixra` -> `chixra eklu`), preserving everything between
/// and around them. No determiner-noun adjacency means no candidate.
pub struct DeterminerOrderSwap {
    lexicon: Arc<Lexicon>,
}

impl DeterminerOrderSwap {
    /// Build the rule over a shared lexicon.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }
}

impl RuleGenerator for DeterminerOrderSwap {
    fn apply(&self, record: &PositiveRecord, _salt: u64) -> Option<RuleCandidate> {
        let text = record.target_text.as_str();
        let spans = word_spans(text);
        for window in spans.windows(2) {
            let det = &window[0];
            let noun = &window[1];
            if !self.lexicon.is_yine_determiner(&det.text.to_lowercase()) {
                continue;
            }
            let noun_lower = noun.text.to_lowercase();
            if noun_lower.chars().count() < MIN_NOUN_CHARS
                || !self.lexicon.looks_like_noun(&noun_lower)
            {
                continue;
            }

            let mut negative_text = String::with_capacity(text.len());
            negative_text.push_str(&text[..det.start]);
            negative_text.push_str(noun.text);
            negative_text.push_str(&text[det.end..noun.start]);
            negative_text.push_str(det.text);
            negative_text.push_str(&text[noun.end..]);
            if negative_text == text {
                continue;
            }

            let mut metadata = RuleMetadata::new();
            metadata.insert(META_MUTATION.to_string(), Value::from("np_det_swap"));
            metadata.insert(
                META_ORIGINAL_ORDER.to_string(),
                Value::from(format!("{} {}", det.text, noun.text)),
            );
            metadata.insert(
                META_SWAPPED_ORDER.to_string(),
                Value::from(format!("{} {}", noun.text, det.text)),
            );
            return Some(RuleCandidate {
                negative_text,
                metadata,
            });
        }
        None
    }
}
