use std::sync::Arc;

use serde_json::Value;

use crate::constants::rules::{
    META_FLIPPED_TOKEN, META_MUTATION, META_ORIGINAL_TOKEN, META_SUFFIX_CHANGED,
};
use crate::data::{PositiveRecord, RuleCandidate, RuleMetadata};
use crate::utils::{replace_span, word_spans};

use super::{Lexicon, RuleGenerator};

/// R7: gender-agreement violation on adjective modifiers.
///
/// Flips a paired agreement ending (`lu<->lo`, `tu<->to`) on an adjective
/// that sits in NP context, i.e. next to a noun-like token (`pixka-lu
/// chixra` -> `pixka-lo chixra`). The precondition is narrow, which is why
/// this rule fires rarely.
pub struct GenderAgreementFlip {
    lexicon: Arc<Lexicon>,
}

impl GenderAgreementFlip {
    /// Build the rule over a shared lexicon.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    fn flip_for(&self, token_lower: &str) -> Option<(&str, &str)> {
        for pair in &self.lexicon.agreement_pairs {
            if token_lower.ends_with(pair.masc.as_str()) {
                return Some((pair.masc.as_str(), pair.fem.as_str()));
            }
            if token_lower.ends_with(pair.fem.as_str()) {
                return Some((pair.fem.as_str(), pair.masc.as_str()));
            }
        }
        None
    }
}

impl RuleGenerator for GenderAgreementFlip {
    fn apply(&self, record: &PositiveRecord, _salt: u64) -> Option<RuleCandidate> {
        let spans = word_spans(&record.target_text);
        let lowered: Vec<String> = spans.iter().map(|span| span.text.to_lowercase()).collect();

        for (idx, token_lower) in lowered.iter().enumerate() {
            let Some((suffix, flipped_suffix)) = self.flip_for(token_lower) else {
                continue;
            };
            let Some(cut) = token_lower.len().checked_sub(suffix.len()) else {
                continue;
            };
            let stem = token_lower[..cut].trim_end_matches('-');
            if stem.chars().count() < 2 || !self.lexicon.is_adjective_stem(stem) {
                continue;
            }

            let left = idx.checked_sub(1).map(|prev| lowered[prev].as_str());
            let right = lowered.get(idx + 1).map(String::as_str);
            let in_np = right.is_some_and(|tok| self.lexicon.looks_like_noun(tok))
                || left.is_some_and(|tok| self.lexicon.looks_like_noun(tok));
            if !in_np {
                continue;
            }

            // flip on the original token so stem spelling and casing survive
            let original = spans[idx].text;
            let cut_original = original.len().checked_sub(suffix.len())?;
            if !original.is_char_boundary(cut_original) {
                continue;
            }
            let flipped = format!("{}{}", &original[..cut_original], flipped_suffix);
            let negative_text = replace_span(&record.target_text, &spans[idx], &flipped);
            if negative_text == record.target_text {
                continue;
            }

            let mut metadata = RuleMetadata::new();
            metadata.insert(
                META_MUTATION.to_string(),
                Value::from("gender_agreement_flip"),
            );
            metadata.insert(META_ORIGINAL_TOKEN.to_string(), Value::from(original));
            metadata.insert(META_FLIPPED_TOKEN.to_string(), Value::from(flipped.as_str()));
            metadata.insert(META_SUFFIX_CHANGED.to_string(), Value::from(suffix));
            return Some(RuleCandidate {
                negative_text,
                metadata,
            });
        }
        None
    }
}
