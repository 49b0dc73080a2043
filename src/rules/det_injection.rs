use std::sync::Arc;

use rand::Rng;
use serde_json::Value;

use crate::constants::rules::{
    META_ANCHOR_TOKEN, META_INSERTED_TOKEN, META_MUTATION, META_TOKEN_POSITION,
};
use crate::data::{PositiveRecord, RuleCandidate, RuleMetadata};
use crate::rng::DeterministicRng;
use crate::utils::word_spans;

use super::{Lexicon, RuleGenerator};

/// R8: Spanish determiner interference.
///
/// Injects a Spanish determiner directly in front of the first noun-like
/// token of the Yine target (`numa chixra` -> `la numa chixra`), simulating
/// ES->Yine transfer. Targets that already carry a Spanish determiner are
/// skipped to avoid double interference. Nearly every sentence has a noun,
/// which is why this rule dominates the yield.
///
/// The determiner choice is the rule's only site decision and is driven
/// entirely by the salt threaded in from the engine.
pub struct DeterminerInjection {
    lexicon: Arc<Lexicon>,
}

impl DeterminerInjection {
    /// Build the rule over a shared lexicon.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }
}

impl RuleGenerator for DeterminerInjection {
    fn apply(&self, record: &PositiveRecord, salt: u64) -> Option<RuleCandidate> {
        if self.lexicon.spanish_determiners.is_empty() {
            return None;
        }
        let text = record.target_text.as_str();
        let spans = word_spans(text);
        if spans
            .iter()
            .any(|span| self.lexicon.is_spanish_determiner(&span.text.to_lowercase()))
        {
            return None;
        }
        let (position, anchor) = spans
            .iter()
            .enumerate()
            .find(|(_, span)| self.lexicon.looks_like_noun(&span.text.to_lowercase()))?;

        let mut rng = DeterministicRng::new(salt);
        let choice = rng.random_range(0..self.lexicon.spanish_determiners.len());
        let determiner = self.lexicon.spanish_determiners[choice].as_str();

        let mut negative_text = String::with_capacity(text.len() + determiner.len() + 1);
        negative_text.push_str(&text[..anchor.start]);
        negative_text.push_str(determiner);
        negative_text.push(' ');
        negative_text.push_str(&text[anchor.start..]);

        let mut metadata = RuleMetadata::new();
        metadata.insert(
            META_MUTATION.to_string(),
            Value::from("determiner_injection"),
        );
        metadata.insert(META_INSERTED_TOKEN.to_string(), Value::from(determiner));
        metadata.insert(META_ANCHOR_TOKEN.to_string(), Value::from(anchor.text));
        metadata.insert(META_TOKEN_POSITION.to_string(), Value::from(position as u64));
        Some(RuleCandidate {
            negative_text,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splits::SplitLabel;

    fn record(target: &str) -> PositiveRecord {
        PositiveRecord {
            pair_id: "p1".to_string(),
            source_text: "la casa".to_string(),
            target_text: target.to_string(),
            split: SplitLabel::Train,
        }
    }

    fn rule() -> DeterminerInjection {
        DeterminerInjection::new(Arc::new(Lexicon::default()))
    }

    #[test]
    fn injects_before_the_first_noun() {
        let lexicon = Lexicon::default();
        let candidate = rule().apply(&record("numa chixra"), 11).unwrap();
        let inserted = candidate
            .metadata
            .get(META_INSERTED_TOKEN)
            .and_then(Value::as_str)
            .unwrap();
        assert!(lexicon.is_spanish_determiner(inserted));
        assert_eq!(
            candidate.negative_text,
            format!("{inserted} numa chixra")
        );
        assert_eq!(
            candidate.metadata.get(META_ANCHOR_TOKEN).unwrap(),
            &Value::from("numa")
        );
    }

    #[test]
    fn skips_targets_already_carrying_interference() {
        assert!(rule().apply(&record("la numa chixra"), 11).is_none());
    }

    #[test]
    fn requires_a_noun_anchor() {
        assert!(rule().apply(&record("wa wane ga"), 11).is_none());
    }

    #[test]
    fn same_salt_same_choice() {
        let first = rule().apply(&record("numa chixra"), 5);
        let second = rule().apply(&record("numa chixra"), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn injection_lands_mid_sentence_when_the_noun_does() {
        let candidate = rule().apply(&record("wane numa"), 3).unwrap();
        let inserted = candidate
            .metadata
            .get(META_INSERTED_TOKEN)
            .and_then(Value::as_str)
            .unwrap();
        assert_eq!(candidate.negative_text, format!("wane {inserted} numa"));
    }
}
