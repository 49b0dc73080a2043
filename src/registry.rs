//! Static rule catalog.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::constants::rules::{
    RULE_DET_INJECTION, RULE_DET_ORDER_SWAP, RULE_GENDER_FLIP, RULE_PSSD_OMISSION,
};
use crate::data::{RuleSpec, Severity, ViolationType};
use crate::errors::NegativeError;
use crate::rules::{
    DeterminerInjection, DeterminerOrderSwap, GenderAgreementFlip, Lexicon,
    PossessiveSuffixOmission, RuleGenerator,
};

struct RegisteredRule {
    spec: RuleSpec,
    generator: Box<dyn RuleGenerator>,
}

/// Read-only catalog mapping rule ids to `(RuleSpec, generator)` in
/// declaration order. Built once, never mutated afterwards, and safe to
/// share across engine workers.
pub struct RuleRegistry {
    rules: IndexMap<&'static str, RegisteredRule>,
}

impl RuleRegistry {
    /// Build the four built-in Spanish-Yine rules over `lexicon`.
    pub fn builtin(lexicon: Lexicon) -> Self {
        let lexicon = Arc::new(lexicon);
        let mut registry = Self {
            rules: IndexMap::new(),
        };
        registry.insert(
            RuleSpec {
                rule_id: RULE_PSSD_OMISSION,
                violation_type: ViolationType::Morphological,
                severity: Severity::High,
            },
            Box::new(PossessiveSuffixOmission::new(Arc::clone(&lexicon))),
        );
        registry.insert(
            RuleSpec {
                rule_id: RULE_DET_ORDER_SWAP,
                violation_type: ViolationType::Syntactic,
                severity: Severity::High,
            },
            Box::new(DeterminerOrderSwap::new(Arc::clone(&lexicon))),
        );
        registry.insert(
            RuleSpec {
                rule_id: RULE_GENDER_FLIP,
                violation_type: ViolationType::Morphological,
                severity: Severity::High,
            },
            Box::new(GenderAgreementFlip::new(Arc::clone(&lexicon))),
        );
        registry.insert(
            RuleSpec {
                rule_id: RULE_DET_INJECTION,
                violation_type: ViolationType::LexicalContrastive,
                severity: Severity::Medium,
            },
            Box::new(DeterminerInjection::new(lexicon)),
        );
        registry
    }

    fn insert(&mut self, spec: RuleSpec, generator: Box<dyn RuleGenerator>) {
        self.rules
            .insert(spec.rule_id, RegisteredRule { spec, generator });
    }

    /// Rule specs in stable declaration order.
    pub fn all_rules(&self) -> impl Iterator<Item = &RuleSpec> {
        self.rules.values().map(|rule| &rule.spec)
    }

    /// `(spec, generator)` pairs in stable declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&RuleSpec, &dyn RuleGenerator)> {
        self.rules
            .values()
            .map(|rule| (&rule.spec, rule.generator.as_ref()))
    }

    /// Generator for `rule_id`; absent ids are a configuration error.
    pub fn get(&self, rule_id: &str) -> Result<&dyn RuleGenerator, NegativeError> {
        self.rules
            .get(rule_id)
            .map(|rule| rule.generator.as_ref())
            .ok_or_else(|| NegativeError::UnknownRule(rule_id.to_string()))
    }

    /// Spec for `rule_id`; absent ids are a configuration error.
    pub fn spec(&self, rule_id: &str) -> Result<&RuleSpec, NegativeError> {
        self.rules
            .get(rule_id)
            .map(|rule| &rule.spec)
            .ok_or_else(|| NegativeError::UnknownRule(rule_id.to_string()))
    }

    /// True when `rule_id` is registered.
    pub fn contains(&self, rule_id: &str) -> bool {
        self.rules.contains_key(rule_id)
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin(Lexicon::default())
    }
}
