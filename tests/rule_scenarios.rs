//! End-to-end checks that the documented corruption scenarios survive the
//! whole engine path: gating, selection, severity and metadata wiring.

use serde_json::Value;

use yine_negatives::{
    EngineConfig, Lexicon, PositiveCorpus, PositiveRecord, QuotaRange, RuleRegistry,
    SamplingEngine, SplitLabel, ViolationType,
};

fn single_pair_corpus(target: &str) -> PositiveCorpus {
    PositiveCorpus::new(vec![PositiveRecord {
        pair_id: "p1".to_string(),
        source_text: "mi casa grande".to_string(),
        target_text: target.to_string(),
        split: SplitLabel::Dev,
    }])
    .unwrap()
}

fn run_single_rule(target: &str, rule_id: &str) -> Vec<yine_negatives::NegativeSample> {
    let registry = RuleRegistry::default();
    let config = EngineConfig {
        seed: 42,
        ratio: 1.0,
        quota: QuotaRange::new(1, 1),
        enabled_rules: vec![rule_id.to_string()],
    };
    SamplingEngine::new(&registry, config)
        .run(&single_pair_corpus(target))
        .unwrap()
        .samples
}

#[test]
fn possessive_suffix_omission_end_to_end() {
    let samples = run_single_rule("wane numa-tu", "R4");
    assert_eq!(samples.len(), 1);
    let sample = &samples[0];
    assert_eq!(sample.negative_text, "wane numa");
    assert_eq!(sample.rule_id, "R4");
    assert_eq!(sample.violation_type, ViolationType::Morphological);
    assert_eq!(sample.severity, 1.0);
    assert_eq!(sample.split, SplitLabel::Dev);
    assert_eq!(
        sample.metadata.get("removed_suffix").unwrap(),
        &Value::from("-tu")
    );
}

#[test]
fn determiner_order_swap_end_to_end() {
    let samples = run_single_rule("eklu chixra", "R6");
    assert_eq!(samples.len(), 1);
    let sample = &samples[0];
    assert_eq!(sample.negative_text, "chixra eklu");
    assert_eq!(sample.violation_type, ViolationType::Syntactic);
    assert_eq!(sample.severity, 1.0);
}

#[test]
fn gender_flip_end_to_end_both_directions() {
    let masc = run_single_rule("pixka-lu chixra", "R7");
    assert_eq!(masc.len(), 1);
    assert_eq!(masc[0].negative_text, "pixka-lo chixra");

    let fem = run_single_rule("pixka-to chixra", "R7");
    assert_eq!(fem.len(), 1);
    assert_eq!(fem[0].negative_text, "pixka-tu chixra");
}

#[test]
fn determiner_injection_end_to_end() {
    let lexicon = Lexicon::default();
    let samples = run_single_rule("numa chixra", "R8");
    assert_eq!(samples.len(), 1);
    let sample = &samples[0];
    assert_eq!(sample.violation_type, ViolationType::LexicalContrastive);
    assert_eq!(sample.severity, 0.5);

    let inserted = sample
        .metadata
        .get("inserted_token")
        .and_then(Value::as_str)
        .unwrap();
    assert!(lexicon.is_spanish_determiner(inserted));
    assert_eq!(sample.negative_text, format!("{inserted} numa chixra"));
}

#[test]
fn inapplicable_rules_emit_nothing_without_error() {
    for rule_id in ["R4", "R6", "R7", "R8"] {
        let samples = run_single_rule("wa ga", rule_id);
        assert!(samples.is_empty(), "{rule_id} fired on a bare target");
    }
}

#[test]
fn no_op_candidates_never_surface() {
    // every emitted row must differ from its gold target, whichever rule ran
    let registry = RuleRegistry::default();
    let config = EngineConfig {
        seed: 3,
        ratio: 1.0,
        quota: QuotaRange::new(4, 4),
        enabled_rules: Vec::new(),
    };
    let corpus = PositiveCorpus::new(
        ["wane numa-tu", "satu numa-tu", "pixka-lu chixra", "eklu chixra"]
            .iter()
            .enumerate()
            .map(|(i, target)| PositiveRecord {
                pair_id: format!("p{i}"),
                source_text: "la casa".to_string(),
                target_text: target.to_string(),
                split: SplitLabel::Train,
            })
            .collect(),
    )
    .unwrap();
    let run = SamplingEngine::new(&registry, config).run(&corpus).unwrap();
    assert!(!run.samples.is_empty());
    for sample in &run.samples {
        assert_ne!(sample.negative_text, sample.target_text);
    }
}
