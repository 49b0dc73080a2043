use std::collections::HashSet;

use yine_negatives::{
    EngineConfig, NegativeError, PositiveCorpus, PositiveRecord, QuotaRange, RuleRegistry,
    SamplingEngine, SplitLabel,
};

fn record(id: usize, target: &str, split: SplitLabel) -> PositiveRecord {
    PositiveRecord {
        pair_id: format!("pair_{id:04}"),
        source_text: format!("la casa {id}"),
        target_text: target.to_string(),
        split,
    }
}

/// A corpus cycling through targets with different rule eligibility:
/// possessive-marked, determiner-noun, flippable adjective, everything at
/// once, and nothing at all.
fn mixed_corpus(n: usize) -> PositiveCorpus {
    let cycle = [
        "wane numa-tu",
        "eklu chixra",
        "pixka-lu chixra",
        "satu numa-tu",
        "wa ga",
    ];
    let splits = [SplitLabel::Train, SplitLabel::Dev, SplitLabel::Test];
    let records = (0..n)
        .map(|i| record(i, cycle[i % cycle.len()], splits[i % splits.len()]))
        .collect();
    PositiveCorpus::new(records).expect("valid corpus")
}

/// Targets only the injection rule can touch.
fn injection_only_corpus(n: usize) -> PositiveCorpus {
    let records = (0..n)
        .map(|i| record(i, "numa chixra", SplitLabel::Train))
        .collect();
    PositiveCorpus::new(records).expect("valid corpus")
}

fn config(seed: u64, ratio: f64, k_min: u32, k_max: u32) -> EngineConfig {
    EngineConfig {
        seed,
        ratio,
        quota: QuotaRange::new(k_min, k_max),
        enabled_rules: Vec::new(),
    }
}

#[test]
fn two_runs_are_byte_identical() {
    let corpus = mixed_corpus(60);
    let registry = RuleRegistry::default();
    let engine = SamplingEngine::new(&registry, config(99, 0.5, 1, 3));

    let first = engine.run(&corpus).unwrap();
    let second = engine.run(&corpus).unwrap();

    let left = serde_json::to_string(&first.samples).unwrap();
    let right = serde_json::to_string(&second.samples).unwrap();
    assert_eq!(left, right);
    assert_eq!(first.report, second.report);
}

#[test]
fn parallel_run_matches_sequential_run() {
    let corpus = mixed_corpus(80);
    let registry = RuleRegistry::default();
    let engine = SamplingEngine::new(&registry, config(7, 0.6, 1, 4));

    let sequential = engine.run(&corpus).unwrap();
    let parallel = engine.run_parallel(&corpus).unwrap();

    assert_eq!(sequential.samples, parallel.samples);
    assert_eq!(sequential.report, parallel.report);
}

#[test]
fn different_seeds_produce_different_outputs() {
    let corpus = mixed_corpus(60);
    let registry = RuleRegistry::default();
    let first = SamplingEngine::new(&registry, config(1, 0.5, 1, 3))
        .run(&corpus)
        .unwrap();
    let second = SamplingEngine::new(&registry, config(2, 0.5, 1, 3))
        .run(&corpus)
        .unwrap();
    assert_ne!(first.samples, second.samples);
}

#[test]
fn ratio_budget_is_hit_exactly_when_eligibility_allows() {
    // 100 injection-eligible positives, ratio 0.25: exactly 25 negatives
    let corpus = injection_only_corpus(100);
    let registry = RuleRegistry::default();
    let engine = SamplingEngine::new(&registry, config(42, 0.25, 1, 3));

    let run = engine.run(&corpus).unwrap();
    assert_eq!(run.report.budget, 25);
    assert_eq!(run.samples.len(), 25);
    assert!(!run.report.under_budget());

    let again = engine.run(&corpus).unwrap();
    assert_eq!(run.samples, again.samples);
}

#[test]
fn eligibility_gaps_exhaust_the_corpus_before_the_budget() {
    // only 5 of 100 positives satisfy any precondition
    let mut records: Vec<PositiveRecord> = (0..95)
        .map(|i| record(i, "wa ga", SplitLabel::Train))
        .collect();
    for i in 95..100 {
        records.push(record(i, "numa chixra", SplitLabel::Train));
    }
    let corpus = PositiveCorpus::new(records).unwrap();
    let registry = RuleRegistry::default();
    let engine = SamplingEngine::new(&registry, config(3, 0.5, 1, 3));

    let run = engine.run(&corpus).unwrap();
    assert_eq!(run.report.budget, 50);
    assert_eq!(run.samples.len(), 5);
    assert!(run.report.under_budget());
    assert_eq!(run.report.items_visited, 100);
    assert_eq!(run.report.items_skipped, 0);
}

#[test]
fn budget_bound_holds_everywhere() {
    let registry = RuleRegistry::default();
    for (n, ratio) in [(10, 0.3), (57, 0.71), (200, 1.0), (3, 0.9)] {
        let corpus = mixed_corpus(n);
        let engine = SamplingEngine::new(&registry, config(11, ratio, 1, 3));
        let run = engine.run(&corpus).unwrap();
        let budget = (ratio * n as f64).round() as usize;
        assert!(run.samples.len() <= budget);
        assert_eq!(run.report.budget, budget);
    }
}

#[test]
fn early_termination_is_ratio_driven() {
    let corpus = injection_only_corpus(50);
    let registry = RuleRegistry::default();
    let engine = SamplingEngine::new(&registry, config(5, 0.1, 1, 3));

    let run = engine.run(&corpus).unwrap();
    assert_eq!(run.samples.len(), 5);
    assert!(run.report.items_skipped > 0);
    assert_eq!(
        run.report.items_visited + run.report.items_skipped,
        corpus.len()
    );
}

#[test]
fn dedup_keys_are_unique_across_the_output() {
    let corpus = mixed_corpus(120);
    let registry = RuleRegistry::default();
    let engine = SamplingEngine::new(&registry, config(23, 1.0, 2, 4));

    let run = engine.run(&corpus).unwrap();
    let keys: HashSet<_> = run.samples.iter().map(|s| s.dedup_key()).collect();
    assert_eq!(keys.len(), run.samples.len());
}

#[test]
fn emitted_rows_stay_faithful_to_their_positives() {
    let corpus = mixed_corpus(90);
    let registry = RuleRegistry::default();
    let engine = SamplingEngine::new(&registry, config(17, 1.0, 1, 4));

    let run = engine.run(&corpus).unwrap();
    assert!(!run.samples.is_empty());
    for sample in &run.samples {
        let positive = corpus
            .get(&sample.pair_id)
            .expect("every negative references an existing positive");
        assert_eq!(sample.source_text, positive.source_text);
        assert_eq!(sample.target_text, positive.target_text);
        assert_eq!(sample.split, positive.split);
        assert_ne!(sample.negative_text, sample.target_text);
    }
}

#[test]
fn enabled_subset_restricts_the_rules() {
    let corpus = mixed_corpus(50);
    let registry = RuleRegistry::default();
    let mut cfg = config(13, 0.5, 1, 3);
    cfg.enabled_rules = vec!["R8".to_string()];
    let run = SamplingEngine::new(&registry, cfg).run(&corpus).unwrap();
    assert!(!run.samples.is_empty());
    assert!(run.samples.iter().all(|s| s.rule_id == "R8"));
}

#[test]
fn enabled_subset_order_does_not_matter() {
    let corpus = mixed_corpus(50);
    let registry = RuleRegistry::default();
    let mut forward = config(13, 0.5, 1, 3);
    forward.enabled_rules = vec!["R4".to_string(), "R8".to_string()];
    let mut reversed = config(13, 0.5, 1, 3);
    reversed.enabled_rules = vec!["R8".to_string(), "R4".to_string()];

    let first = SamplingEngine::new(&registry, forward).run(&corpus).unwrap();
    let second = SamplingEngine::new(&registry, reversed)
        .run(&corpus)
        .unwrap();
    assert_eq!(first.samples, second.samples);
}

#[test]
fn configuration_errors_abort_before_sampling() {
    let corpus = mixed_corpus(10);
    let registry = RuleRegistry::default();

    let zero_ratio = SamplingEngine::new(&registry, config(1, 0.0, 1, 3)).run(&corpus);
    assert!(matches!(zero_ratio, Err(NegativeError::InvalidRatio { .. })));

    let over_ratio = SamplingEngine::new(&registry, config(1, 1.5, 1, 3)).run(&corpus);
    assert!(matches!(over_ratio, Err(NegativeError::InvalidRatio { .. })));

    let inverted = SamplingEngine::new(&registry, config(1, 0.5, 3, 1)).run(&corpus);
    assert!(matches!(
        inverted,
        Err(NegativeError::InvalidQuotaRange { k_min: 3, k_max: 1 })
    ));

    let zero_quota = SamplingEngine::new(&registry, config(1, 0.5, 0, 2)).run(&corpus);
    assert!(matches!(
        zero_quota,
        Err(NegativeError::InvalidQuotaRange { .. })
    ));

    let empty = PositiveCorpus::new(Vec::new()).unwrap();
    let no_corpus = SamplingEngine::new(&registry, config(1, 0.5, 1, 3)).run(&empty);
    assert!(matches!(no_corpus, Err(NegativeError::EmptyCorpus)));

    let mut unknown = config(1, 0.5, 1, 3);
    unknown.enabled_rules = vec!["R99".to_string()];
    let unknown_rule = SamplingEngine::new(&registry, unknown).run(&corpus);
    assert!(matches!(
        unknown_rule,
        Err(NegativeError::UnknownRule(id)) if id == "R99"
    ));
}

#[test]
fn injection_dominates_mixed_corpora() {
    // R8's precondition is satisfied by nearly every sentence, so it should
    // lead the per-rule tally on a mixed corpus sampled to full ratio.
    let corpus = mixed_corpus(100);
    let registry = RuleRegistry::default();
    let run = SamplingEngine::new(&registry, config(31, 1.0, 2, 4))
        .run(&corpus)
        .unwrap();
    let r8 = run.report.by_rule.get("R8").copied().unwrap_or(0);
    for (rule, count) in &run.report.by_rule {
        if rule.as_str() != "R8" {
            assert!(r8 >= *count, "expected R8 ({r8}) >= {rule} ({count})");
        }
    }
}
