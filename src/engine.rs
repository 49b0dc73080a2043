//! Ratio-bounded, deduplicated, deterministic negative sampling.
//!
//! One seeded sequence fixes the corpus permutation and every per-item
//! quota draw; rule-selection order within an item is driven by a sub-seed
//! derived from the run seed and the item's pair id. Budget and dedup
//! enforcement always happen on one thread, in permutation order, so the
//! sequential and parallel paths emit byte-identical output.

use std::collections::HashSet;

use indexmap::IndexMap;
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::corpus::PositiveCorpus;
use crate::data::{NegativeSample, PositiveRecord, RuleMetadata, RuleSpec};
use crate::errors::NegativeError;
use crate::hash::{record_salt, rule_salt};
use crate::registry::RuleRegistry;
use crate::report::SamplingReport;
use crate::rng::DeterministicRng;
use crate::rules::RuleGenerator;
use crate::types::{PairId, RuleId};

/// Output of one sampling run: accepted rows in emission order plus
/// bookkeeping counters.
#[derive(Debug)]
pub struct SamplingRun {
    /// Accepted negatives, in emission order.
    pub samples: Vec<NegativeSample>,
    /// Run counters.
    pub report: SamplingReport,
}

/// Ratio-controlled negative sampler over a rule registry.
pub struct SamplingEngine<'a> {
    registry: &'a RuleRegistry,
    config: EngineConfig,
}

struct PlannedCandidate<'a> {
    spec: &'a RuleSpec,
    negative_text: String,
    metadata: RuleMetadata,
}

struct RunPlan<'a> {
    budget: usize,
    enabled: Vec<(&'a RuleSpec, &'a dyn RuleGenerator)>,
    /// Permuted record indices; processing follows this order.
    order: Vec<usize>,
    /// Attempt quota per permuted position.
    quotas: Vec<u32>,
}

impl<'a> SamplingEngine<'a> {
    /// Create an engine; the configuration is validated when a run starts,
    /// before any sampling, so a bad config never yields partial output.
    pub fn new(registry: &'a RuleRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run sequentially. See [`SamplingEngine::run_parallel`] for the
    /// fan-out variant; both produce identical output for identical inputs.
    pub fn run(&self, corpus: &PositiveCorpus) -> Result<SamplingRun, NegativeError> {
        let plan = self.preflight(corpus)?;
        let records = corpus.records();
        let mut acceptor = Acceptor::new(plan.budget);
        for (pos, &record_idx) in plan.order.iter().enumerate() {
            if acceptor.exhausted() {
                acceptor.items_skipped = plan.order.len() - pos;
                break;
            }
            let record = &records[record_idx];
            let planned = plan_item(self.config.seed, record, plan.quotas[pos], &plan.enabled);
            acceptor.offer(record, planned);
        }
        Ok(self.finish(plan.budget, acceptor))
    }

    /// Run with a rayon fan-out over records.
    ///
    /// Candidate plans are generated in parallel from per-record sub-seeds;
    /// budget and dedup stay single-threaded in permutation order, so the
    /// output is identical to [`SamplingEngine::run`]. The fan-out
    /// deliberately over-generates: items the budget will never reach still
    /// get planned.
    pub fn run_parallel(&self, corpus: &PositiveCorpus) -> Result<SamplingRun, NegativeError> {
        let plan = self.preflight(corpus)?;
        let records = corpus.records();
        let seed = self.config.seed;
        let enabled = &plan.enabled;
        let planned: Vec<Vec<PlannedCandidate<'_>>> = plan
            .order
            .par_iter()
            .zip(plan.quotas.par_iter())
            .map(|(&record_idx, &k)| plan_item(seed, &records[record_idx], k, enabled))
            .collect();

        let mut acceptor = Acceptor::new(plan.budget);
        for (pos, (&record_idx, item)) in plan.order.iter().zip(planned).enumerate() {
            if acceptor.exhausted() {
                acceptor.items_skipped = plan.order.len() - pos;
                break;
            }
            acceptor.offer(&records[record_idx], item);
        }
        Ok(self.finish(plan.budget, acceptor))
    }

    fn preflight(&self, corpus: &PositiveCorpus) -> Result<RunPlan<'a>, NegativeError> {
        self.config.validate()?;
        if corpus.is_empty() {
            return Err(NegativeError::EmptyCorpus);
        }
        let enabled = self.enabled_entries()?;

        let budget = (self.config.ratio * corpus.len() as f64).round() as usize;
        let mut rng = DeterministicRng::new(self.config.seed);
        let mut order: Vec<usize> = (0..corpus.len()).collect();
        order.shuffle(&mut rng);
        let quotas: Vec<u32> = order
            .iter()
            .map(|_| rng.random_range(self.config.quota.k_min..=self.config.quota.k_max))
            .collect();
        debug!(
            positives = corpus.len(),
            budget,
            rules = enabled.len(),
            "sampling plan fixed"
        );
        Ok(RunPlan {
            budget,
            enabled,
            order,
            quotas,
        })
    }

    /// Rules the run consults, in registry declaration order regardless of
    /// the order they were requested in.
    fn enabled_entries(
        &self,
    ) -> Result<Vec<(&'a RuleSpec, &'a dyn RuleGenerator)>, NegativeError> {
        if self.config.enabled_rules.is_empty() {
            return Ok(self.registry.entries().collect());
        }
        for rule_id in &self.config.enabled_rules {
            if !self.registry.contains(rule_id) {
                return Err(NegativeError::UnknownRule(rule_id.clone()));
            }
        }
        let requested: HashSet<&str> = self
            .config
            .enabled_rules
            .iter()
            .map(String::as_str)
            .collect();
        Ok(self
            .registry
            .entries()
            .filter(|(spec, _)| requested.contains(spec.rule_id))
            .collect())
    }

    fn finish(&self, budget: usize, acceptor: Acceptor) -> SamplingRun {
        let (report, samples) = acceptor.into_report(budget);
        info!(
            budget = report.budget,
            emitted = report.emitted,
            duplicates = report.duplicates,
            items_skipped = report.items_skipped,
            "negative sampling complete"
        );
        SamplingRun { samples, report }
    }
}

/// Build the ordered attempt list for one record: the eligible rule pool in
/// registry order, then up to `k` rules drawn uniformly without replacement
/// using the record's sub-seeded generator. Acceptance never feeds back
/// into selection, which is what makes per-record planning parallelizable.
fn plan_item<'a>(
    seed: u64,
    record: &PositiveRecord,
    k: u32,
    enabled: &[(&'a RuleSpec, &'a dyn RuleGenerator)],
) -> Vec<PlannedCandidate<'a>> {
    let salt = record_salt(seed, &record.pair_id);
    let mut pool: Vec<PlannedCandidate<'a>> = Vec::with_capacity(enabled.len());
    for &(spec, generator) in enabled {
        let Some(candidate) = generator.apply(record, rule_salt(salt, spec.rule_id)) else {
            continue;
        };
        // a no-op perturbation counts as inapplicable
        if candidate.negative_text == record.target_text {
            continue;
        }
        pool.push(PlannedCandidate {
            spec,
            negative_text: candidate.negative_text,
            metadata: candidate.metadata,
        });
    }

    let mut rng = DeterministicRng::new(salt);
    let mut attempts = Vec::with_capacity(pool.len().min(k as usize));
    while (attempts.len() as u32) < k && !pool.is_empty() {
        let idx = rng.random_range(0..pool.len());
        attempts.push(pool.remove(idx));
    }
    attempts
}

/// Single-threaded budget and dedup enforcement, shared by both run paths.
struct Acceptor {
    budget_left: usize,
    dedup: HashSet<(PairId, RuleId, String)>,
    samples: Vec<NegativeSample>,
    attempts: usize,
    duplicates: usize,
    items_visited: usize,
    items_skipped: usize,
}

impl Acceptor {
    fn new(budget: usize) -> Self {
        Self {
            budget_left: budget,
            dedup: HashSet::new(),
            samples: Vec::with_capacity(budget),
            attempts: 0,
            duplicates: 0,
            items_visited: 0,
            items_skipped: 0,
        }
    }

    fn exhausted(&self) -> bool {
        self.budget_left == 0
    }

    fn offer(&mut self, record: &PositiveRecord, planned: Vec<PlannedCandidate<'_>>) {
        self.items_visited += 1;
        for candidate in planned {
            if self.budget_left == 0 {
                break;
            }
            self.attempts += 1;
            let key = (
                record.pair_id.clone(),
                candidate.spec.rule_id.to_string(),
                candidate.negative_text.clone(),
            );
            if !self.dedup.insert(key) {
                self.duplicates += 1;
                continue;
            }
            self.budget_left -= 1;
            self.samples.push(NegativeSample {
                pair_id: record.pair_id.clone(),
                source_text: record.source_text.clone(),
                target_text: record.target_text.clone(),
                negative_text: candidate.negative_text,
                rule_id: candidate.spec.rule_id.to_string(),
                violation_type: candidate.spec.violation_type,
                severity: candidate.spec.severity.weight(),
                metadata: candidate.metadata,
                split: record.split,
            });
        }
    }

    fn into_report(self, budget: usize) -> (SamplingReport, Vec<NegativeSample>) {
        let mut by_rule = IndexMap::new();
        let mut by_split = IndexMap::new();
        for sample in &self.samples {
            *by_rule.entry(sample.rule_id.clone()).or_insert(0) += 1;
            *by_split
                .entry(sample.split.as_str().to_string())
                .or_insert(0) += 1;
        }
        (
            SamplingReport {
                budget,
                emitted: self.samples.len(),
                attempts: self.attempts,
                duplicates: self.duplicates,
                items_visited: self.items_visited,
                items_skipped: self.items_skipped,
                by_rule,
                by_split,
            },
            self.samples,
        )
    }
}
