//! Run reports and aggregate yield metrics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::NegativeSample;
use crate::types::RuleId;

/// Bookkeeping emitted alongside one sampling run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingReport {
    /// Hard cap on emitted rows: `round(ratio * |positives|)`.
    pub budget: usize,
    /// Rows actually emitted.
    pub emitted: usize,
    /// Perturbation attempts consumed (accepted plus discarded).
    pub attempts: usize,
    /// Attempts discarded because their dedup key was already taken.
    pub duplicates: usize,
    /// Items processed before the run stopped.
    pub items_visited: usize,
    /// Items never visited because the budget was already consumed.
    pub items_skipped: usize,
    /// Emitted rows per rule, in first-emission order.
    pub by_rule: IndexMap<RuleId, usize>,
    /// Emitted rows per split, in first-emission order.
    pub by_split: IndexMap<String, usize>,
}

impl SamplingReport {
    /// True when the corpus ran dry before the budget did: eligibility
    /// gaps, not the ratio, bounded the run.
    pub fn under_budget(&self) -> bool {
        self.emitted < self.budget
    }
}

/// Aggregate row counts for a finished or exported negative set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NegativeStats {
    /// Total rows.
    pub rows: usize,
    /// Rows per rule.
    pub by_rule: IndexMap<RuleId, usize>,
    /// Rows per split.
    pub by_split: IndexMap<String, usize>,
}

impl NegativeStats {
    /// Tally stats over emitted samples.
    pub fn from_samples(samples: &[NegativeSample]) -> Self {
        let mut by_rule: IndexMap<RuleId, usize> = IndexMap::new();
        let mut by_split: IndexMap<String, usize> = IndexMap::new();
        for sample in samples {
            *by_rule.entry(sample.rule_id.clone()).or_insert(0) += 1;
            *by_split
                .entry(sample.split.as_str().to_string())
                .or_insert(0) += 1;
        }
        Self {
            rows: samples.len(),
            by_rule,
            by_split,
        }
    }
}

/// Per-rule share of an output set, for yield-skew inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleShare {
    /// Rule id.
    pub rule: RuleId,
    /// Rows emitted by this rule.
    pub count: usize,
    /// Fraction of the total this rule produced.
    pub share: f64,
}

/// Aggregate skew metrics over per-rule counts. Early budget exhaustion
/// skews yield toward the broadest-applicability rule; this makes that
/// visible.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleSkew {
    /// Total rows across all rules.
    pub total: usize,
    /// Number of rules with at least one row.
    pub rules: usize,
    /// Smallest per-rule count.
    pub min: usize,
    /// Largest per-rule count.
    pub max: usize,
    /// Mean rows per rule.
    pub mean: f64,
    /// Share of the dominant rule.
    pub max_share: f64,
    /// `max / min`, infinite when some rule emitted nothing it was tallied
    /// for.
    pub ratio: f64,
    /// Per-rule breakdown, largest first.
    pub per_rule: Vec<RuleShare>,
}

/// Compute skew metrics from per-rule counts. Returns `None` for an empty
/// map.
pub fn rule_skew(counts: &IndexMap<RuleId, usize>) -> Option<RuleSkew> {
    if counts.is_empty() {
        return None;
    }
    let total: usize = counts.values().sum();
    let rules = counts.len();
    let min = *counts.values().min()?;
    let max = *counts.values().max()?;
    let mean = total as f64 / rules as f64;
    let max_share = if total == 0 {
        0.0
    } else {
        max as f64 / total as f64
    };
    let ratio = if min == 0 {
        f64::INFINITY
    } else {
        max as f64 / min as f64
    };
    let mut per_rule: Vec<RuleShare> = counts
        .iter()
        .map(|(rule, count)| RuleShare {
            rule: rule.clone(),
            count: *count,
            share: if total == 0 {
                0.0
            } else {
                *count as f64 / total as f64
            },
        })
        .collect();
    per_rule.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.rule.cmp(&b.rule)));
    Some(RuleSkew {
        total,
        rules,
        min,
        max,
        mean,
        max_share,
        ratio,
        per_rule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skew_reports_balance() {
        let mut counts = IndexMap::new();
        counts.insert("R4".to_string(), 2);
        counts.insert("R8".to_string(), 2);
        let skew = rule_skew(&counts).expect("skew");
        assert_eq!(skew.total, 4);
        assert_eq!(skew.rules, 2);
        assert!((skew.max_share - 0.5).abs() < 1e-9);
        assert!((skew.ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn skew_reports_dominance() {
        let mut counts = IndexMap::new();
        counts.insert("R8".to_string(), 6);
        counts.insert("R4".to_string(), 1);
        counts.insert("R7".to_string(), 1);
        let skew = rule_skew(&counts).expect("skew");
        assert_eq!(skew.per_rule[0].rule, "R8");
        assert_eq!(skew.per_rule[0].count, 6);
        assert!((skew.max_share - 0.75).abs() < 1e-9);
        assert!((skew.ratio - 6.0).abs() < 1e-9);
    }

    #[test]
    fn empty_counts_have_no_skew() {
        assert!(rule_skew(&IndexMap::new()).is_none());
    }
}
