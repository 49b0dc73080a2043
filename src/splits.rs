//! Train/dev/test split assignment.
//!
//! Splits are assigned upstream of sampling and inherited unchanged by every
//! negative: a seeded shuffle of the id list sliced by ratio, remainder to
//! test, so one `(ids, ratios, seed)` triple always yields one partition.

use std::fmt;

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::errors::NegativeError;
use crate::rng::DeterministicRng;
use crate::types::PairId;

/// Logical dataset partitions inherited by every derived negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitLabel {
    /// Training split.
    Train,
    /// Development split.
    Dev,
    /// Test split.
    Test,
}

impl SplitLabel {
    /// Canonical lowercase name used in serialized rows.
    pub fn as_str(self) -> &'static str {
        match self {
            SplitLabel::Train => "train",
            SplitLabel::Dev => "dev",
            SplitLabel::Test => "test",
        }
    }

    /// Parse a serialized split name.
    pub fn parse(value: &str) -> Result<Self, NegativeError> {
        match value {
            "train" => Ok(SplitLabel::Train),
            "dev" => Ok(SplitLabel::Dev),
            "test" => Ok(SplitLabel::Test),
            other => Err(NegativeError::Corpus {
                reason: format!("unknown split label '{other}'"),
            }),
        }
    }
}

impl fmt::Display for SplitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ratio configuration for train/dev/test assignment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SplitRatios {
    /// Fraction assigned to train.
    pub train: f64,
    /// Fraction assigned to dev.
    pub dev: f64,
    /// Fraction assigned to test.
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.8,
            dev: 0.1,
            test: 0.1,
        }
    }
}

impl SplitRatios {
    /// Validate that the fractions are non-negative and sum to `1.0`
    /// (within epsilon).
    pub fn normalized(self) -> Result<Self, NegativeError> {
        if self.train < 0.0 || self.dev < 0.0 || self.test < 0.0 {
            return Err(NegativeError::Configuration(
                "split ratios must be non-negative".to_string(),
            ));
        }
        let sum = self.train + self.dev + self.test;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(NegativeError::Configuration(
                "split ratios must sum to 1.0".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Deterministically assign a split to every id: seeded shuffle, then ratio
/// slicing with the remainder going to test. The returned map iterates in
/// shuffled order.
pub fn assign_splits(
    ids: &[PairId],
    ratios: SplitRatios,
    seed: u64,
) -> Result<IndexMap<PairId, SplitLabel>, NegativeError> {
    let ratios = ratios.normalized()?;
    let mut shuffled: Vec<&PairId> = ids.iter().collect();
    let mut rng = DeterministicRng::new(seed);
    shuffled.shuffle(&mut rng);

    let n = shuffled.len();
    let n_train = (n as f64 * ratios.train) as usize;
    let n_dev = (n as f64 * ratios.dev) as usize;

    let mut assignments = IndexMap::with_capacity(n);
    for (pos, id) in shuffled.into_iter().enumerate() {
        let label = if pos < n_train {
            SplitLabel::Train
        } else if pos < n_train + n_dev {
            SplitLabel::Dev
        } else {
            SplitLabel::Test
        };
        assignments.insert(id.clone(), label);
    }
    Ok(assignments)
}

/// Per-split record counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCounts {
    /// Records assigned to train.
    pub train: usize,
    /// Records assigned to dev.
    pub dev: usize,
    /// Records assigned to test.
    pub test: usize,
}

impl SplitCounts {
    /// Tally counts over a stream of labels.
    pub fn tally(labels: impl IntoIterator<Item = SplitLabel>) -> Self {
        let mut counts = Self::default();
        for label in labels {
            match label {
                SplitLabel::Train => counts.train += 1,
                SplitLabel::Dev => counts.dev += 1,
                SplitLabel::Test => counts.test += 1,
            }
        }
        counts
    }

    /// Total records across all splits.
    pub fn total(self) -> usize {
        self.train + self.dev + self.test
    }
}

/// Serializable summary of one split assignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SplitManifest {
    /// Seed that produced the assignment.
    pub seed: u64,
    /// Ratios the assignment was sliced with.
    pub ratios: SplitRatios,
    /// Resulting per-split counts.
    pub counts: SplitCounts,
}

impl SplitManifest {
    /// Summarize an assignment map.
    pub fn summarize(
        assignments: &IndexMap<PairId, SplitLabel>,
        ratios: SplitRatios,
        seed: u64,
    ) -> Self {
        Self {
            seed,
            ratios,
            counts: SplitCounts::tally(assignments.values().copied()),
        }
    }
}
