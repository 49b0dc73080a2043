//! Positive corpus loading, validation, and freezing.
//!
//! The engine consumes a frozen corpus: every record already carries a
//! stable `pair_id` and a split label. This module reads such corpora from
//! Parquet, validates them, and offers a freezing helper for collaborators
//! that start from raw text pairs.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use tracing::debug;

use crate::data::PositiveRecord;
use crate::errors::NegativeError;
use crate::hash::mint_pair_id;
use crate::splits::{SplitLabel, SplitRatios, assign_splits};
use crate::types::{OriginTag, PairId};

/// Column mapping for positive-corpus Parquet files.
#[derive(Clone, Debug)]
pub struct CorpusColumns {
    /// Column holding the frozen pair id.
    pub pair_id: String,
    /// Column holding the Spanish sentence.
    pub source_text: String,
    /// Column holding the Yine sentence.
    pub target_text: String,
    /// Column holding the split label (`train`/`dev`/`test`).
    pub split: String,
}

impl Default for CorpusColumns {
    fn default() -> Self {
        Self {
            pair_id: "pair_id".to_string(),
            source_text: "source_text".to_string(),
            target_text: "target_text".to_string(),
            split: "split".to_string(),
        }
    }
}

/// Validated, immutable positive corpus.
pub struct PositiveCorpus {
    records: Vec<PositiveRecord>,
    index: HashMap<PairId, usize>,
}

impl PositiveCorpus {
    /// Validate and wrap `records`: ids must be unique and texts non-empty.
    /// Overall emptiness is checked by the engine pre-flight, not here, so
    /// collaborators can build an empty corpus incrementally in tests.
    pub fn new(records: Vec<PositiveRecord>) -> Result<Self, NegativeError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if record.source_text.trim().is_empty() || record.target_text.trim().is_empty() {
                return Err(NegativeError::Corpus {
                    reason: format!("pair '{}' has an empty text field", record.pair_id),
                });
            }
            if index.insert(record.pair_id.clone(), pos).is_some() {
                return Err(NegativeError::Corpus {
                    reason: format!("duplicate pair_id '{}'", record.pair_id),
                });
            }
        }
        Ok(Self { records, index })
    }

    /// The records, in input order.
    pub fn records(&self) -> &[PositiveRecord] {
        &self.records
    }

    /// Look up one record by pair id.
    pub fn get(&self, pair_id: &str) -> Option<&PositiveRecord> {
        self.index.get(pair_id).map(|&pos| &self.records[pos])
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the corpus has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One raw, not-yet-frozen pair.
#[derive(Clone, Debug)]
pub struct RawPair {
    /// Spanish sentence.
    pub source_text: String,
    /// Yine sentence.
    pub target_text: String,
    /// Where the pair came from; folded into the minted id.
    pub origin: OriginTag,
}

/// Freeze raw pairs into a corpus: mint stable content-hash ids and assign
/// splits deterministically. Duplicate pairs collide on their minted id and
/// are rejected by validation.
pub fn freeze_pairs(
    pairs: Vec<RawPair>,
    ratios: SplitRatios,
    seed: u64,
) -> Result<PositiveCorpus, NegativeError> {
    let ids: Vec<PairId> = pairs
        .iter()
        .map(|pair| mint_pair_id(&pair.source_text, &pair.target_text, &pair.origin))
        .collect();
    let assignments = assign_splits(&ids, ratios, seed)?;

    let mut records = Vec::with_capacity(pairs.len());
    for (pair, pair_id) in pairs.into_iter().zip(ids) {
        let split = assignments
            .get(&pair_id)
            .copied()
            .ok_or_else(|| NegativeError::Corpus {
                reason: format!("no split assigned for pair '{pair_id}'"),
            })?;
        records.push(PositiveRecord {
            pair_id,
            source_text: pair.source_text,
            target_text: pair.target_text,
            split,
        });
    }
    PositiveCorpus::new(records)
}

/// Read a frozen positive corpus from a Parquet file.
///
/// Expects UTF-8 string columns named by `columns`; ids and split labels
/// must already be assigned upstream.
pub fn read_positive_parquet(
    path: &Path,
    columns: &CorpusColumns,
) -> Result<PositiveCorpus, NegativeError> {
    let load_err = |reason: String| NegativeError::CorpusLoad {
        path: path.display().to_string(),
        reason,
    };

    let file = File::open(path).map_err(|err| load_err(err.to_string()))?;
    let reader = SerializedFileReader::new(file).map_err(|err| load_err(err.to_string()))?;
    let rows = reader
        .get_row_iter(None)
        .map_err(|err| load_err(err.to_string()))?;

    let mut records = Vec::new();
    for (row_idx, row) in rows.enumerate() {
        let row = row.map_err(|err| load_err(err.to_string()))?;
        let mut pair_id = None;
        let mut source_text = None;
        let mut target_text = None;
        let mut split = None;
        for (name, field) in row.get_column_iter() {
            let Field::Str(value) = field else { continue };
            if name == &columns.pair_id {
                pair_id = Some(value.clone());
            } else if name == &columns.source_text {
                source_text = Some(value.clone());
            } else if name == &columns.target_text {
                target_text = Some(value.clone());
            } else if name == &columns.split {
                split = Some(value.clone());
            }
        }
        let missing =
            |column: &str| load_err(format!("row {row_idx} missing string column '{column}'"));
        let pair_id = pair_id.ok_or_else(|| missing(&columns.pair_id))?;
        let source_text = source_text.ok_or_else(|| missing(&columns.source_text))?;
        let target_text = target_text.ok_or_else(|| missing(&columns.target_text))?;
        let split = split.ok_or_else(|| missing(&columns.split))?;
        records.push(PositiveRecord {
            pair_id,
            source_text,
            target_text,
            split: SplitLabel::parse(&split)?,
        });
    }
    debug!(rows = records.len(), path = %path.display(), "loaded positive corpus");
    PositiveCorpus::new(records)
}
