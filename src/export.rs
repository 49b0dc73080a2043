//! Persistence collaborators: JSONL, Parquet, stats, and run manifests.
//!
//! The engine itself owns no file formats; these helpers exist so the demo
//! binaries and downstream training pipelines share one serialization of
//! the output contract.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use parquet::data_type::{ByteArray, ByteArrayType, FloatType};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::file::writer::SerializedFileWriter;
use parquet::record::Field;
use parquet::schema::parser::parse_message_type;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::constants::export::{MANIFEST_JSON, NEGATIVES_PARQUET, STATS_JSON};
use crate::data::{NegativeSample, PositiveRecord, ViolationType};
use crate::errors::NegativeError;
use crate::report::{NegativeStats, SamplingReport};
use crate::splits::SplitLabel;

const NEGATIVES_SCHEMA: &str = "message negative_sample {
    REQUIRED BINARY pair_id (UTF8);
    REQUIRED BINARY source_text (UTF8);
    REQUIRED BINARY target_text (UTF8);
    REQUIRED BINARY negative_text (UTF8);
    REQUIRED BINARY rule_id (UTF8);
    REQUIRED BINARY violation_type (UTF8);
    REQUIRED FLOAT severity;
    REQUIRED BINARY metadata (UTF8);
    REQUIRED BINARY split (UTF8);
}";

const POSITIVES_SCHEMA: &str = "message positive_record {
    REQUIRED BINARY pair_id (UTF8);
    REQUIRED BINARY source_text (UTF8);
    REQUIRED BINARY target_text (UTF8);
    REQUIRED BINARY split (UTF8);
}";

fn export_err(err: impl std::fmt::Display) -> NegativeError {
    NegativeError::Export(err.to_string())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent(path: &Path) -> Result<(), NegativeError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write one serializable value as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), NegativeError> {
    ensure_parent(path)?;
    let payload = serde_json::to_vec_pretty(value).map_err(export_err)?;
    fs::write(path, payload)?;
    Ok(())
}

/// Write samples as JSON lines, one row per sample, in emission order.
pub fn write_jsonl(path: &Path, samples: &[NegativeSample]) -> Result<(), NegativeError> {
    ensure_parent(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    for sample in samples {
        serde_json::to_writer(&mut out, sample).map_err(export_err)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Write samples as a single-row-group Parquet file matching the output
/// contract; `metadata` is stored as a JSON string column.
pub fn write_negatives_parquet(
    path: &Path,
    samples: &[NegativeSample],
) -> Result<(), NegativeError> {
    ensure_parent(path)?;
    let schema = Arc::new(parse_message_type(NEGATIVES_SCHEMA).map_err(export_err)?);
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path)?;
    let mut writer = SerializedFileWriter::new(file, schema, props).map_err(export_err)?;
    let mut row_group = writer.next_row_group().map_err(export_err)?;

    let metadata_json: Vec<String> = samples
        .iter()
        .map(|sample| serde_json::to_string(&sample.metadata))
        .collect::<Result<_, _>>()
        .map_err(export_err)?;
    let severities: Vec<f32> = samples.iter().map(|sample| sample.severity).collect();
    let string_columns: [Vec<ByteArray>; 8] = [
        samples.iter().map(|s| ByteArray::from(s.pair_id.as_str())).collect(),
        samples.iter().map(|s| ByteArray::from(s.source_text.as_str())).collect(),
        samples.iter().map(|s| ByteArray::from(s.target_text.as_str())).collect(),
        samples.iter().map(|s| ByteArray::from(s.negative_text.as_str())).collect(),
        samples.iter().map(|s| ByteArray::from(s.rule_id.as_str())).collect(),
        samples.iter().map(|s| ByteArray::from(s.violation_type.as_str())).collect(),
        metadata_json.iter().map(|m| ByteArray::from(m.as_str())).collect(),
        samples.iter().map(|s| ByteArray::from(s.split.as_str())).collect(),
    ];

    // column order follows the schema; severity sits between the
    // violation_type and metadata string columns
    let mut strings = string_columns.into_iter();
    let mut column_idx = 0usize;
    while let Some(mut column) = row_group.next_column().map_err(export_err)? {
        if column_idx == 6 {
            column
                .typed::<FloatType>()
                .write_batch(&severities, None, None)
                .map_err(export_err)?;
        } else {
            let values = strings
                .next()
                .ok_or_else(|| export_err("schema/column mismatch"))?;
            column
                .typed::<ByteArrayType>()
                .write_batch(&values, None, None)
                .map_err(export_err)?;
        }
        column.close().map_err(export_err)?;
        column_idx += 1;
    }
    row_group.close().map_err(export_err)?;
    writer.close().map_err(export_err)?;
    Ok(())
}

/// Write a frozen positive corpus as Parquet, readable by
/// [`crate::corpus::read_positive_parquet`] with default columns.
pub fn write_positives_parquet(
    path: &Path,
    records: &[PositiveRecord],
) -> Result<(), NegativeError> {
    ensure_parent(path)?;
    let schema = Arc::new(parse_message_type(POSITIVES_SCHEMA).map_err(export_err)?);
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path)?;
    let mut writer = SerializedFileWriter::new(file, schema, props).map_err(export_err)?;
    let mut row_group = writer.next_row_group().map_err(export_err)?;

    let columns: [Vec<ByteArray>; 4] = [
        records.iter().map(|r| ByteArray::from(r.pair_id.as_str())).collect(),
        records.iter().map(|r| ByteArray::from(r.source_text.as_str())).collect(),
        records.iter().map(|r| ByteArray::from(r.target_text.as_str())).collect(),
        records.iter().map(|r| ByteArray::from(r.split.as_str())).collect(),
    ];
    let mut columns = columns.into_iter();
    while let Some(mut column) = row_group.next_column().map_err(export_err)? {
        let values = columns
            .next()
            .ok_or_else(|| export_err("schema/column mismatch"))?;
        column
            .typed::<ByteArrayType>()
            .write_batch(&values, None, None)
            .map_err(export_err)?;
        column.close().map_err(export_err)?;
    }
    row_group.close().map_err(export_err)?;
    writer.close().map_err(export_err)?;
    Ok(())
}

/// Read back a Parquet file written by [`write_negatives_parquet`].
pub fn read_negatives_parquet(path: &Path) -> Result<Vec<NegativeSample>, NegativeError> {
    let load_err = |reason: String| NegativeError::CorpusLoad {
        path: path.display().to_string(),
        reason,
    };
    let file = File::open(path).map_err(|err| load_err(err.to_string()))?;
    let reader = SerializedFileReader::new(file).map_err(|err| load_err(err.to_string()))?;
    let rows = reader
        .get_row_iter(None)
        .map_err(|err| load_err(err.to_string()))?;

    let mut samples = Vec::new();
    for row in rows {
        let row = row.map_err(|err| load_err(err.to_string()))?;
        let text = |wanted: &str| -> Result<String, NegativeError> {
            for (name, field) in row.get_column_iter() {
                if name.as_str() == wanted
                    && let Field::Str(value) = field
                {
                    return Ok(value.clone());
                }
            }
            Err(load_err(format!("missing string column '{wanted}'")))
        };
        let pair_id = text("pair_id")?;
        let source_text = text("source_text")?;
        let target_text = text("target_text")?;
        let negative_text = text("negative_text")?;
        let rule_id = text("rule_id")?;
        let violation_type = ViolationType::parse(&text("violation_type")?)?;
        let metadata = serde_json::from_str(&text("metadata")?)
            .map_err(|err| load_err(format!("bad metadata JSON: {err}")))?;
        let split = SplitLabel::parse(&text("split")?)?;
        let severity = row
            .get_column_iter()
            .find_map(|(name, field)| match field {
                Field::Float(value) if name.as_str() == "severity" => Some(*value),
                _ => None,
            })
            .ok_or_else(|| load_err("missing float column 'severity'".to_string()))?;
        samples.push(NegativeSample {
            pair_id,
            source_text,
            target_text,
            negative_text,
            rule_id,
            violation_type,
            severity,
            metadata,
            split,
        });
    }
    Ok(samples)
}

/// Export one finished run into `out_dir`: Parquet rows, aggregate stats,
/// and a manifest carrying the run report and a UTC timestamp.
pub fn export_run(
    out_dir: &Path,
    samples: &[NegativeSample],
    report: &SamplingReport,
) -> Result<NegativeStats, NegativeError> {
    fs::create_dir_all(out_dir)?;
    write_negatives_parquet(&out_dir.join(NEGATIVES_PARQUET), samples)?;
    let stats = NegativeStats::from_samples(samples);
    write_json(&out_dir.join(STATS_JSON), &stats)?;
    let manifest = json!({
        "generated_at": Utc::now().to_rfc3339(),
        "rows": stats.rows,
        "report": report,
    });
    write_json(&out_dir.join(MANIFEST_JSON), &manifest)?;
    info!(rows = stats.rows, dir = %out_dir.display(), "exported negatives");
    Ok(stats)
}
