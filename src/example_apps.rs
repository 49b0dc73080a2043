//! Reusable CLI runners shared by the demo binaries.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;

use crate::config::{EngineConfig, QuotaRange};
use crate::constants::engine::{DEFAULT_K_MAX, DEFAULT_K_MIN, DEFAULT_RATIO, DEFAULT_SEED};
use crate::constants::export::{NEGATIVES_JSONL, STATS_JSON};
use crate::corpus::{CorpusColumns, read_positive_parquet};
use crate::data::PositiveRecord;
use crate::engine::SamplingEngine;
use crate::export::{export_run, write_json, write_jsonl};
use crate::hash::{record_salt, rule_salt};
use crate::registry::RuleRegistry;
use crate::report::{NegativeStats, rule_skew};
use crate::splits::SplitLabel;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Parquet,
    Jsonl,
}

#[derive(Debug, Parser)]
#[command(
    name = "generate_negatives",
    disable_help_subcommand = true,
    about = "Generate rule-based negative samples for a frozen positive corpus",
    long_about = "Run the negative sampling engine over a frozen positive corpus parquet \
                  and persist the corrupted rows, aggregate stats, and a run manifest.",
    after_help = "The run is fully determined by (corpus, ratio, quota, seed, rules); \
                  repeat it with the same values to reproduce the output byte for byte."
)]
struct GenerateNegativesCli {
    #[arg(long, value_name = "PATH", help = "Frozen positive corpus parquet")]
    positives: PathBuf,
    #[arg(
        long = "out-dir",
        value_name = "DIR",
        default_value = "negatives_out",
        help = "Directory receiving the exported rows"
    )]
    out_dir: PathBuf,
    #[arg(
        long,
        default_value_t = DEFAULT_RATIO,
        help = "Global negative-to-positive ratio in (0, 1]"
    )]
    ratio: f64,
    #[arg(
        long = "k-min",
        default_value_t = DEFAULT_K_MIN,
        help = "Lower bound of the per-item attempt quota"
    )]
    k_min: u32,
    #[arg(
        long = "k-max",
        default_value_t = DEFAULT_K_MAX,
        help = "Upper bound of the per-item attempt quota"
    )]
    k_max: u32,
    #[arg(long, default_value_t = DEFAULT_SEED, help = "Deterministic run seed")]
    seed: u64,
    #[arg(
        long = "rule",
        value_name = "RULE_ID",
        help = "Enable only this rule; repeat as needed (default: all registered)"
    )]
    rules: Vec<String>,
    #[arg(long, help = "Generate candidate plans with a rayon fan-out")]
    parallel: bool,
    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::Parquet,
        help = "Row output format"
    )]
    format: OutputFormat,
}

/// Run the `generate_negatives` demo against `args` (argv without the
/// binary name).
pub fn run_generate_negatives<I>(args: I) -> Result<(), Box<dyn Error>>
where
    I: IntoIterator<Item = String>,
{
    let cli = GenerateNegativesCli::try_parse_from(
        std::iter::once("generate_negatives".to_string()).chain(args),
    )?;

    let corpus = read_positive_parquet(&cli.positives, &CorpusColumns::default())?;
    let registry = RuleRegistry::default();
    let config = EngineConfig {
        seed: cli.seed,
        ratio: cli.ratio,
        quota: QuotaRange::new(cli.k_min, cli.k_max),
        enabled_rules: cli.rules.clone(),
    };
    let engine = SamplingEngine::new(&registry, config);
    let run = if cli.parallel {
        engine.run_parallel(&corpus)?
    } else {
        engine.run(&corpus)?
    };
    info!(
        positives = corpus.len(),
        negatives = run.samples.len(),
        "sampling run finished"
    );

    match cli.format {
        OutputFormat::Parquet => {
            export_run(&cli.out_dir, &run.samples, &run.report)?;
        }
        OutputFormat::Jsonl => {
            std::fs::create_dir_all(&cli.out_dir)?;
            write_jsonl(&cli.out_dir.join(NEGATIVES_JSONL), &run.samples)?;
            write_json(
                &cli.out_dir.join(STATS_JSON),
                &NegativeStats::from_samples(&run.samples),
            )?;
        }
    }

    println!(
        "emitted {} of budget {} ({} duplicate candidates discarded, {} items unvisited)",
        run.report.emitted, run.report.budget, run.report.duplicates, run.report.items_skipped
    );
    if let Some(skew) = rule_skew(&run.report.by_rule) {
        for share in &skew.per_rule {
            println!(
                "  {}: {} rows ({:.1}%)",
                share.rule,
                share.count,
                share.share * 100.0
            );
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "rule_probe",
    disable_help_subcommand = true,
    about = "Probe which rules fire on one sentence pair",
    long_about = "Apply every registered rule to a single (source, target) pair and print \
                  the candidate corruption each one produces, if any."
)]
struct RuleProbeCli {
    #[arg(long, help = "Spanish sentence")]
    source: String,
    #[arg(long, help = "Yine sentence to perturb")]
    target: String,
    #[arg(long, default_value_t = DEFAULT_SEED, help = "Seed for site choices")]
    seed: u64,
}

/// Run the `rule_probe` demo against `args` (argv without the binary name).
pub fn run_rule_probe<I>(args: I) -> Result<(), Box<dyn Error>>
where
    I: IntoIterator<Item = String>,
{
    let cli = RuleProbeCli::try_parse_from(std::iter::once("rule_probe".to_string()).chain(args))?;

    let record = PositiveRecord {
        pair_id: "probe".to_string(),
        source_text: cli.source,
        target_text: cli.target,
        split: SplitLabel::Train,
    };
    let registry = RuleRegistry::default();
    let salt = record_salt(cli.seed, &record.pair_id);
    for spec in registry.all_rules() {
        let generator = registry.get(spec.rule_id)?;
        match generator.apply(&record, rule_salt(salt, spec.rule_id)) {
            Some(candidate) => println!(
                "{} ({}): {}",
                spec.rule_id, spec.violation_type, candidate.negative_text
            ),
            None => println!("{}: not applicable", spec.rule_id),
        }
    }
    Ok(())
}
