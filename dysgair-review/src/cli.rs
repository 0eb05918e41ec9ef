//! Command-line interface for the review tool
//!
//! Argument structures are plain clap derives so they can be parsed in tests.
//! Command bodies return their output as strings; the binary prints them.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dysgair_metrics::{
    accuracy, accuracy_strict, cer, cer_strict, char_alignment, classify, classify_strict,
    edit_operations_to_compact_form, wer, wer_strict, word_alignment, ErrorClassification,
    Normalization, Vocabulary,
};
use serde::Serialize;
use tracing::info;

use crate::batch::{run_batch, BatchSummary};
use crate::config::ReviewConfig;

/// dysgair-review: pronunciation attempt scoring and review
#[derive(Parser, Debug, Clone)]
#[command(name = "dysgair-review")]
#[command(version)]
#[command(about = "Score and review Welsh pronunciation attempts", long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: <config dir>/dysgair/review.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Align two strings and print the edit operations
    Align(AlignArgs),

    /// Score a hypothesis against a target
    Score(ScoreArgs),

    /// Recalculate metrics for JSON-lines attempts
    Batch(BatchArgs),

    /// Find the closest vocabulary words for a transcription
    Match(MatchArgs),

    /// Show version and build information
    Version,
}

#[derive(Parser, Debug, Clone)]
pub struct AlignArgs {
    pub source: String,
    pub target: String,

    /// Align whitespace-separated words instead of characters
    #[arg(long)]
    pub words: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ScoreArgs {
    pub target: String,
    pub hypothesis: String,

    /// What the reviewer heard
    #[arg(long)]
    pub human: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// Input file (default: stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct MatchArgs {
    pub transcription: String,

    /// JSON vocabulary file (default: matching.vocabulary_path)
    #[arg(long)]
    pub vocabulary: Option<PathBuf>,

    /// Number of candidates (default: matching.top_n)
    #[arg(long)]
    pub top: Option<usize>,
}

impl Args {
    /// Explicit `--config` file, or the default location
    pub fn load_config(&self) -> Result<ReviewConfig> {
        match &self.config {
            Some(path) => ReviewConfig::load_from(path),
            None => ReviewConfig::load(),
        }
    }
}

/// Rates and attribution under one normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateReport {
    pub normalization: Normalization,
    pub wer: f64,
    pub cer: f64,
    pub accuracy: f64,
    pub classification: ErrorClassification,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub target: String,
    pub hypothesis: String,
    pub human: String,
    pub strict: RateReport,
    pub lenient: RateReport,
}

pub fn score_report(args: &ScoreArgs) -> ScoreReport {
    let human = args.human.clone().unwrap_or_default();
    let (target, hypothesis) = (args.target.as_str(), args.hypothesis.as_str());

    ScoreReport {
        strict: RateReport {
            normalization: Normalization::Strict,
            wer: wer_strict(target, hypothesis),
            cer: cer_strict(target, hypothesis),
            accuracy: accuracy_strict(&human, hypothesis),
            classification: classify_strict(target, hypothesis, &human),
        },
        lenient: RateReport {
            normalization: Normalization::Lenient,
            wer: wer(target, hypothesis),
            cer: cer(target, hypothesis),
            accuracy: accuracy(&human, hypothesis),
            classification: classify(target, hypothesis, &human),
        },
        target: args.target.clone(),
        hypothesis: args.hypothesis.clone(),
        human,
    }
}

pub fn run_score(args: &ScoreArgs) -> Result<String> {
    serde_json::to_string_pretty(&score_report(args)).context("Failed to serialize score report")
}

pub fn run_align(args: &AlignArgs) -> String {
    let alignment = if args.words {
        word_alignment(&args.source, &args.target)
    } else {
        char_alignment(&args.source, &args.target)
    };

    let mut output = format!(
        "distance: {}\noperations: {}",
        alignment.distance,
        edit_operations_to_compact_form(Some(&alignment.operations))
    );
    for op in alignment.operations.iter() {
        output.push_str(&format!(
            "\n  {:<12} @{:<3} '{}' -> '{}'",
            op.kind, op.position, op.actual, op.expected
        ));
    }
    output
}

pub fn run_match(args: &MatchArgs, config: &ReviewConfig) -> Result<String> {
    let path = match args
        .vocabulary
        .as_ref()
        .or(config.matching.vocabulary_path.as_ref())
    {
        Some(path) => path,
        None => bail!("No vocabulary file given (use --vocabulary or set matching.vocabulary_path)"),
    };

    let vocabulary = Vocabulary::from_json_file(path)
        .with_context(|| format!("Failed to load vocabulary from {}", path.display()))?;

    let top = args.top.unwrap_or(config.matching.top_n);
    let matches = vocabulary.top_matches(&args.transcription, top);
    if matches.is_empty() {
        return Ok(format!("No match for '{}'", args.transcription));
    }

    let lines: Vec<String> = matches
        .iter()
        .enumerate()
        .map(|(rank, m)| {
            let english = if m.word.english.is_empty() {
                String::new()
            } else {
                format!(" ({})", m.word.english)
            };
            format!(
                "{}. {}{}  distance={} score={:.2}",
                rank + 1,
                m.word.text,
                english,
                m.distance,
                m.score
            )
        })
        .collect();

    Ok(lines.join("\n"))
}

pub fn run_batch_command(args: &BatchArgs, config: &ReviewConfig) -> Result<BatchSummary> {
    let reader: Box<dyn io::BufRead> = match &args.input {
        Some(path) => {
            info!("Reading attempts from {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("Failed to open input {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let writer: Box<dyn io::Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    run_batch(reader, writer, config)
}
