//! Batch recalculation of attempt metrics
//!
//! Reads one JSON [`Attempt`] per line and writes one
//! `{"attempt": ..., "metrics": ...}` object per line. Bad lines are logged
//! and skipped so a single corrupt record never stops a recalculation run.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use dysgair_metrics::{score_attempt, AsrModel, Attempt, AttemptMetrics, ErrorClassification};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ReviewConfig;

/// Reasons a batch line is skipped
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("line {line}: invalid attempt JSON: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: field of {chars} characters exceeds limit of {limit}")]
    InputTooLong {
        line: usize,
        chars: usize,
        limit: usize,
    },
}

/// Lenient attribution counts for one recognizer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationCounts {
    pub correct: usize,
    pub asr_error: usize,
    pub user_error: usize,
    pub ambiguous: usize,
    pub unclassified: usize,
}

impl ClassificationCounts {
    pub fn record(&mut self, classification: ErrorClassification) {
        let slot = match classification {
            ErrorClassification::Correct => &mut self.correct,
            ErrorClassification::AsrError => &mut self.asr_error,
            ErrorClassification::UserError => &mut self.user_error,
            ErrorClassification::Ambiguous => &mut self.ambiguous,
            ErrorClassification::Unclassified => &mut self.unclassified,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.correct + self.asr_error + self.user_error + self.ambiguous + self.unclassified
    }
}

/// Outcome of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub processed: usize,
    pub skipped: usize,
    /// Attempts with at least one classified recognizer
    pub reviewed: usize,
    pub auto_populated: usize,
    pub whisper: ClassificationCounts,
    pub wav2vec2: ClassificationCounts,
}

impl BatchSummary {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            processed: 0,
            skipped: 0,
            reviewed: 0,
            auto_populated: 0,
            whisper: ClassificationCounts::default(),
            wav2vec2: ClassificationCounts::default(),
        }
    }

    fn record(&mut self, metrics: &AttemptMetrics) {
        self.processed += 1;
        if metrics.human_auto_populated {
            self.auto_populated += 1;
        }
        if [AsrModel::Whisper, AsrModel::Wav2Vec2]
            .iter()
            .filter_map(|model| metrics.model(*model))
            .any(|m| m.attribution_lenient.is_classified())
        {
            self.reviewed += 1;
        }
        for model in [AsrModel::Whisper, AsrModel::Wav2Vec2] {
            if let Some(model_metrics) = metrics.model(model) {
                let counts = match model {
                    AsrModel::Whisper => &mut self.whisper,
                    AsrModel::Wav2Vec2 => &mut self.wav2vec2,
                };
                counts.record(model_metrics.attribution_lenient);
            }
        }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[derive(Serialize)]
struct ScoredAttempt<'a> {
    attempt: &'a Attempt,
    metrics: AttemptMetrics,
}

/// Parse and validate one input line
pub fn parse_attempt(line: &str, line_number: usize, max_input_chars: usize) -> Result<Attempt, ReviewError> {
    let attempt: Attempt = serde_json::from_str(line).map_err(|source| ReviewError::Parse {
        line: line_number,
        source,
    })?;

    let chars = attempt.longest_field_chars();
    if chars > max_input_chars {
        return Err(ReviewError::InputTooLong {
            line: line_number,
            chars,
            limit: max_input_chars,
        });
    }

    Ok(attempt)
}

/// Score every attempt from `reader` and write the results to `writer`
pub fn run_batch<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    config: &ReviewConfig,
) -> Result<BatchSummary> {
    let options = config.to_scoring_options();
    let mut summary = BatchSummary::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read input line {}", line_number))?;
        if line.trim().is_empty() {
            continue;
        }

        let attempt = match parse_attempt(&line, line_number, config.limits.max_input_chars) {
            Ok(attempt) => attempt,
            Err(e) => {
                warn!("Skipping {}", e);
                summary.skipped += 1;
                continue;
            }
        };

        let metrics = score_attempt(&attempt, &options);
        summary.record(&metrics);

        let scored = ScoredAttempt {
            attempt: &attempt,
            metrics,
        };
        serde_json::to_writer(&mut writer, &scored)
            .with_context(|| format!("Failed to write result for line {}", line_number))?;
        writer.write_all(b"\n").context("Failed to write output")?;
        debug!("Scored line {}", line_number);
    }

    writer.flush().context("Failed to flush output")?;
    summary.finished_at = Utc::now();

    info!(
        "Batch complete: {} processed, {} skipped, {} reviewed, {} auto-populated in {} ms",
        summary.processed,
        summary.skipped,
        summary.reviewed,
        summary.auto_populated,
        summary.duration_ms()
    );
    info!(
        "  whisper:  correct={} asr_error={} user_error={} ambiguous={} unclassified={}",
        summary.whisper.correct,
        summary.whisper.asr_error,
        summary.whisper.user_error,
        summary.whisper.ambiguous,
        summary.whisper.unclassified
    );
    info!(
        "  wav2vec2: correct={} asr_error={} user_error={} ambiguous={} unclassified={}",
        summary.wav2vec2.correct,
        summary.wav2vec2.asr_error,
        summary.wav2vec2.user_error,
        summary.wav2vec2.ambiguous,
        summary.wav2vec2.unclassified
    );

    Ok(summary)
}
