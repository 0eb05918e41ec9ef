//! Attempt scoring
//!
//! Recomputes the full metric record of an attempt: target-based rates for
//! each recognizer, then, once a human transcription exists, accuracy and
//! error attribution. Called after upload, after review, and by batch
//! recalculation jobs.

use tracing::debug;

use crate::alignment::{char_alignment, edit_operations_to_compact_form};
use crate::attribution::{classify, classify_strict};
use crate::models::{AsrModel, Attempt, AttemptMetrics, ModelMetrics, ScoringOptions};
use crate::normalize::Normalization;
use crate::rates::{
    cap_hallucination, character_error_rate, transcription_accuracy, word_error_rate,
};

/// Score an attempt.
///
/// A recognizer with an empty hypothesis gets no metrics. If the human
/// transcription is empty, the target is non-empty, auto-population is on and
/// some recognizer has a lenient CER of zero, the target stands in for the
/// human transcription.
pub fn score_attempt(attempt: &Attempt, options: &ScoringOptions) -> AttemptMetrics {
    let mut metrics = AttemptMetrics {
        human_transcription: attempt.human_transcription.clone(),
        ..AttemptMetrics::default()
    };

    if !attempt.whisper.is_empty() {
        let comparison = options
            .cap_hallucinations
            .then_some(attempt.wav2vec2.as_str());
        metrics.whisper = Some(target_metrics(&attempt.target, &attempt.whisper, comparison));
    }

    if !attempt.wav2vec2.is_empty() {
        metrics.wav2vec2 = Some(target_metrics(&attempt.target, &attempt.wav2vec2, None));
    }

    if options.auto_populate_human
        && metrics.human_transcription.is_empty()
        && !attempt.target.is_empty()
        && metrics
            .whisper
            .iter()
            .chain(metrics.wav2vec2.iter())
            .any(|m| m.cer_lenient == 0.0)
    {
        metrics.human_transcription = attempt.target.clone();
        metrics.human_auto_populated = true;
    }

    if !metrics.human_transcription.is_empty() {
        let human = metrics.human_transcription.as_str();

        for model in [AsrModel::Whisper, AsrModel::Wav2Vec2] {
            let slot = match model {
                AsrModel::Whisper => metrics.whisper.as_mut(),
                AsrModel::Wav2Vec2 => metrics.wav2vec2.as_mut(),
            };
            if let Some(model_metrics) = slot {
                apply_review(model_metrics, &attempt.target, attempt.hypothesis(model), human);
            }
        }

        if options.include_edit_operations && !attempt.whisper.is_empty() {
            let operations = char_alignment(&attempt.whisper, human).operations;
            metrics.edit_operations = Some(edit_operations_to_compact_form(Some(&operations)));
        }
    }

    debug!(
        "Scored attempt '{}': whisper={:?} wav2vec2={:?} human_auto_populated={}",
        attempt.target,
        metrics.whisper.as_ref().map(|m| m.attribution_lenient),
        metrics.wav2vec2.as_ref().map(|m| m.attribution_lenient),
        metrics.human_auto_populated,
    );

    metrics
}

/// Target-vs-hypothesis rates. The lenient rates use the capped hypothesis
/// when a comparison hypothesis is supplied.
fn target_metrics(target: &str, hypothesis: &str, comparison: Option<&str>) -> ModelMetrics {
    let strict = Normalization::Strict.pair(target, hypothesis);
    let capped = cap_hallucination(hypothesis, target, comparison);
    let lenient = Normalization::Lenient.pair(target, capped);

    ModelMetrics {
        wer: word_error_rate(&strict),
        cer: character_error_rate(&strict),
        wer_lenient: word_error_rate(&lenient),
        cer_lenient: character_error_rate(&lenient),
        normalized_text: lenient.hypothesis,
        ..ModelMetrics::default()
    }
}

/// Human-dependent metrics, always on the uncapped hypothesis
fn apply_review(metrics: &mut ModelMetrics, target: &str, hypothesis: &str, human: &str) {
    metrics.accuracy = transcription_accuracy(&Normalization::Strict.pair(human, hypothesis));
    metrics.accuracy_lenient =
        transcription_accuracy(&Normalization::Lenient.pair(human, hypothesis));
    metrics.attribution = classify_strict(target, hypothesis, human);
    metrics.attribution_lenient = classify(target, hypothesis, human);
}
