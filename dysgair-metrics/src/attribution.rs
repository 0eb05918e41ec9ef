//! Error attribution: recognizer error or speaker error
//!
//! Compares the target, the ASR hypothesis and the human-verified
//! transcription. The human transcription is ground truth for what was said.
//!
//! Decision table, first match wins:
//!
//! | human == target | hyp == target | hyp == human | result |
//! |---|---|---|---|
//! | yes | yes | - | `CORRECT` |
//! | yes | no | - | `ASR_ERROR` |
//! | no | - | yes | `USER_ERROR` |
//! | no | - | no | `AMBIGUOUS` |
//!
//! An empty human transcription means "not reviewed yet" and yields
//! `Unclassified` before any comparison.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MetricsError;
use crate::normalize::{equivalent_forms, normalize_lenient, normalize_strict, Normalization};

/// Source of a transcription error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClassification {
    /// Speaker and recognizer both produced the target
    Correct,
    /// Speaker was right, recognizer was wrong
    AsrError,
    /// Speaker was wrong and the recognizer faithfully transcribed it
    UserError,
    /// Speaker was wrong and the recognizer disagrees with the reviewer
    Ambiguous,
    /// No human transcription yet
    #[default]
    #[serde(rename = "")]
    Unclassified,
}

impl ErrorClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClassification::Correct => "CORRECT",
            ErrorClassification::AsrError => "ASR_ERROR",
            ErrorClassification::UserError => "USER_ERROR",
            ErrorClassification::Ambiguous => "AMBIGUOUS",
            ErrorClassification::Unclassified => "",
        }
    }

    pub fn is_classified(&self) -> bool {
        *self != ErrorClassification::Unclassified
    }
}

impl std::fmt::Display for ErrorClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorClassification {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CORRECT" => Ok(ErrorClassification::Correct),
            "ASR_ERROR" => Ok(ErrorClassification::AsrError),
            "USER_ERROR" => Ok(ErrorClassification::UserError),
            "AMBIGUOUS" => Ok(ErrorClassification::Ambiguous),
            "" => Ok(ErrorClassification::Unclassified),
            other => Err(MetricsError::invalid_input(format!(
                "unknown error classification: {other}"
            ))),
        }
    }
}

fn decide(human_correct: bool, asr_correct: bool, asr_matches_human: bool) -> ErrorClassification {
    match (human_correct, asr_correct, asr_matches_human) {
        (true, true, _) => ErrorClassification::Correct,
        (true, false, _) => ErrorClassification::AsrError,
        (false, _, true) => ErrorClassification::UserError,
        (false, _, false) => ErrorClassification::Ambiguous,
    }
}

/// Classify using lowercase/trim normalization only
pub fn classify_strict(target: &str, hypothesis: &str, human: &str) -> ErrorClassification {
    if human.is_empty() {
        return ErrorClassification::Unclassified;
    }

    let target = normalize_strict(target);
    let hypothesis = normalize_strict(hypothesis);
    let human = normalize_strict(human);

    decide(human == target, hypothesis == target, hypothesis == human)
}

/// Classify using lenient normalization and pairwise lenient equivalence.
///
/// Equivalence is not transitive, so each of the three comparisons runs its
/// own check with the first argument as the reference side.
pub fn classify(target: &str, hypothesis: &str, human: &str) -> ErrorClassification {
    if human.is_empty() {
        return ErrorClassification::Unclassified;
    }

    let target = normalize_lenient(target);
    let hypothesis = normalize_lenient(hypothesis);
    let human = normalize_lenient(human);

    decide(
        lenient_match(&target, &human),
        lenient_match(&target, &hypothesis),
        lenient_match(&hypothesis, &human),
    )
}

/// Dispatch on a [`Normalization`]
pub fn classify_with(
    normalization: Normalization,
    target: &str,
    hypothesis: &str,
    human: &str,
) -> ErrorClassification {
    match normalization {
        Normalization::Strict => classify_strict(target, hypothesis, human),
        Normalization::Lenient => classify(target, hypothesis, human),
    }
}

fn lenient_match(reference: &str, hypothesis: &str) -> bool {
    let (reference, hypothesis) = equivalent_forms(reference, hypothesis);
    reference == hypothesis
}
