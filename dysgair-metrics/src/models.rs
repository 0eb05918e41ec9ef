//! Data models for attempt scoring
//!
//! An [`Attempt`] is one recording of a learner saying a target word or
//! phrase, with the output of two recognizers and, once reviewed, what a human
//! heard. [`AttemptMetrics`] is the record the persistence layer stores for it.

use serde::{Deserialize, Serialize};

use crate::attribution::ErrorClassification;
use crate::normalize::normalize_strict;

/// Recognizers whose hypotheses are scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsrModel {
    /// Sequence-to-sequence model, prone to verbose and hallucinated output
    Whisper,
    /// CTC model, used as the length reference when capping Whisper
    Wav2Vec2,
}

impl AsrModel {
    pub fn is_hallucination_prone(&self) -> bool {
        matches!(self, AsrModel::Whisper)
    }
}

impl std::fmt::Display for AsrModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsrModel::Whisper => write!(f, "whisper"),
            AsrModel::Wav2Vec2 => write!(f, "wav2vec2"),
        }
    }
}

/// A recorded attempt as handed over by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// Word or phrase the learner was asked to say
    pub target: String,

    /// Whisper hypothesis (empty if not transcribed)
    #[serde(default)]
    pub whisper: String,

    /// Wav2Vec2 hypothesis (empty if not transcribed)
    #[serde(default)]
    pub wav2vec2: String,

    /// What the reviewer heard (empty until reviewed)
    #[serde(default)]
    pub human_transcription: String,
}

impl Attempt {
    pub fn new<S: Into<String>>(target: S) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_whisper<S: Into<String>>(mut self, hypothesis: S) -> Self {
        self.whisper = hypothesis.into();
        self
    }

    pub fn with_wav2vec2<S: Into<String>>(mut self, hypothesis: S) -> Self {
        self.wav2vec2 = hypothesis.into();
        self
    }

    pub fn with_human<S: Into<String>>(mut self, transcription: S) -> Self {
        self.human_transcription = transcription.into();
        self
    }

    /// Hypothesis of one recognizer
    pub fn hypothesis(&self, model: AsrModel) -> &str {
        match model {
            AsrModel::Whisper => &self.whisper,
            AsrModel::Wav2Vec2 => &self.wav2vec2,
        }
    }

    /// Whether both recognizers produced the same text (lowercase/trim)
    pub fn models_agree(&self) -> bool {
        normalize_strict(&self.whisper) == normalize_strict(&self.wav2vec2)
    }

    /// Longest field in code points
    pub fn longest_field_chars(&self) -> usize {
        [
            &self.target,
            &self.whisper,
            &self.wav2vec2,
            &self.human_transcription,
        ]
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
    }
}

/// Switches for [`crate::scoring::score_attempt`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringOptions {
    /// Cap Whisper's lenient hypothesis at max(target, Wav2Vec2) bytes
    pub cap_hallucinations: bool,

    /// Copy the target into an empty human transcription when a recognizer
    /// matched it under lenient CER
    pub auto_populate_human: bool,

    /// Attach compact character operations between Whisper and the human
    /// transcription
    pub include_edit_operations: bool,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            cap_hallucinations: true,
            auto_populate_human: true,
            include_edit_operations: false,
        }
    }
}

/// Metrics for one recognizer's hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    // Target vs hypothesis
    pub wer: f64,
    pub cer: f64,
    pub wer_lenient: f64,
    pub cer_lenient: f64,

    // Human vs hypothesis (zero until reviewed)
    pub accuracy: f64,
    pub accuracy_lenient: f64,

    // Attribution (unclassified until reviewed)
    pub attribution: ErrorClassification,
    pub attribution_lenient: ErrorClassification,

    /// Lenient form of the hypothesis, as shown in review tables
    pub normalized_text: String,
}

impl Default for ModelMetrics {
    fn default() -> Self {
        Self {
            wer: 0.0,
            cer: 0.0,
            wer_lenient: 0.0,
            cer_lenient: 0.0,
            accuracy: 0.0,
            accuracy_lenient: 0.0,
            attribution: ErrorClassification::Unclassified,
            attribution_lenient: ErrorClassification::Unclassified,
            normalized_text: String::new(),
        }
    }
}

/// Full metric record for an attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttemptMetrics {
    pub whisper: Option<ModelMetrics>,
    pub wav2vec2: Option<ModelMetrics>,

    /// Human transcription used for scoring, possibly auto-populated
    pub human_transcription: String,
    pub human_auto_populated: bool,

    /// Compact JSON operations between Whisper and the human transcription
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_operations: Option<String>,
}

impl AttemptMetrics {
    pub fn model(&self, model: AsrModel) -> Option<&ModelMetrics> {
        match model {
            AsrModel::Whisper => self.whisper.as_ref(),
            AsrModel::Wav2Vec2 => self.wav2vec2.as_ref(),
        }
    }
}
