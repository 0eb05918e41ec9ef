//! Dysgair pronunciation-assessment metrics
//!
//! Pure computation for scoring a recorded speech attempt:
//!
//! - **alignment**: generic Levenshtein alignment with operation backtracking
//! - **normalize**: strict and lenient text normalization
//! - **rates**: WER, CER and transcription accuracy, strict and lenient
//! - **attribution**: recognizer-vs-speaker error classification
//! - **scoring**: full metric record for an attempt
//! - **vocabulary**: nearest vocabulary word for a transcription
//!
//! ## Quick Start
//!
//! ```
//! use dysgair_metrics::{classify, wer, ErrorClassification};
//!
//! assert_eq!(wer("hello world", "hello there"), 50.0);
//! assert_eq!(
//!     classify("cymraeg", "cymrag", "cymraeg"),
//!     ErrorClassification::AsrError
//! );
//! ```
//!
//! Every metric and classification function is total and holds no shared
//! state, so it can be called from any number of threads.

pub mod alignment;
pub mod attribution;
pub mod error;
pub mod models;
pub mod normalize;
pub mod rates;
pub mod scoring;
pub mod vocabulary;

// Re-export main types
pub use alignment::{
    align, char_alignment, char_distance, edit_distance_and_ops, edit_operations_to_compact_form,
    word_alignment, Alignment, EditKind, EditOperation, EditOperations, Token, TIE_BREAK_ORDER,
};
pub use attribution::{classify, classify_strict, classify_with, ErrorClassification};
pub use error::{MetricsError, Result};
pub use models::{AsrModel, Attempt, AttemptMetrics, ModelMetrics, ScoringOptions};
pub use normalize::{
    apply_lenient_equivalence, normalize_lenient, normalize_strict, NormalizedPair, Normalization,
};
pub use rates::{
    accuracy, accuracy_strict, cap_hallucination, cer, cer_strict, character_error_rate,
    round_to_two_decimals, transcription_accuracy, truncate_to_byte_length, wer, wer_strict,
    word_error_rate,
};
pub use scoring::score_attempt;
pub use vocabulary::{match_confidence, normalize_for_matching, Vocabulary, VocabularyWord, WordMatch};
