//! Text normalization strategies
//!
//! - **Strict**: lowercase and trim. Punctuation and spacing artifacts stay
//!   visible, so metrics reflect raw transcription fidelity.
//! - **Lenient**: lowercase, split hyphenated compounds, drop Unicode
//!   punctuation and symbols, collapse whitespace. Pairs are additionally run
//!   through [`apply_lenient_equivalence`], which forgives spacing
//!   differences and trailing over-transcription of single words.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PUNCTUATION_OR_SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{P}\p{S}]").unwrap());

/// Which normalization regime feeds a metric or a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    Strict,
    Lenient,
}

impl std::fmt::Display for Normalization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Normalization::Strict => write!(f, "strict"),
            Normalization::Lenient => write!(f, "lenient"),
        }
    }
}

impl Normalization {
    /// Normalize a single string
    pub fn apply(self, text: &str) -> String {
        match self {
            Normalization::Strict => normalize_strict(text),
            Normalization::Lenient => normalize_lenient(text),
        }
    }

    /// Normalize a (reference, hypothesis) pair once.
    ///
    /// The lenient pair also has the equivalence check applied, so a
    /// forgiven hypothesis comes back identical to the reference.
    pub fn pair(self, reference: &str, hypothesis: &str) -> NormalizedPair {
        match self {
            Normalization::Strict => NormalizedPair {
                reference: normalize_strict(reference),
                hypothesis: normalize_strict(hypothesis),
            },
            Normalization::Lenient => {
                let (reference, hypothesis) = apply_lenient_equivalence(reference, hypothesis);
                NormalizedPair {
                    reference,
                    hypothesis,
                }
            }
        }
    }
}

/// A reference/hypothesis pair after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPair {
    pub reference: String,
    pub hypothesis: String,
}

impl NormalizedPair {
    pub fn is_match(&self) -> bool {
        self.reference == self.hypothesis
    }
}

/// Lowercase and trim
pub fn normalize_strict(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Lowercase, hyphens to spaces, drop punctuation and symbols, collapse whitespace
pub fn normalize_lenient(text: &str) -> String {
    let lowered = text.to_lowercase().replace('-', " ");
    let stripped = PUNCTUATION_OR_SYMBOL.replace_all(&lowered, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lenient-normalize both strings, then treat them as a perfect match when
/// they agree once all spaces are removed, or when a single-word reference is
/// the first word of the hypothesis.
///
/// A match returns the reference twice. The check is asymmetric: only the
/// reference's shape decides whether the first-word rule applies, and it never
/// applies to multi-word references.
pub fn apply_lenient_equivalence(reference: &str, hypothesis: &str) -> (String, String) {
    equivalent_forms(&normalize_lenient(reference), &normalize_lenient(hypothesis))
}

/// Equivalence check on strings that are already lenient-normalized
pub(crate) fn equivalent_forms(reference: &str, hypothesis: &str) -> (String, String) {
    let reference_compact = reference.replace(' ', "");
    let hypothesis_compact = hypothesis.replace(' ', "");

    if !reference_compact.is_empty() && reference_compact == hypothesis_compact {
        return (reference.to_string(), reference.to_string());
    }

    let single_word = !reference.is_empty() && !reference.trim().contains(' ');
    if single_word && hypothesis.split_whitespace().next() == Some(reference) {
        return (reference.to_string(), reference.to_string());
    }

    (reference.to_string(), hypothesis.to_string())
}
