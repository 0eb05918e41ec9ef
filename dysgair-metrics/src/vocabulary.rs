//! Nearest-word lookup over the course vocabulary
//!
//! Used to attach a recording with no known target to the most likely
//! vocabulary word. Distances come from the same aligner as CER.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::alignment::char_alignment;
use crate::error::Result;
use crate::normalize::normalize_strict;

/// One entry of the vocabulary list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyWord {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub english: String,
}

/// A vocabulary word with its distance to a transcription
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordMatch {
    pub word: VocabularyWord,
    pub distance: usize,
    /// 1.0 for a perfect match, falling with distance
    pub score: f64,
}

/// Confidence for a distance between strings of `a_len` and `b_len` code points
pub fn match_confidence(distance: usize, a_len: usize, b_len: usize) -> f64 {
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 0.0;
    }
    1.0 - distance as f64 / max_len as f64
}

/// Keep letters and single spaces only, lowercased
pub fn normalize_for_matching(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<VocabularyWord>,
}

impl Vocabulary {
    pub fn new(words: Vec<VocabularyWord>) -> Self {
        Self { words }
    }

    /// Load a JSON array of vocabulary words
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let words: Vec<VocabularyWord> = serde_json::from_str(&content)?;
        info!(
            "Loaded {} vocabulary words from {}",
            words.len(),
            path.as_ref().display()
        );
        Ok(Self::new(words))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[VocabularyWord] {
        &self.words
    }

    fn scored(&self, normalized: &str) -> impl Iterator<Item = WordMatch> + '_ {
        let transcription_len = normalized.chars().count();
        let normalized = normalized.to_string();

        self.words.iter().map(move |word| {
            let candidate = normalize_strict(&word.text);
            let distance = char_alignment(&normalized, &candidate).distance;
            WordMatch {
                word: word.clone(),
                distance,
                score: match_confidence(distance, transcription_len, candidate.chars().count()),
            }
        })
    }

    /// Closest word by character distance. Ties go to the earliest word.
    pub fn best_match(&self, transcription: &str) -> Option<WordMatch> {
        let normalized = normalize_strict(transcription);
        if normalized.is_empty() {
            return None;
        }

        let mut best: Option<WordMatch> = None;
        for candidate in self.scored(&normalized) {
            if best
                .as_ref()
                .map_or(true, |current| candidate.distance < current.distance)
            {
                best = Some(candidate);
            }
        }

        if let Some(found) = &best {
            info!(
                "Best match for '{}' -> '{}' (distance={}, score={:.2})",
                transcription, found.word.text, found.distance, found.score
            );
        }

        best
    }

    /// Up to `n` closest words, nearest first, vocabulary order among ties
    pub fn top_matches(&self, transcription: &str, n: usize) -> Vec<WordMatch> {
        let normalized = normalize_strict(transcription);
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<WordMatch> = self.scored(&normalized).collect();
        matches.sort_by_key(|m| m.distance);
        matches.truncate(n);
        matches
    }

    /// Word whose letters-only form equals either transcription
    pub fn exact_match(&self, first: &str, second: &str) -> Option<&VocabularyWord> {
        let first = normalize_for_matching(first);
        let second = normalize_for_matching(second);

        self.words.iter().find(|word| {
            let candidate = normalize_for_matching(&word.text);
            !candidate.is_empty() && (candidate == first || candidate == second)
        })
    }
}
