//! Word error rate, character error rate and transcription accuracy
//!
//! WER and CER measure the distance from an ASR hypothesis to the target the
//! learner was asked to say. Accuracy measures how close the hypothesis is to
//! what a human reviewer actually heard. Every rate comes in a strict and a
//! lenient flavour (see [`crate::normalize`]) and is a percentage rounded to
//! two decimals.

use crate::alignment::{char_alignment, word_alignment};
use crate::normalize::{NormalizedPair, Normalization};

/// Round half away from zero to two decimal places
pub fn round_to_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// WER over an already normalized pair
///
/// Returns 0.0 when both sides are empty and 100.0 when the reference has no
/// words but the hypothesis is non-empty.
pub fn word_error_rate(pair: &NormalizedPair) -> f64 {
    if pair.reference.is_empty() && pair.hypothesis.is_empty() {
        return 0.0;
    }

    let reference_words = pair.reference.split_whitespace().count();
    if reference_words == 0 {
        return if pair.hypothesis.is_empty() { 0.0 } else { 100.0 };
    }

    let distance = word_alignment(&pair.hypothesis, &pair.reference).distance;
    round_to_two_decimals(distance as f64 / reference_words as f64 * 100.0)
}

/// CER over an already normalized pair, counted in code points
pub fn character_error_rate(pair: &NormalizedPair) -> f64 {
    if pair.reference.is_empty() && pair.hypothesis.is_empty() {
        return 0.0;
    }

    let reference_chars = pair.reference.chars().count();
    if reference_chars == 0 {
        return if pair.hypothesis.is_empty() { 0.0 } else { 100.0 };
    }

    let distance = char_alignment(&pair.hypothesis, &pair.reference).distance;
    round_to_two_decimals(distance as f64 / reference_chars as f64 * 100.0)
}

/// Similarity between the human transcription (`pair.reference`) and the ASR
/// hypothesis, clamped to [0, 100]. Empty input on either side scores 0.0.
pub fn transcription_accuracy(pair: &NormalizedPair) -> f64 {
    if pair.reference.is_empty() || pair.hypothesis.is_empty() {
        return 0.0;
    }

    let distance = char_alignment(&pair.hypothesis, &pair.reference).distance;
    let max_len = pair
        .reference
        .chars()
        .count()
        .max(pair.hypothesis.chars().count());

    let accuracy = (1.0 - distance as f64 / max_len as f64) * 100.0;
    round_to_two_decimals(accuracy.clamp(0.0, 100.0))
}

/// WER with lowercase/trim normalization only
pub fn wer_strict(reference: &str, hypothesis: &str) -> f64 {
    word_error_rate(&Normalization::Strict.pair(reference, hypothesis))
}

/// WER with full normalization and lenient equivalence
pub fn wer(reference: &str, hypothesis: &str) -> f64 {
    word_error_rate(&Normalization::Lenient.pair(reference, hypothesis))
}

/// CER with lowercase/trim normalization only
pub fn cer_strict(reference: &str, hypothesis: &str) -> f64 {
    character_error_rate(&Normalization::Strict.pair(reference, hypothesis))
}

/// CER with full normalization and lenient equivalence
pub fn cer(reference: &str, hypothesis: &str) -> f64 {
    character_error_rate(&Normalization::Lenient.pair(reference, hypothesis))
}

/// Accuracy with lowercase/trim normalization only
pub fn accuracy_strict(human: &str, hypothesis: &str) -> f64 {
    transcription_accuracy(&Normalization::Strict.pair(human, hypothesis))
}

/// Accuracy with full normalization and lenient equivalence
pub fn accuracy(human: &str, hypothesis: &str) -> f64 {
    transcription_accuracy(&Normalization::Lenient.pair(human, hypothesis))
}

/// Truncate to at most `max_bytes` bytes without splitting a code point
pub fn truncate_to_byte_length(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }

    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Cap a verbose hypothesis before its lenient metrics are computed.
///
/// With a non-empty comparison hypothesis from a second recognizer, the
/// hypothesis is cut to `max(target, comparison)` bytes. Without one it is
/// returned unchanged.
pub fn cap_hallucination<'a>(hypothesis: &'a str, target: &str, comparison: Option<&str>) -> &'a str {
    match comparison {
        Some(comparison) if !comparison.is_empty() => {
            truncate_to_byte_length(hypothesis, target.len().max(comparison.len()))
        }
        _ => hypothesis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wer_edge_cases() {
        assert_eq!(wer("", ""), 0.0);
        assert_eq!(wer("", "hello"), 100.0);
        assert_eq!(wer("hello world", "hello world"), 0.0);
        assert_eq!(wer("hello world", "foo bar"), 100.0);
        assert_eq!(wer_strict("", ""), 0.0);
        assert_eq!(wer_strict("   ", "hello"), 100.0);
    }

    #[test]
    fn test_wer_partial_errors() {
        assert_eq!(wer("hello world", "hello there"), 50.0);
        assert_eq!(wer("the quick brown", "the slow brown"), 33.33);
        assert_eq!(wer_strict("hello", "hello world"), 100.0);
        assert_eq!(wer("bore da", "bore dda"), 50.0);
    }

    #[test]
    fn test_wer_lenient_forgives_over_transcription() {
        assert_eq!(wer_strict("hello", "hello world"), 100.0);
        assert_eq!(wer("hello", "hello world"), 0.0);
    }

    #[test]
    fn test_wer_strict_keeps_punctuation() {
        assert_eq!(wer_strict("bore da", "bore da."), 50.0);
        assert_eq!(wer("bore da", "bore da."), 0.0);
    }

    #[test]
    fn test_cer_edge_cases() {
        assert_eq!(cer("", ""), 0.0);
        assert_eq!(cer("", "hello"), 100.0);
        assert_eq!(cer("hello", "hello"), 0.0);
        assert_eq!(cer("hello", "world"), 80.0);
    }

    #[test]
    fn test_cer_partial_errors() {
        assert_eq!(cer("cat", "bat"), 33.33);
        assert_eq!(cer("hello", "hallo"), 20.0);
        assert_eq!(cer_strict("cymraeg", "cymrag"), 14.29);
    }

    #[test]
    fn test_cer_counts_code_points() {
        // 1 edit over 2 code points, not 3 bytes
        assert_eq!(cer_strict("tŷ", "ty"), 50.0);
    }

    #[test]
    fn test_cer_lenient_ignores_spacing() {
        assert_eq!(cer_strict("bore da", "boreda"), 14.29);
        assert_eq!(cer("bore da", "boreda"), 0.0);
    }

    #[test]
    fn test_accuracy_edge_cases() {
        assert_eq!(accuracy("", ""), 0.0);
        assert_eq!(accuracy("hello", ""), 0.0);
        assert_eq!(accuracy("", "x"), 0.0);
        assert_eq!(accuracy("hello", "hello"), 100.0);
        assert_eq!(accuracy_strict("Hello", "hello"), 100.0);
    }

    #[test]
    fn test_accuracy_partial_match() {
        assert_eq!(accuracy("hello", "hallo"), 80.0);
        assert_eq!(accuracy("cat", "dog"), 0.0);
        // distance 2 over max length 5
        assert_eq!(accuracy_strict("cat", "cats!"), 60.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to_two_decimals(33.333333), 33.33);
        assert_eq!(round_to_two_decimals(66.666666), 66.67);
        assert_eq!(round_to_two_decimals(12.5), 12.5);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_to_byte_length("hello", 10), "hello");
        assert_eq!(truncate_to_byte_length("hello", 3), "hel");
        // "tŷ" is 1 + 2 bytes; cutting at 2 would split ŷ
        assert_eq!(truncate_to_byte_length("tŷ", 2), "t");
        assert_eq!(truncate_to_byte_length("ŷ", 1), "");
        assert_eq!(truncate_to_byte_length("abc", 0), "");
    }

    #[test]
    fn test_cap_hallucination() {
        let verbose = "rhyw reswm wrth y drws";
        assert_eq!(cap_hallucination(verbose, "rhyw", None), verbose);
        assert_eq!(cap_hallucination(verbose, "rhyw", Some("")), verbose);
        assert_eq!(cap_hallucination(verbose, "rhyw", Some("rhyw")), "rhyw");
        assert_eq!(cap_hallucination(verbose, "rhyw", Some("rhyw res")), "rhyw res");
        assert_eq!(cap_hallucination("rhyw", "rhyw", Some("r")), "rhyw");
    }
}
