//! Property-based tests for alignment, normalization and attribution

use dysgair_metrics::{
    align, char_alignment, classify, classify_strict, normalize_lenient, normalize_strict,
    truncate_to_byte_length, ErrorClassification,
};
use proptest::prelude::*;

fn welsh_text() -> impl Strategy<Value = String> {
    "[a-zA-Zâêîôûŵŷ .,!'-]{0,16}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn property_distance_to_self_is_zero(s in welsh_text()) {
        prop_assert_eq!(char_alignment(&s, &s).distance, 0);
    }

    #[test]
    fn property_distance_is_symmetric(a in welsh_text(), b in welsh_text()) {
        prop_assert_eq!(char_alignment(&a, &b).distance, char_alignment(&b, &a).distance);
    }

    #[test]
    fn property_triangle_inequality(a in welsh_text(), b in welsh_text(), c in welsh_text()) {
        let ac = char_alignment(&a, &c).distance;
        let ab = char_alignment(&a, &b).distance;
        let bc = char_alignment(&b, &c).distance;
        prop_assert!(ac <= ab + bc);
    }

    #[test]
    fn property_operation_count_matches_distance(a in welsh_text(), b in welsh_text()) {
        let alignment = char_alignment(&a, &b);
        let ops = &alignment.operations;
        prop_assert_eq!(ops.total, ops.substitutions.len() + ops.deletions.len() + ops.insertions.len());
        prop_assert_eq!(ops.total, alignment.distance);
    }

    #[test]
    fn property_word_operation_count_matches_distance(
        a in prop::collection::vec("[a-c]{1,2}", 0..8),
        b in prop::collection::vec("[a-c]{1,2}", 0..8),
    ) {
        let alignment = align(&a, &b);
        prop_assert_eq!(alignment.operations.total, alignment.distance);
        prop_assert!(alignment.distance <= a.len().max(b.len()));
    }

    #[test]
    fn property_normalization_is_idempotent(s in welsh_text()) {
        let lenient = normalize_lenient(&s);
        prop_assert_eq!(normalize_lenient(&lenient), lenient.clone());
        let strict = normalize_strict(&s);
        prop_assert_eq!(normalize_strict(&strict), strict.clone());
    }

    #[test]
    fn property_identical_inputs_are_correct(t in "[a-z]{1,10}( [a-z]{1,10})?") {
        prop_assert_eq!(classify(&t, &t, &t), ErrorClassification::Correct);
        prop_assert_eq!(classify_strict(&t, &t, &t), ErrorClassification::Correct);
    }

    #[test]
    fn property_truncation_is_valid_prefix(s in "[a-zŷâ]{0,12}", max in 0usize..30) {
        let cut = truncate_to_byte_length(&s, max);
        prop_assert!(cut.len() <= max);
        prop_assert!(s.starts_with(cut));
    }
}
