//! Sequence alignment with operation backtracking
//!
//! One Levenshtein implementation, generic over the token type, serves both
//! character-level (CER, accuracy, vocabulary matching) and word-level (WER)
//! comparisons. Backtracking recovers the substitutions, deletions and
//! insertions that produce the minimum distance.

use serde::{Deserialize, Serialize};

/// Kind of a single edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Substitution,
    Deletion,
    Insertion,
}

impl std::fmt::Display for EditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            EditKind::Substitution => "substitution",
            EditKind::Deletion => "deletion",
            EditKind::Insertion => "insertion",
        })
    }
}

/// Order in which backtracking resolves a mismatch when several operations
/// reach the same minimum cost.
///
/// Reference outputs depend on this order. Changing it keeps the distance but
/// attributes the edits differently.
pub const TIE_BREAK_ORDER: [EditKind; 3] = [
    EditKind::Substitution,
    EditKind::Deletion,
    EditKind::Insertion,
];

/// A comparable alignment unit with a printable form
pub trait Token: PartialEq {
    fn render(&self) -> String;
}

impl Token for char {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl Token for &str {
    fn render(&self) -> String {
        (*self).to_string()
    }
}

impl Token for String {
    fn render(&self) -> String {
        self.clone()
    }
}

/// A single edit turning the source sequence into the target sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOperation {
    #[serde(rename = "type")]
    pub kind: EditKind,

    /// Index in the source sequence. Insertions use the post-deletion index
    /// where the token would go.
    pub position: usize,

    /// Target-side token, empty for deletions
    pub expected: String,

    /// Source-side token, empty for insertions
    pub actual: String,
}

/// Operations recovered by backtracking, grouped by kind
///
/// Each list is in traversal order: from the end of the source towards its
/// start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOperations {
    pub substitutions: Vec<EditOperation>,
    pub deletions: Vec<EditOperation>,
    pub insertions: Vec<EditOperation>,
    pub total: usize,
}

impl EditOperations {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            substitutions: Vec::with_capacity(capacity),
            deletions: Vec::with_capacity(capacity),
            insertions: Vec::with_capacity(capacity),
            total: 0,
        }
    }

    fn push(&mut self, operation: EditOperation) {
        match operation.kind {
            EditKind::Substitution => self.substitutions.push(operation),
            EditKind::Deletion => self.deletions.push(operation),
            EditKind::Insertion => self.insertions.push(operation),
        }
        self.total += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// All operations, substitutions first, then deletions, then insertions
    pub fn iter(&self) -> impl Iterator<Item = &EditOperation> {
        self.substitutions
            .iter()
            .chain(self.deletions.iter())
            .chain(self.insertions.iter())
    }

    /// Compact JSON form, as stored next to a reviewed attempt
    pub fn to_compact_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Serialize an operation set for storage. Absent operations yield `{}`.
pub fn edit_operations_to_compact_form(operations: Option<&EditOperations>) -> String {
    match operations {
        Some(ops) => ops.to_compact_json(),
        None => "{}".to_string(),
    }
}

/// Result of aligning two token sequences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub distance: usize,
    pub operations: EditOperations,
}

/// Align `source` against `target`.
///
/// When either side is empty no matrix is built: the distance is the other
/// side's length and the operations are all deletions or all insertions.
pub fn align<T: Token>(source: &[T], target: &[T]) -> Alignment {
    if source.is_empty() || target.is_empty() {
        return trivial_alignment(source, target);
    }

    let matrix = distance_matrix(source, target);
    let distance = matrix[source.len()][target.len()];
    let operations = backtrack(source, target, &matrix);

    Alignment {
        distance,
        operations,
    }
}

/// Tuple form of [`align`]
pub fn edit_distance_and_ops<T: Token>(source: &[T], target: &[T]) -> (usize, EditOperations) {
    let Alignment {
        distance,
        operations,
    } = align(source, target);
    (distance, operations)
}

/// Case-insensitive alignment over Unicode scalar values
pub fn char_alignment(source: &str, target: &str) -> Alignment {
    let source: Vec<char> = source.to_lowercase().chars().collect();
    let target: Vec<char> = target.to_lowercase().chars().collect();
    align(&source, &target)
}

/// Case-insensitive alignment over whitespace-separated words
pub fn word_alignment(source: &str, target: &str) -> Alignment {
    let source_lower = source.to_lowercase();
    let target_lower = target.to_lowercase();
    let source_words: Vec<&str> = source_lower.split_whitespace().collect();
    let target_words: Vec<&str> = target_lower.split_whitespace().collect();
    align(&source_words, &target_words)
}

/// Character-level edit distance without the operation list
pub fn char_distance(source: &str, target: &str) -> usize {
    char_alignment(source, target).distance
}

fn trivial_alignment<T: Token>(source: &[T], target: &[T]) -> Alignment {
    let mut operations = EditOperations::with_capacity(source.len().max(target.len()));

    for (i, token) in source.iter().enumerate().rev() {
        operations.push(EditOperation {
            kind: EditKind::Deletion,
            position: i,
            expected: String::new(),
            actual: token.render(),
        });
    }
    for token in target.iter().rev() {
        operations.push(EditOperation {
            kind: EditKind::Insertion,
            position: 0,
            expected: token.render(),
            actual: String::new(),
        });
    }

    Alignment {
        distance: source.len().max(target.len()),
        operations,
    }
}

fn distance_matrix<T: Token>(source: &[T], target: &[T]) -> Vec<Vec<usize>> {
    let n = source.len();
    let m = target.len();

    let mut matrix = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=n {
        for j in 1..=m {
            matrix[i][j] = if source[i - 1] == target[j - 1] {
                matrix[i - 1][j - 1]
            } else {
                (matrix[i - 1][j] + 1) // deletion
                    .min(matrix[i][j - 1] + 1) // insertion
                    .min(matrix[i - 1][j - 1] + 1) // substitution
            };
        }
    }

    matrix
}

fn edit_applies(kind: EditKind, matrix: &[Vec<usize>], i: usize, j: usize) -> bool {
    match kind {
        EditKind::Substitution => i > 0 && j > 0 && matrix[i][j] == matrix[i - 1][j - 1] + 1,
        EditKind::Deletion => i > 0 && matrix[i][j] == matrix[i - 1][j] + 1,
        EditKind::Insertion => j > 0 && matrix[i][j] == matrix[i][j - 1] + 1,
    }
}

fn backtrack<T: Token>(source: &[T], target: &[T], matrix: &[Vec<usize>]) -> EditOperations {
    let mut operations = EditOperations::with_capacity((source.len() + target.len()) / 2);

    let mut i = source.len();
    let mut j = target.len();

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && source[i - 1] == target[j - 1] {
            i -= 1;
            j -= 1;
            continue;
        }

        let Some(kind) = TIE_BREAK_ORDER
            .into_iter()
            .find(|&kind| edit_applies(kind, matrix, i, j))
        else {
            // Unreachable for a matrix built by distance_matrix
            break;
        };

        match kind {
            EditKind::Substitution => {
                operations.push(EditOperation {
                    kind,
                    position: i - 1,
                    expected: target[j - 1].render(),
                    actual: source[i - 1].render(),
                });
                i -= 1;
                j -= 1;
            }
            EditKind::Deletion => {
                operations.push(EditOperation {
                    kind,
                    position: i - 1,
                    expected: String::new(),
                    actual: source[i - 1].render(),
                });
                i -= 1;
            }
            EditKind::Insertion => {
                operations.push(EditOperation {
                    kind,
                    position: i,
                    expected: target[j - 1].render(),
                    actual: String::new(),
                });
                j -= 1;
            }
        }
    }

    operations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_strings() {
        let alignment = char_alignment("", "");
        assert_eq!(alignment.distance, 0);
        assert!(alignment.operations.is_empty());

        let alignment = char_alignment("hello", "");
        assert_eq!(alignment.distance, 5);
        assert_eq!(alignment.operations.total, 5);
        assert_eq!(alignment.operations.deletions.len(), 5);
        assert_eq!(alignment.operations.deletions[0].position, 4);
        assert_eq!(alignment.operations.deletions[0].actual, "o");

        let alignment = char_alignment("", "world");
        assert_eq!(alignment.distance, 5);
        assert_eq!(alignment.operations.insertions.len(), 5);
        assert!(alignment.operations.insertions.iter().all(|op| op.position == 0));
        assert_eq!(alignment.operations.insertions[0].expected, "d");
    }

    #[test]
    fn test_identical_and_case_insensitive() {
        assert_eq!(char_distance("hello", "hello"), 0);
        assert_eq!(char_distance("Hello", "hello"), 0);
        assert_eq!(char_distance("CYMRAEG", "cymraeg"), 0);
        assert!(char_alignment("CYMRAEG", "cymraeg").operations.is_empty());
    }

    #[test]
    fn test_single_substitution() {
        let alignment = char_alignment("cat", "bat");
        assert_eq!(alignment.distance, 1);
        assert_eq!(alignment.operations.substitutions.len(), 1);

        let op = &alignment.operations.substitutions[0];
        assert_eq!(op.kind, EditKind::Substitution);
        assert_eq!(op.position, 0);
        assert_eq!(op.expected, "b");
        assert_eq!(op.actual, "c");
    }

    #[test]
    fn test_single_insertion_and_deletion() {
        let alignment = char_alignment("cat", "cats");
        assert_eq!(alignment.distance, 1);
        assert_eq!(alignment.operations.insertions.len(), 1);
        assert_eq!(alignment.operations.insertions[0].position, 3);
        assert_eq!(alignment.operations.insertions[0].expected, "s");

        let alignment = char_alignment("cats", "cat");
        assert_eq!(alignment.distance, 1);
        assert_eq!(alignment.operations.deletions.len(), 1);
        assert_eq!(alignment.operations.deletions[0].position, 3);
        assert_eq!(alignment.operations.deletions[0].actual, "s");
    }

    #[test]
    fn test_welsh_words() {
        let alignment = char_alignment("cymraeg", "cymrag");
        assert_eq!(alignment.distance, 1);
        assert_eq!(alignment.operations.deletions.len(), 1);
        assert_eq!(alignment.operations.deletions[0].actual, "e");
        assert_eq!(alignment.operations.deletions[0].position, 5);

        assert_eq!(char_distance("bore", "hwyl"), 4);
    }

    #[test]
    fn test_unicode_counts_code_points() {
        assert_eq!(char_distance("café", "cafe"), 1);
        assert_eq!(char_distance("tŷ", "ty"), 1);
        assert_eq!(char_distance("Cymraeg", "Cymraeg"), 0);
    }

    #[test]
    fn test_tie_break_prefers_substitution() {
        // Two substitutions and delete+insert pairs cost the same here
        let alignment = char_alignment("ab", "ba");
        assert_eq!(alignment.distance, 2);
        assert_eq!(alignment.operations.substitutions.len(), 2);
        assert!(alignment.operations.deletions.is_empty());
        assert!(alignment.operations.insertions.is_empty());
        assert_eq!(alignment.operations.substitutions[0].position, 1);
        assert_eq!(alignment.operations.substitutions[1].position, 0);
    }

    #[test]
    fn test_tie_break_prefers_deletion_over_insertion() {
        // At (3,3) substitution does not reach the minimum; deletion and insertion both do
        let alignment = char_alignment("aba", "bab");
        let ops = &alignment.operations;
        assert_eq!(alignment.distance, 2);
        assert!(ops.substitutions.is_empty());

        assert_eq!(ops.deletions.len(), 1);
        assert_eq!(ops.deletions[0].position, 2);
        assert_eq!(ops.deletions[0].actual, "a");

        assert_eq!(ops.insertions.len(), 1);
        assert_eq!(ops.insertions[0].position, 0);
        assert_eq!(ops.insertions[0].expected, "b");

        let kinds: Vec<EditKind> = ops.iter().map(|op| op.kind).collect();
        assert_eq!(kinds, vec![EditKind::Deletion, EditKind::Insertion]);
    }

    #[test]
    fn test_completely_different() {
        let alignment = char_alignment("abc", "xyz");
        assert_eq!(alignment.distance, 3);
        assert_eq!(alignment.operations.substitutions.len(), 3);
    }

    #[test]
    fn test_word_operations() {
        let alignment = word_alignment("hello world", "hello there");
        assert_eq!(alignment.distance, 1);
        assert_eq!(alignment.operations.substitutions.len(), 1);
        assert_eq!(alignment.operations.substitutions[0].expected, "there");
        assert_eq!(alignment.operations.substitutions[0].actual, "world");

        let alignment = word_alignment("hello world", "hello beautiful world");
        assert_eq!(alignment.distance, 1);
        assert_eq!(alignment.operations.insertions.len(), 1);

        let alignment = word_alignment("hello beautiful world", "hello world");
        assert_eq!(alignment.distance, 1);
        assert_eq!(alignment.operations.deletions.len(), 1);
        assert_eq!(alignment.operations.deletions[0].actual, "beautiful");
    }

    #[test]
    fn test_word_empty_and_case() {
        assert_eq!(word_alignment("", "").distance, 0);
        assert_eq!(word_alignment("hello world", "").distance, 2);
        assert_eq!(word_alignment("", "hello world").distance, 2);
        assert_eq!(word_alignment("Hello World", "hello world").distance, 0);
    }

    #[test]
    fn test_generic_over_owned_strings() {
        let source = vec!["bore".to_string(), "da".to_string()];
        let target = vec!["bore".to_string(), "dda".to_string()];
        let (distance, ops) = edit_distance_and_ops(&source, &target);
        assert_eq!(distance, 1);
        assert_eq!(ops.substitutions[0].expected, "dda");
    }

    #[test]
    fn test_compact_form() {
        let alignment = char_alignment("cat", "bat");
        assert_eq!(
            edit_operations_to_compact_form(Some(&alignment.operations)),
            r#"{"substitutions":[{"type":"substitution","position":0,"expected":"b","actual":"c"}],"deletions":[],"insertions":[],"total":1}"#
        );
        assert_eq!(edit_operations_to_compact_form(None), "{}");
    }

    #[test]
    fn test_tie_break_constant() {
        assert_eq!(
            TIE_BREAK_ORDER,
            [EditKind::Substitution, EditKind::Deletion, EditKind::Insertion]
        );
    }
}
