//! Configuration file round-trips

use dysgair_review::ReviewConfig;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_save_then_load_from() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("review.toml");

    let mut config = ReviewConfig::default();
    config.config_path = path.clone();
    config.scoring.include_edit_operations = true;
    config.matching.top_n = 2;
    config.matching.vocabulary_path = Some(PathBuf::from("/srv/dysgair/words.json"));
    config.limits.max_input_chars = 500;
    config.save().unwrap();

    let loaded = ReviewConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.to_scoring_options().include_edit_operations);
}

#[test]
fn test_saved_file_is_sectioned_toml() {
    let dir = tempdir().unwrap();
    let mut config = ReviewConfig::default();
    config.config_path = dir.path().join("review.toml");
    config.save().unwrap();

    let contents = std::fs::read_to_string(&config.config_path).unwrap();
    assert!(contents.contains("[scoring]"));
    assert!(contents.contains("cap_hallucinations = true"));
    assert!(contents.contains("[limits]"));
    assert!(!contents.contains("vocabulary_path"));
}

#[test]
fn test_load_from_missing_file_fails_without_creating_it() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ReviewConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
    assert!(!path.exists());
}

#[test]
fn test_load_from_invalid_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("review.toml");
    std::fs::write(&path, "[scoring\ncap_hallucinations = ").unwrap();

    let err = ReviewConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
