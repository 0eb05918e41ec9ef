//! Configuration management

use anyhow::{Context, Result};
use dysgair_metrics::ScoringOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scoring switches passed through to the metrics crate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Truncate Whisper output to the longer of target and Wav2Vec2
    /// before lenient WER/CER
    pub cap_hallucinations: bool,

    /// Fill an empty human transcription with the target when a
    /// recognizer already matched it
    pub auto_populate_human: bool,

    /// Emit Whisper vs human character operations with each attempt
    pub include_edit_operations: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let options = ScoringOptions::default();
        Self {
            cap_hallucinations: options.cap_hallucinations,
            auto_populate_human: options.auto_populate_human,
            include_edit_operations: options.include_edit_operations,
        }
    }
}

/// Vocabulary lookup settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Number of candidates listed by `match`
    pub top_n: usize,

    /// JSON vocabulary used when `--vocabulary` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_path: Option<PathBuf>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            vocabulary_path: None,
        }
    }
}

/// Input guards for batch jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Longest accepted field, in characters. Alignment is quadratic.
    pub max_input_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 2000,
        }
    }
}

/// Review tool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Path to configuration file
    #[serde(skip)]
    pub config_path: PathBuf,

    pub scoring: ScoringConfig,
    pub matching: MatchingConfig,
    pub limits: LimitsConfig,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            config_path: Self::default_config_path(),
            scoring: ScoringConfig::default(),
            matching: MatchingConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl ReviewConfig {
    /// Load configuration from the default location, or create it
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save().context("Failed to save default config")?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file without writing anything
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config: ReviewConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&self.config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    pub fn to_scoring_options(&self) -> ScoringOptions {
        ScoringOptions {
            cap_hallucinations: self.scoring.cap_hallucinations,
            auto_populate_human: self.scoring.auto_populate_human,
            include_edit_operations: self.scoring.include_edit_operations,
        }
    }

    /// Get default config path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dysgair")
            .join("review.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReviewConfig::default();
        assert!(config.scoring.cap_hallucinations);
        assert!(config.scoring.auto_populate_human);
        assert!(!config.scoring.include_edit_operations);
        assert_eq!(config.matching.top_n, 5);
        assert!(config.matching.vocabulary_path.is_none());
        assert_eq!(config.limits.max_input_chars, 2000);
        assert_eq!(config.to_scoring_options(), ScoringOptions::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ReviewConfig = toml::from_str("[matching]\ntop_n = 3\n").unwrap();
        assert_eq!(config.matching.top_n, 3);
        assert_eq!(config.limits.max_input_chars, 2000);
        assert!(config.scoring.cap_hallucinations);
    }

    #[test]
    fn test_scoring_options_follow_config() {
        let config: ReviewConfig =
            toml::from_str("[scoring]\ncap_hallucinations = false\ninclude_edit_operations = true\n")
                .unwrap();
        let options = config.to_scoring_options();
        assert!(!options.cap_hallucinations);
        assert!(options.auto_populate_human);
        assert!(options.include_edit_operations);
    }

    #[test]
    fn test_default_path_name() {
        let path = ReviewConfig::default_config_path();
        assert!(path.ends_with("dysgair/review.toml"));
    }
}
