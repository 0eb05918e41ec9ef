//! Version information and build metadata display

use std::fmt;

use dysgair_metrics::{AsrModel, TIE_BREAK_ORDER};

/// Version and build details for the review tool
pub struct VersionInfo {
    pub version: &'static str,
    /// Target triple (e.g., x86_64-unknown-linux-gnu)
    pub target: &'static str,
    /// Build profile (debug or release)
    pub profile: &'static str,
    pub git_commit: Option<&'static str>,
    pub rustc_version: Option<&'static str>,
    pub build_timestamp: &'static str,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            target: env!("TARGET"),
            profile: if cfg!(debug_assertions) {
                "debug"
            } else {
                "release"
            },
            git_commit: option_env!("GIT_COMMIT_HASH"),
            rustc_version: option_env!("DYSGAIR_RUSTC_VERSION"),
            build_timestamp: env!("BUILD_TIMESTAMP"),
        }
    }

    /// Recognizers whose output the scorer understands
    pub fn scored_models(&self) -> Vec<AsrModel> {
        vec![AsrModel::Whisper, AsrModel::Wav2Vec2]
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dysgair-review {}", self.version)?;
        writeln!(f)?;

        writeln!(f, "Build Information:")?;
        writeln!(f, "  Target:       {}", self.target)?;
        writeln!(f, "  Profile:      {}", self.profile)?;
        writeln!(f, "  Build Date:   {}", self.build_timestamp)?;

        if let Some(commit) = self.git_commit {
            writeln!(f, "  Git Commit:   {}", commit)?;
        }

        if let Some(rustc) = self.rustc_version {
            writeln!(f, "  Compiler:     {}", rustc)?;
        }

        writeln!(f)?;
        writeln!(f, "Scoring:")?;
        let models: Vec<String> = self.scored_models().iter().map(|m| m.to_string()).collect();
        writeln!(f, "  Models:       {}", models.join(", "))?;
        let order: Vec<String> = TIE_BREAK_ORDER.iter().map(|k| k.to_string()).collect();
        writeln!(f, "  Tie-break:    {}", order.join(" > "))?;

        Ok(())
    }
}

/// Short version string
pub fn version_short() -> String {
    format!("dysgair-review {}", env!("CARGO_PKG_VERSION"))
}

/// Long version string with build metadata
pub fn version_long() -> String {
    VersionInfo::current().to_string()
}
