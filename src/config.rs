//! Reconciliation configuration
//!
//! Every tunable that shapes detection and merging lives here, so embedding
//! pipelines can adjust the false-positive/negative trade-off without
//! touching the passes themselves.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one reconciliation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Parameter-name similarity at or above this ratio is treated as a
    /// match (0.0 - 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Minimum comments for an open issue to count as a common problem
    #[serde(default = "default_common_problem_comments")]
    pub common_problem_comments: u32,

    /// Minimum comments for a closed issue to count as a known solution
    #[serde(default = "default_known_solution_comments")]
    pub known_solution_comments: u32,

    /// Maximum entries kept in label statistics
    #[serde(default = "default_top_labels_cap")]
    pub top_labels_cap: usize,

    /// Character cap for the GitHub documentation excerpt
    #[serde(default = "default_excerpt_max_chars")]
    pub excerpt_max_chars: usize,

    /// Minimum length of an API-derived keyword used for issue linking
    #[serde(default = "default_min_keyword_len")]
    pub min_keyword_len: usize,
}

fn default_similarity_threshold() -> f32 {
    crate::conflict::PARAM_NAME_SIMILARITY_THRESHOLD
}

fn default_common_problem_comments() -> u32 {
    crate::issues::COMMON_PROBLEM_COMMENT_THRESHOLD
}

fn default_known_solution_comments() -> u32 {
    crate::issues::KNOWN_SOLUTION_COMMENT_THRESHOLD
}

fn default_top_labels_cap() -> usize {
    crate::issues::TOP_LABELS_CAP
}

fn default_excerpt_max_chars() -> usize {
    crate::merge::DOC_EXCERPT_MAX_CHARS
}

fn default_min_keyword_len() -> usize {
    crate::issues::MIN_API_KEYWORD_LEN
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            common_problem_comments: default_common_problem_comments(),
            known_solution_comments: default_known_solution_comments(),
            top_labels_cap: default_top_labels_cap(),
            excerpt_max_chars: default_excerpt_max_chars(),
            min_keyword_len: default_min_keyword_len(),
        }
    }
}

impl ReconcileConfig {
    /// Load configuration from a TOML file or return defaults when the
    /// file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: ReconcileConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_named_constants() {
        let config = ReconcileConfig::default();
        assert!((config.similarity_threshold - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.common_problem_comments, 5);
        assert_eq!(config.known_solution_comments, 1);
        assert_eq!(config.top_labels_cap, 10);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReconcileConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.top_labels_cap, 10);
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docfuse.toml");

        let mut config = ReconcileConfig::default();
        config.similarity_threshold = 0.9;
        config.top_labels_cap = 3;
        config.save(&path).unwrap();

        let loaded = ReconcileConfig::load_or_default(&path).unwrap();
        assert!((loaded.similarity_threshold - 0.9).abs() < f32::EPSILON);
        assert_eq!(loaded.top_labels_cap, 3);
        // Unspecified fields keep their defaults through the round trip.
        assert_eq!(loaded.common_problem_comments, 5);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ReconcileConfig = toml::from_str("similarity_threshold = 0.5").unwrap();
        assert!((config.similarity_threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.min_keyword_len, 3);
    }
}
