use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default GitHub REST API base URL
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default recursive-expansion bound for tree fetches
///
/// Directories nested at this depth are listed but not expanded, which caps
/// the number of outbound contents requests against a rate-limited API.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 2;

/// Policy applied when the repository structure cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StructureErrorPolicy {
    /// Propagate the fetch error and fail the whole analysis
    #[default]
    Fail,
    /// Substitute a placeholder structure and continue with an empty
    /// classification
    Placeholder,
}

/// Main configuration struct for the analyzer
///
/// Holds the API token, endpoint base, tree-walk depth bound, and the
/// degradation policy for structure-fetch failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API token for authenticated requests
    pub github_token: Option<String>,
    /// Base URL of the GitHub REST API
    pub api_base: String,
    /// Maximum directory depth expanded during a tree fetch
    pub max_tree_depth: usize,
    /// What to do when the structure fetch fails
    pub on_structure_error: StructureErrorPolicy,
}

impl Config {
    /// Creates a configuration from the process environment
    ///
    /// Reads `GITHUB_TOKEN` for authentication and `GITHUB_API_BASE_URL`
    /// for the endpoint base (the latter is mainly used by tests to point
    /// at a mock server).
    pub fn new() -> Self {
        Self {
            github_token: std::env::var("GITHUB_TOKEN").ok(),
            api_base: std::env::var("GITHUB_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            on_structure_error: StructureErrorPolicy::default(),
        }
    }

    /// Loads configuration from the default config file location
    ///
    /// If the config file doesn't exist, returns the default configuration.
    /// The config file is expected to be in TOML format.
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AnalyzerError::Config("Could not find config directory".into()))?;
        Self::load_from(&config_dir.join("repolens").join("config.toml"))
    }

    /// Loads configuration from a specific TOML file
    ///
    /// A missing file yields the default configuration; unreadable or
    /// malformed files are reported as [`AnalyzerError::Config`]. Fields
    /// absent from the file keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AnalyzerError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| AnalyzerError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Validates that the supplied token, if any, is usable
    pub fn ensure_token(&self) -> Result<()> {
        if let Some(token) = &self.github_token {
            if token.trim().is_empty() {
                return Err(AnalyzerError::new("GitHub token is empty"));
            }
        }
        Ok(())
    }

    /// Returns a copy with the tree-walk depth bound replaced
    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = depth;
        self
    }

    /// Returns a copy with the structure-error policy replaced
    pub fn with_structure_error_policy(mut self, policy: StructureErrorPolicy) -> Self {
        self.on_structure_error = policy;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config {
            github_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            on_structure_error: StructureErrorPolicy::default(),
        };

        assert_eq!(config.max_tree_depth, 2);
        assert_eq!(config.on_structure_error, StructureErrorPolicy::Fail);
        assert!(config.ensure_token().is_ok());
    }

    #[test]
    fn test_empty_token_rejected() {
        let config = Config {
            github_token: Some("   ".to_string()),
            api_base: DEFAULT_API_BASE.to_string(),
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            on_structure_error: StructureErrorPolicy::Fail,
        };

        assert!(config.ensure_token().is_err());
    }

    #[test]
    fn test_builder_style_overrides() {
        let config = Config {
            github_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            on_structure_error: StructureErrorPolicy::Fail,
        }
        .with_max_tree_depth(4)
        .with_structure_error_policy(StructureErrorPolicy::Placeholder);

        assert_eq!(config.max_tree_depth, 4);
        assert_eq!(
            config.on_structure_error,
            StructureErrorPolicy::Placeholder
        );
    }

    #[test]
    fn test_load_from_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.max_tree_depth, DEFAULT_MAX_TREE_DEPTH);
        assert_eq!(config.on_structure_error, StructureErrorPolicy::Fail);
    }

    #[test]
    fn test_load_from_reads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "max_tree_depth = 5\non_structure_error = \"placeholder\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.max_tree_depth, 5);
        assert_eq!(config.on_structure_error, StructureErrorPolicy::Placeholder);
        // Unspecified fields keep their defaults
        assert_eq!(config.api_base, Config::new().api_base);
    }

    #[test]
    fn test_load_from_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_tree_depth = \"not-a-number\"\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(AnalyzerError::Config(_))));
    }

    #[test]
    fn test_policy_toml_round_trip() {
        let config = Config {
            github_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            max_tree_depth: 3,
            on_structure_error: StructureErrorPolicy::Placeholder,
        };

        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.max_tree_depth, 3);
        assert_eq!(parsed.on_structure_error, StructureErrorPolicy::Placeholder);
    }
}
