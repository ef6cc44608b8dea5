//! Configuration for the inventory run and the GitHub client

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Main configuration for an inventory run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Network configuration for the repository metadata API
    pub network: NetworkConfig,
    /// Fetch and report the license text of each dependency
    pub include_description: bool,
    /// Write a JSON report next to the CSV report
    pub write_json: bool,
    /// Directory the reports are written to
    pub output_dir: PathBuf,
}

/// Network configuration for API calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Base URL of the GitHub REST API
    pub api_base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// GitHub API token, sent as a bearer credential when present
    pub github_token: Option<String>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            include_description: true,
            write_json: true,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 30,
            github_token: std::env::var("GITHUB_PERSONAL_TOKEN")
                .or_else(|_| std::env::var("GITHUB_TOKEN"))
                .ok()
                .filter(|token| !token.trim().is_empty()),
        }
    }
}

impl NetworkConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}

impl InventoryConfig {
    /// Create a new builder for InventoryConfig
    pub fn builder() -> InventoryConfigBuilder {
        InventoryConfigBuilder::default()
    }

    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: InventoryConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Builder for InventoryConfig
#[derive(Default)]
pub struct InventoryConfigBuilder {
    network: Option<NetworkConfig>,
    include_description: Option<bool>,
    write_json: Option<bool>,
    output_dir: Option<PathBuf>,
}

impl InventoryConfigBuilder {
    pub fn network(mut self, network: NetworkConfig) -> Self {
        self.network = Some(network);
        self
    }

    pub fn include_description(mut self, include: bool) -> Self {
        self.include_description = Some(include);
        self
    }

    pub fn write_json(mut self, write: bool) -> Self {
        self.write_json = Some(write);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> InventoryConfig {
        let defaults = InventoryConfig::default();
        InventoryConfig {
            network: self.network.unwrap_or(defaults.network),
            include_description: self
                .include_description
                .unwrap_or(defaults.include_description),
            write_json: self.write_json.unwrap_or(defaults.write_json),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InventoryConfig::default();
        assert!(config.include_description);
        assert!(config.write_json);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.network.api_base_url, "https://api.github.com");
        assert_eq!(config.network.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_builder_overrides() {
        let config = InventoryConfig::builder()
            .include_description(false)
            .write_json(false)
            .output_dir("reports")
            .build();

        assert!(!config.include_description);
        assert!(!config.write_json);
        assert_eq!(config.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_base_url_trims_slash() {
        let network = NetworkConfig {
            api_base_url: "http://127.0.0.1:1234/".to_string(),
            timeout_secs: 5,
            github_token: None,
        };
        assert_eq!(network.base_url(), "http://127.0.0.1:1234");
    }

    #[test]
    fn test_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.toml");
        std::fs::write(
            &path,
            "include_description = false\n\n[network]\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = InventoryConfig::from_file(&path).unwrap();
        assert!(!config.include_description);
        assert!(config.write_json);
        assert_eq!(config.network.timeout_secs, 5);
        assert_eq!(config.network.api_base_url, "https://api.github.com");
    }
}
