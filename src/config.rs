//! Configuration file handling.
//!
//! Every setting has a default matching the platform's stock behaviour, so
//! the tool runs with no config file at all. A TOML file can override any of
//! them.
//!
//! # Configuration Location
//!
//! - Linux: `~/.config/prisma-sbom/config.toml`
//! - macOS: `~/Library/Application Support/prisma-sbom/config.toml`
//! - Windows: `%APPDATA%\prisma-sbom\config.toml`
//!
//! A different file can be given with `--config`.
//!
//! # Example Configuration
//!
//! ```toml
//! token_ttl_secs = 60
//! credentials_file = "access-key-credentials.json"
//! token_file = "auth-token.txt"
//! output_dir = "."
//! request_timeout_secs = 30
//!
//! [top_cvss]
//! repositories = ["1f5f51d5-86cb-4482-9aa8-6bd2398e6d5a"]
//! severities = ["CRITICAL", "HIGH"]
//! size = 0
//!
//! [package_search]
//! statuses = ["OPEN"]
//! fixable_only = false
//! limit = 100
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::Severity;

/// Repository the dashboard query targets unless configured otherwise.
pub const DEFAULT_TOP_CVSS_REPOSITORY: &str = "1f5f51d5-86cb-4482-9aa8-6bd2398e6d5a";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long a cached token stays usable, in seconds.
    ///
    /// Default: 60
    pub token_ttl_secs: u64,

    /// JSON login payload sent to `/login` as-is.
    pub credentials_file: PathBuf,

    /// Where the bearer token is cached between runs.
    pub token_file: PathBuf,

    /// Directory that receives `sbom_*.csv` exports.
    pub output_dir: PathBuf,

    /// Per-request timeout. Unset means requests wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    pub top_cvss: TopCvssQuery,

    pub package_search: PackageSearchQuery,
}

/// Filter for the dashboard top-CVSS query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopCvssQuery {
    pub repositories: Vec<String>,
    pub severities: Vec<Severity>,
    pub size: u32,
}

impl Default for TopCvssQuery {
    fn default() -> Self {
        Self {
            repositories: vec![DEFAULT_TOP_CVSS_REPOSITORY.to_string()],
            severities: vec![Severity::Critical],
            size: 0,
        }
    }
}

/// Filter for the per-repository package search.
///
/// Only the first page of `limit` packages is ever requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageSearchQuery {
    pub statuses: Vec<String>,
    pub fixable_only: bool,
    pub limit: u32,
    pub include: Vec<String>,
    pub sort_by: Vec<String>,
}

impl Default for PackageSearchQuery {
    fn default() -> Self {
        Self {
            statuses: vec!["OPEN".to_string()],
            fixable_only: false,
            limit: 100,
            include: vec!["fixableErrorCount".to_string()],
            sort_by: vec!["fixableError".to_string()],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_ttl_secs: 60,
            credentials_file: PathBuf::from("access-key-credentials.json"),
            token_file: PathBuf::from("auth-token.txt"),
            output_dir: PathBuf::from("."),
            request_timeout_secs: None,
            top_cvss: TopCvssQuery::default(),
            package_search: PackageSearchQuery::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path, falling back to defaults
    /// when the file is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prisma-sbom")
            .join("config.toml")
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.token_ttl_secs, 60);
        assert_eq!(config.token_ttl(), Duration::from_secs(60));
        assert_eq!(
            config.credentials_file,
            PathBuf::from("access-key-credentials.json")
        );
        assert_eq!(config.token_file, PathBuf::from("auth-token.txt"));
        assert_eq!(config.request_timeout(), None);
        assert_eq!(
            config.top_cvss.repositories,
            vec![DEFAULT_TOP_CVSS_REPOSITORY.to_string()]
        );
        assert_eq!(config.top_cvss.severities, vec![Severity::Critical]);
        assert_eq!(config.top_cvss.size, 0);
        assert_eq!(config.package_search.limit, 100);
        assert_eq!(config.package_search.statuses, vec!["OPEN".to_string()]);
        assert!(!config.package_search.fixable_only);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            token_ttl_secs = 300

            [top_cvss]
            severities = ["CRITICAL", "HIGH"]
            "#,
        )
        .unwrap();

        assert_eq!(config.token_ttl_secs, 300);
        assert_eq!(
            config.top_cvss.severities,
            vec![Severity::Critical, Severity::High]
        );
        assert_eq!(
            config.top_cvss.repositories,
            vec![DEFAULT_TOP_CVSS_REPOSITORY.to_string()]
        );
        assert_eq!(config.package_search, PackageSearchQuery::default());
        assert_eq!(config.token_file, PathBuf::from("auth-token.txt"));
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.token_ttl_secs, 60);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = 15").unwrap();
        writeln!(file, "output_dir = \"/tmp/exports\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "token_ttl_secs = \"soon\"").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_unknown_severity_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
            [top_cvss]
            severities = ["SEVERE"]
            "#,
        );
        assert!(result.is_err());
    }
}
