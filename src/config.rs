//! Configuration file loading and resolution
//!
//! Settings come from `cherrytree.toml` at the repository root, falling back
//! to `<config dir>/cherrytree/config.toml`. Command-line values override
//! file values.

use crate::apply::DEFAULT_TEMP_BRANCH;
use crate::error::{Error, Result};
use crate::types::ErrorMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filename looked up at the repository root
pub const CONFIG_FILE: &str = "cherrytree.toml";

/// Main branch used when none is configured
pub const DEFAULT_MAIN_BRANCH: &str = "master";

/// Contents of a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Repository as `owner/name`
    pub repo: Option<String>,
    /// GitHub Enterprise host
    pub host: Option<String>,
    /// Remote used for repository detection
    pub remote: Option<String>,
    /// Main integration branch
    pub main_branch: Option<String>,
    /// Further branches searched for PR commits
    pub search_branches: Vec<String>,
    /// Inclusion labels
    pub labels: Vec<String>,
    /// Blocking labels
    pub blocking_labels: Vec<String>,
    /// Policy for blocked / conflicting cherries
    pub error_mode: Option<ErrorMode>,
    /// Extra PR number patterns, each with one capture group
    pub pr_patterns: Vec<String>,
    /// Name of the dry-run branch
    pub temp_branch: Option<String>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Repository as `owner/name`
    pub repo: Option<String>,
    /// Remote used for repository detection
    pub remote: Option<String>,
    /// Main integration branch
    pub main_branch: Option<String>,
    /// Further branches searched (replace configured ones when non-empty)
    pub search_branches: Vec<String>,
    /// Inclusion labels (replace configured ones when non-empty)
    pub labels: Vec<String>,
    /// Blocking labels (replace configured ones when non-empty)
    pub blocking_labels: Vec<String>,
    /// Policy for blocked / conflicting cherries
    pub error_mode: Option<ErrorMode>,
}

/// Fully resolved settings for one release branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Repository as `owner/name`, detected from remotes when `None`
    pub repo: Option<String>,
    /// GitHub Enterprise host
    pub host: Option<String>,
    /// Remote used for repository detection
    pub remote: Option<String>,
    /// Main integration branch
    pub main_branch: String,
    /// Further branches searched for PR commits
    pub search_branches: Vec<String>,
    /// Release branch
    pub release_branch: String,
    /// Inclusion labels
    pub labels: Vec<String>,
    /// Blocking labels
    pub blocking_labels: Vec<String>,
    /// Policy for blocked / conflicting cherries
    pub error_mode: ErrorMode,
    /// Extra PR number patterns
    pub pr_patterns: Vec<String>,
    /// Name of the dry-run branch
    pub temp_branch: String,
}

/// Label used when none is configured: `v<release>`
pub fn default_label(release_branch: &str) -> String {
    format!("v{release_branch}")
}

impl Settings {
    /// Merge file configuration with command-line overrides
    pub fn resolve(file: FileConfig, overrides: Overrides, release_branch: &str) -> Self {
        let pick = |cli: Vec<String>, file: Vec<String>| if cli.is_empty() { file } else { cli };

        let mut labels = pick(overrides.labels, file.labels);
        if labels.is_empty() {
            labels.push(default_label(release_branch));
        }

        Self {
            repo: overrides.repo.or(file.repo),
            host: file.host,
            remote: overrides.remote.or(file.remote),
            main_branch: overrides
                .main_branch
                .or(file.main_branch)
                .unwrap_or_else(|| DEFAULT_MAIN_BRANCH.to_string()),
            search_branches: pick(overrides.search_branches, file.search_branches),
            release_branch: release_branch.to_string(),
            labels,
            blocking_labels: pick(overrides.blocking_labels, file.blocking_labels),
            error_mode: overrides.error_mode.or(file.error_mode).unwrap_or_default(),
            pr_patterns: file.pr_patterns,
            temp_branch: file
                .temp_branch
                .unwrap_or_else(|| DEFAULT_TEMP_BRANCH.to_string()),
        }
    }
}

/// Path of the user-level configuration file
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cherrytree").join("config.toml"))
}

/// Find the configuration file to use, if any
pub fn find_config(repo_root: &Path) -> Option<PathBuf> {
    let local = repo_root.join(CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    user_config_path().filter(|p| p.is_file())
}

/// Parse configuration file contents
pub fn parse_config(content: &str, path: &Path) -> Result<FileConfig> {
    toml::from_str(content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Load configuration from `explicit` or the first file `find_config` finds
///
/// Returns the default configuration when no file exists. An explicit path
/// that doesn't exist is an error.
pub fn load_config(repo_root: &Path, explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match find_config(repo_root) {
            Some(p) => p,
            None => return Ok(FileConfig::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    debug!(path = %path.display(), "loaded configuration");
    parse_config(&content, &path)
}
