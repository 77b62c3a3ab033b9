//! Core types for cherrytree

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of hex characters shown for abbreviated commit hashes
pub const SHORT_SHA_LEN: usize = 12;

/// A git commit as read from branch history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commit {
    /// Full commit hash (hex)
    pub sha: String,
    /// Full commit message
    pub message: String,
    /// Author name
    pub author: String,
}

impl Commit {
    /// Abbreviated hash, at most [`SHORT_SHA_LEN`] characters
    pub fn short_sha(&self) -> &str {
        short_sha(&self.sha)
    }

    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim()
    }
}

/// Abbreviate a commit hash to [`SHORT_SHA_LEN`] characters
pub fn short_sha(sha: &str) -> &str {
    sha.get(..SHORT_SHA_LEN).unwrap_or(sha)
}

/// Issue / pull request state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// Still open
    Open,
    /// Closed, merged or not
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// A label as known by the issue tracker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    /// Label name
    pub name: String,
}

/// An issue-tracker entry returned by a label query
///
/// GitHub lists pull requests through the issues API; `is_pull_request`
/// distinguishes them from plain issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue / PR number
    pub number: u64,
    /// Title
    pub title: String,
    /// Open or closed
    pub state: PrState,
    /// When the issue was closed, if it was
    pub closed_at: Option<DateTime<Utc>>,
    /// Login of the author
    pub author: String,
    /// Login of whoever closed it (the merger, for merged PRs)
    pub closed_by: Option<String>,
    /// Web URL
    pub html_url: String,
    /// Whether the entry is a pull request rather than an issue
    pub is_pull_request: bool,
}

impl Issue {
    /// Convert into a `PullRequest`, or `None` for plain issues
    pub fn into_pull_request(self) -> Option<PullRequest> {
        if !self.is_pull_request {
            return None;
        }
        Some(PullRequest {
            number: self.number,
            title: self.title,
            state: self.state,
            closed_at: self.closed_at,
            author: self.author,
            closed_by: self.closed_by,
            html_url: self.html_url,
        })
    }
}

/// A pull request selected by label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Open or closed
    pub state: PrState,
    /// Close (merge) timestamp
    pub closed_at: Option<DateTime<Utc>>,
    /// Login of the author
    pub author: String,
    /// Login of the user who closed / merged it
    pub closed_by: Option<String>,
    /// Web URL for the PR
    pub html_url: String,
}

impl PullRequest {
    /// Whether the PR is still open
    pub fn is_open(&self) -> bool {
        self.state == PrState::Open
    }
}

/// A git remote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitRemote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Remote URL
    pub url: String,
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl std::fmt::Display for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

// =============================================================================
// Reconciliation types
// =============================================================================

/// One labeled pull request paired with its main-branch commit
///
/// `commit` is `None` for pull requests that are still open and have not been
/// merged to the main branch yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cherry {
    /// The pull request
    pub pr: PullRequest,
    /// Commit that merged the PR into the main branch
    pub commit: Option<Commit>,
    /// Whether the release branch already carries this PR
    pub is_applied: bool,
}

/// Snapshot of a conflicting cherry for end-of-run reporting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitSummary {
    /// PR number
    pub pr_number: u64,
    /// PR title
    pub pr_title: String,
    /// Full hash of the main-branch commit
    pub sha: String,
    /// Commit author
    pub author: String,
    /// Login of whoever merged the PR
    pub merged_by: String,
}

impl CommitSummary {
    /// Capture the summary of a cherry's commit
    pub fn new(pr: &PullRequest, commit: &Commit) -> Self {
        Self {
            pr_number: pr.number,
            pr_title: pr.title.clone(),
            sha: commit.sha.clone(),
            author: commit.author.clone(),
            merged_by: pr.closed_by.clone().unwrap_or_default(),
        }
    }
}

/// What to do when a cherry is blocked or conflicts
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Record the event and keep going
    #[default]
    Skip,
    /// Record the event and finish the run as a dry run
    Dryrun,
    /// Record the event and stop processing
    Break,
}

impl std::fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Dryrun => write!(f, "dryrun"),
            Self::Break => write!(f, "break"),
        }
    }
}

/// Result of a single cherry-pick attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// The commit was applied on top of HEAD
    Applied,
    /// The change is already present; nothing was committed
    AlreadyPresent,
    /// The pick conflicted and was aborted
    Conflict,
}

/// Truncate `value` to `width` columns, appending `...` when cut, and pad
pub fn truncate_str(value: &str, width: usize) -> String {
    const CONT: &str = "...";
    let trimmed = value.trim();
    let out = if trimmed.chars().count() > width {
        let keep = width.saturating_sub(CONT.len());
        let head: String = trimmed.chars().take(keep).collect();
        format!("{}{CONT}", head.trim_end())
    } else {
        trimmed.to_string()
    };
    format!("{out:<width$}")
}
