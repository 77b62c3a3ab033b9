//! Serializable release report

use crate::reconcile::ReleaseState;
use crate::types::short_sha;
use serde::Serialize;

/// One cherry as exported in the report
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CherryEntry {
    /// Abbreviated main-branch hash, `None` for open PRs
    pub sha: Option<String>,
    /// PR number
    pub pr_number: u64,
    /// PR title
    pub pr_title: String,
    /// Whether the release branch already has it
    pub is_applied: bool,
}

/// A labeled PR that was closed without reaching the main branch
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MissingPullRequest {
    /// PR number
    pub pr_number: u64,
    /// PR title
    pub pr_title: String,
}

/// Snapshot of a release branch's cherry status
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseReport {
    /// Release branch
    pub branch: String,
    /// Main branch
    pub main_branch: String,
    /// Base ref the release was cut from
    pub base_ref: String,
    /// Cherries in processing order
    pub cherries: Vec<CherryEntry>,
    /// Labeled PRs not found on the main branch
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_pull_requests: Vec<MissingPullRequest>,
    /// Labels that don't exist in the tracker
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_labels: Vec<String>,
}

impl ReleaseReport {
    /// Build the report from gathered release state
    pub fn new(state: &ReleaseState, main_branch: &str, release_branch: &str) -> Self {
        let cherries = state
            .reconciliation
            .cherries
            .iter()
            .map(|c| CherryEntry {
                sha: c.commit.as_ref().map(|commit| short_sha(&commit.sha).to_string()),
                pr_number: c.pr.number,
                pr_title: c.pr.title.clone(),
                is_applied: c.is_applied,
            })
            .collect();

        let missing_pull_requests = state
            .reconciliation
            .missing
            .iter()
            .map(|pr| MissingPullRequest {
                pr_number: pr.number,
                pr_title: pr.title.clone(),
            })
            .collect();

        Self {
            branch: release_branch.to_string(),
            main_branch: main_branch.to_string(),
            base_ref: state.base_ref.clone(),
            cherries,
            missing_pull_requests,
            unknown_labels: state.labeled.unknown_labels.clone(),
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
