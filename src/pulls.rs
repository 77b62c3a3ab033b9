//! Pull request fetching by label
//!
//! Collects the pull requests carrying any inclusion or blocking label,
//! de-duplicates them and orders them by close time so cherries are applied
//! in the order their PRs were merged.

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::PullRequest;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

/// Pull requests selected for a release
#[derive(Debug, Clone, Default)]
pub struct LabeledPullRequests {
    /// Candidates in processing order (ascending close time, open last)
    pub pull_requests: Vec<PullRequest>,
    /// Numbers of PRs carrying a blocking label
    pub blocking: BTreeSet<u64>,
    /// Labels the tracker did not know
    pub unknown_labels: Vec<String>,
}

impl LabeledPullRequests {
    /// Whether `pr_number` carries a blocking label
    pub fn is_blocking(&self, pr_number: u64) -> bool {
        self.blocking.contains(&pr_number)
    }
}

/// Fetch the pull requests carrying one label
///
/// Returns `None` when the label doesn't exist; plain issues are dropped.
pub async fn fetch_label(
    platform: &dyn PlatformService,
    label: &str,
) -> Result<Option<Vec<PullRequest>>> {
    let Some(label_obj) = platform.get_label(label).await? else {
        warn!(label, "label not found, treating as empty");
        return Ok(None);
    };

    let prs: Vec<PullRequest> = platform
        .list_issues(&label_obj)
        .await?
        .into_iter()
        .filter_map(crate::types::Issue::into_pull_request)
        .collect();
    debug!(label, count = prs.len(), "fetched labeled pull requests");
    Ok(Some(prs))
}

/// Keep the first occurrence of each PR number, preserving order
pub fn deduplicate_prs(prs: Vec<PullRequest>) -> Vec<PullRequest> {
    let mut seen = HashSet::new();
    prs.into_iter().filter(|pr| seen.insert(pr.number)).collect()
}

/// Stable sort by close time; PRs without one sort as if closed at `now`
pub fn sort_by_close_time(prs: &mut [PullRequest], now: DateTime<Utc>) {
    prs.sort_by_key(|pr| pr.closed_at.unwrap_or(now));
}

/// Fetch, merge and order PRs for inclusion and blocking labels
pub async fn fetch_pull_requests(
    platform: &dyn PlatformService,
    labels: &[String],
    blocking_labels: &[String],
) -> Result<LabeledPullRequests> {
    let mut result = LabeledPullRequests::default();
    let mut all = Vec::new();

    for label in labels {
        match fetch_label(platform, label).await? {
            Some(prs) => all.extend(prs),
            None => result.unknown_labels.push(label.clone()),
        }
    }

    for label in blocking_labels {
        match fetch_label(platform, label).await? {
            Some(prs) => {
                result.blocking.extend(prs.iter().map(|pr| pr.number));
                all.extend(prs);
            }
            None => result.unknown_labels.push(label.clone()),
        }
    }

    let mut prs = deduplicate_prs(all);
    sort_by_close_time(&mut prs, Utc::now());
    debug!(
        count = prs.len(),
        blocking = result.blocking.len(),
        "collected pull requests"
    );
    result.pull_requests = prs;
    Ok(result)
}
