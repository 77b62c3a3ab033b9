//! Reconciliation of labeled pull requests against two branches
//!
//! Two-phase pattern matching apply/:
//! 1. Gather - fetch labeled PRs and index both branches (effectful)
//! 2. Reconcile - join them into cherries (pure, testable)

mod report;

pub use report::{CherryEntry, MissingPullRequest, ReleaseReport};

use crate::error::{Error, Result};
use crate::index::{BranchCommitIndex, PrMatcher, index_branch};
use crate::platform::PlatformService;
use crate::pulls::{LabeledPullRequests, fetch_pull_requests};
use crate::repo::GitOps;
use crate::types::{Cherry, PullRequest};
use tracing::{debug, info};

/// Outcome of joining PRs with branch indexes
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// One cherry per actionable PR, in PR processing order
    pub cherries: Vec<Cherry>,
    /// Closed PRs with no commit on the main branch (dropped)
    pub missing: Vec<PullRequest>,
}

impl Reconciliation {
    /// Cherries already present on the release branch
    pub fn applied_count(&self) -> usize {
        self.cherries.iter().filter(|c| c.is_applied).count()
    }

    /// Cherries still to be picked
    pub fn pending_count(&self) -> usize {
        self.cherries
            .iter()
            .filter(|c| !c.is_applied && c.commit.is_some())
            .count()
    }

    /// Open PRs that must be merged to main first
    pub fn open_count(&self) -> usize {
        self.cherries.iter().filter(|c| c.commit.is_none()).count()
    }
}

/// Join PRs with the main and release indexes (PURE)
///
/// A closed PR with no main-branch commit was closed without merging and is
/// dropped into `missing`. Open PRs without a commit are kept with
/// `commit: None`.
pub fn reconcile(
    main: &BranchCommitIndex,
    release: &BranchCommitIndex,
    prs: &[PullRequest],
) -> Reconciliation {
    let mut result = Reconciliation::default();

    for pr in prs {
        let main_commit = main.get(pr.number);
        if main_commit.is_none() && !pr.is_open() {
            result.missing.push(pr.clone());
            continue;
        }
        result.cherries.push(Cherry {
            pr: pr.clone(),
            commit: main_commit.cloned(),
            is_applied: release.contains(pr.number),
        });
    }

    result
}

/// Resolve the base ref of the release branch
///
/// An explicit ref is returned as given. Otherwise the single merge base of
/// the two branches is used; none or several is a configuration error.
pub fn resolve_base_ref(
    repo: &dyn GitOps,
    main_branch: &str,
    release_branch: &str,
    explicit: Option<&str>,
) -> Result<String> {
    if let Some(base) = explicit {
        return Ok(base.to_string());
    }

    let mut bases = repo.merge_bases(main_branch, release_branch)?;
    match bases.len() {
        0 => Err(Error::NoCommonAncestor {
            main: main_branch.to_string(),
            release: release_branch.to_string(),
        }),
        1 => Ok(bases.remove(0)),
        count => Err(Error::AmbiguousMergeBase {
            main: main_branch.to_string(),
            release: release_branch.to_string(),
            count,
        }),
    }
}

/// Inputs for gathering a release's state
#[derive(Debug, Clone)]
pub struct ReleaseQuery<'a> {
    /// Main integration branch
    pub main_branch: &'a str,
    /// Further branches searched for PR commits after the main branch
    pub search_branches: &'a [String],
    /// Release branch
    pub release_branch: &'a str,
    /// Inclusion labels
    pub labels: &'a [String],
    /// Blocking labels
    pub blocking_labels: &'a [String],
    /// Explicit base ref, skips merge-base computation
    pub base_ref: Option<&'a str>,
}

/// Everything known about a release after gathering
#[derive(Debug, Clone)]
pub struct ReleaseState {
    /// Resolved base ref
    pub base_ref: String,
    /// Fetched PRs with blocking set
    pub labeled: LabeledPullRequests,
    /// Index of the main branch, extended by the search branches
    pub main_index: BranchCommitIndex,
    /// Index of the release branch
    pub release_index: BranchCommitIndex,
    /// Joined cherries
    pub reconciliation: Reconciliation,
}

/// Gather PRs and branch histories, then reconcile (EFFECTFUL)
#[allow(clippy::future_not_send)]
pub async fn gather_release(
    repo: &dyn GitOps,
    platform: &dyn PlatformService,
    matcher: &PrMatcher,
    query: &ReleaseQuery<'_>,
) -> Result<ReleaseState> {
    let base_ref = resolve_base_ref(
        repo,
        query.main_branch,
        query.release_branch,
        query.base_ref,
    )?;
    debug!(base_ref, "resolved base ref");

    let labeled = fetch_pull_requests(platform, query.labels, query.blocking_labels).await?;
    let mut main_index = index_branch(repo, query.main_branch, matcher)?;
    for branch in query.search_branches {
        if branch != query.main_branch {
            main_index.absorb(&index_branch(repo, branch, matcher)?);
        }
    }
    let release_index = index_branch(repo, query.release_branch, matcher)?;

    let reconciliation = reconcile(&main_index, &release_index, &labeled.pull_requests);
    info!(
        cherries = reconciliation.cherries.len(),
        applied = reconciliation.applied_count(),
        missing = reconciliation.missing.len(),
        "reconciled release"
    );

    Ok(ReleaseState {
        base_ref,
        labeled,
        main_index,
        release_index,
        reconciliation,
    })
}
