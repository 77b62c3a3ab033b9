//! Apply planning - pure classification of cherries
//!
//! Decides, without touching the repository, which cherries need a
//! cherry-pick and which are settled up front.

use crate::types::{Cherry, Commit, PullRequest};
use std::collections::BTreeSet;

/// A single step in the apply plan
#[derive(Debug, Clone)]
pub enum ApplyStep {
    /// PR not merged to main yet; nothing to pick
    Open {
        /// The pull request
        pr: PullRequest,
    },
    /// Release branch already carries the PR
    AlreadyApplied {
        /// The pull request
        pr: PullRequest,
        /// Main-branch commit
        commit: Commit,
    },
    /// PR carries a blocking label
    Blocked {
        /// The pull request
        pr: PullRequest,
        /// Main-branch commit
        commit: Commit,
    },
    /// Cherry-pick this commit
    Pick {
        /// The pull request
        pr: PullRequest,
        /// Main-branch commit
        commit: Commit,
    },
}

impl ApplyStep {
    /// The pull request this step is about
    pub const fn pr(&self) -> &PullRequest {
        match self {
            Self::Open { pr }
            | Self::AlreadyApplied { pr, .. }
            | Self::Blocked { pr, .. }
            | Self::Pick { pr, .. } => pr,
        }
    }
}

impl std::fmt::Display for ApplyStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { pr } => write!(f, "open PR #{}: {}", pr.number, pr.title),
            Self::AlreadyApplied { pr, .. } => {
                write!(f, "already applied PR #{}: {}", pr.number, pr.title)
            }
            Self::Blocked { pr, commit } => write!(
                f,
                "blocked PR #{} ({}): {}",
                pr.number,
                commit.short_sha(),
                pr.title
            ),
            Self::Pick { pr, commit } => write!(
                f,
                "pick PR #{} ({}): {}",
                pr.number,
                commit.short_sha(),
                pr.title
            ),
        }
    }
}

/// Apply plan - ordered steps, one per cherry
#[derive(Debug, Clone, Default)]
pub struct ApplyPlan {
    /// Steps in PR processing order
    pub steps: Vec<ApplyStep>,
}

impl ApplyPlan {
    /// Number of cherry-picks the plan will attempt
    #[must_use]
    pub fn pick_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, ApplyStep::Pick { .. }))
            .count()
    }

    /// Whether nothing needs picking
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pick_count() == 0
    }
}

/// Create an apply plan (PURE - no I/O, easily testable)
///
/// Rules, in priority order: no commit → open; already applied → skip;
/// blocking label → blocked; otherwise pick.
#[must_use]
pub fn create_apply_plan(cherries: &[Cherry], blocking: &BTreeSet<u64>) -> ApplyPlan {
    let steps = cherries
        .iter()
        .map(|cherry| {
            let pr = cherry.pr.clone();
            match &cherry.commit {
                None => ApplyStep::Open { pr },
                Some(commit) if cherry.is_applied => ApplyStep::AlreadyApplied {
                    pr,
                    commit: commit.clone(),
                },
                Some(commit) if blocking.contains(&pr.number) => ApplyStep::Blocked {
                    pr,
                    commit: commit.clone(),
                },
                Some(commit) => ApplyStep::Pick {
                    pr,
                    commit: commit.clone(),
                },
            }
        })
        .collect();

    ApplyPlan { steps }
}
