//! Apply execution - effectful operations
//!
//! Takes an `ApplyPlan` and drives the repository: branch preparation,
//! cherry-picks, dry-run rollback and restoring the original HEAD.

use crate::apply::plan::{ApplyPlan, ApplyStep};
use crate::apply::progress::ProgressCallback;
use crate::error::Result;
use crate::repo::GitOps;
use crate::types::{CommitSummary, ErrorMode, PickOutcome, PullRequest};
use tracing::{debug, info, warn};

/// Default name of the disposable dry-run branch
pub const DEFAULT_TEMP_BRANCH: &str = "cherrytree-dryrun";

/// Options for applying a plan
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Release branch the cherries go onto
    pub release_branch: String,
    /// Branch to build; `None` means the release branch itself
    pub target_branch: Option<String>,
    /// Roll every pick back after recording it
    pub dry_run: bool,
    /// Policy for blocked and conflicting cherries
    pub error_mode: ErrorMode,
    /// Recreate an existing target branch from the release branch
    pub force_rebuild_target: bool,
    /// Name of the disposable branch used for dry runs
    pub temp_branch: String,
}

impl ApplyOptions {
    /// Options for `release_branch` with defaults otherwise
    pub fn new(release_branch: impl Into<String>) -> Self {
        Self {
            release_branch: release_branch.into(),
            target_branch: None,
            dry_run: false,
            error_mode: ErrorMode::default(),
            force_rebuild_target: false,
            temp_branch: DEFAULT_TEMP_BRANCH.to_string(),
        }
    }
}

/// Final state of one cherry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CherryStatus {
    /// Picked onto the working branch
    Applied,
    /// Picked cleanly and rolled back
    DryRunApplied,
    /// Release branch already had it
    SkippedAlreadyApplied,
    /// Content already present; nothing to commit
    SkippedEmpty,
    /// Pick conflicted
    Conflict,
    /// PR not merged to main
    Open,
    /// PR carries a blocking label
    Blocked,
}

impl CherryStatus {
    /// Whether this status marks the run as failed
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Conflict | Self::Open | Self::Blocked)
    }
}

impl std::fmt::Display for CherryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::DryRunApplied => write!(f, "applied (dry run)"),
            Self::SkippedAlreadyApplied => write!(f, "already applied"),
            Self::SkippedEmpty => write!(f, "empty"),
            Self::Conflict => write!(f, "conflict"),
            Self::Open => write!(f, "open"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

/// Recorded outcome for one cherry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CherryOutcome {
    /// PR number
    pub pr_number: u64,
    /// PR title
    pub pr_title: String,
    /// PR web URL
    pub html_url: String,
    /// Main-branch commit, if there is one
    pub sha: Option<String>,
    /// What happened
    pub status: CherryStatus,
}

impl CherryOutcome {
    fn new(pr: &PullRequest, sha: Option<&str>, status: CherryStatus) -> Self {
        Self {
            pr_number: pr.number,
            pr_title: pr.title.clone(),
            html_url: pr.html_url.clone(),
            sha: sha.map(String::from),
            status,
        }
    }
}

/// The branch cherries are applied to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingBranch {
    /// Branch name
    pub name: String,
    /// Whether it is the disposable dry-run branch
    pub temporary: bool,
}

/// Mutable state of a run, threaded through each step by value
#[derive(Debug, Clone)]
struct RunState {
    dry_run: bool,
    downgraded: bool,
    halted: bool,
    last_good: String,
    outcomes: Vec<CherryOutcome>,
    conflicts: Vec<CommitSummary>,
}

impl RunState {
    const fn new(dry_run: bool, start: String) -> Self {
        Self {
            dry_run,
            downgraded: false,
            halted: false,
            last_good: start,
            outcomes: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    fn record(mut self, outcome: CherryOutcome, progress: &dyn ProgressCallback) -> Self {
        progress.on_outcome(&outcome);
        self.outcomes.push(outcome);
        self
    }

    /// React to a blocked or conflicting cherry
    fn escalate(mut self, mode: ErrorMode, progress: &dyn ProgressCallback) -> Self {
        match mode {
            ErrorMode::Skip => {}
            ErrorMode::Dryrun => {
                if !self.dry_run {
                    warn!("switching remainder of run to dry-run");
                    progress.on_message("Switching to dry-run for the remaining cherries");
                    self.dry_run = true;
                    self.downgraded = true;
                }
            }
            ErrorMode::Break => {
                warn!("stopping run");
                progress.on_message("Stopping at first blocked or conflicting cherry");
                self.halted = true;
            }
        }
        self
    }

    fn finish(self, working_branch: WorkingBranch, start: String) -> ApplySummary {
        ApplySummary {
            working_branch,
            start,
            final_head: self.last_good,
            dry_run: self.dry_run,
            downgraded: self.downgraded,
            halted: self.halted,
            outcomes: self.outcomes,
            conflicts: self.conflicts,
        }
    }
}

/// Result of applying a plan
#[derive(Debug, Clone)]
pub struct ApplySummary {
    /// Branch the cherries were applied to
    pub working_branch: WorkingBranch,
    /// Working branch tip before processing
    pub start: String,
    /// Working branch tip after processing
    pub final_head: String,
    /// Whether the run ended in dry-run mode
    pub dry_run: bool,
    /// Whether a real run was switched to dry-run midway
    pub downgraded: bool,
    /// Whether processing stopped early
    pub halted: bool,
    /// Outcomes in processing order
    pub outcomes: Vec<CherryOutcome>,
    /// Conflict snapshots
    pub conflicts: Vec<CommitSummary>,
}

impl ApplySummary {
    /// Number of cherries with `status`
    pub fn count(&self, status: CherryStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Outcomes with `status`
    pub fn with_status(&self, status: CherryStatus) -> impl Iterator<Item = &CherryOutcome> {
        self.outcomes.iter().filter(move |o| o.status == status)
    }

    /// Whether any open, blocked or conflicting cherry was recorded
    pub fn has_errors(&self) -> bool {
        self.outcomes.iter().any(|o| o.status.is_error())
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> u8 {
        u8::from(self.has_errors())
    }
}

/// Check out (creating if needed) the branch to apply cherries to
///
/// Expects the release branch to be checked out already.
pub fn prepare_working_branch(repo: &dyn GitOps, options: &ApplyOptions) -> Result<WorkingBranch> {
    let release = options.release_branch.as_str();

    match options.target_branch.as_deref() {
        None if options.dry_run => {
            let temp = options.temp_branch.as_str();
            if repo.branch_exists(temp)? {
                debug!(branch = temp, "deleting stale temporary branch");
                repo.delete_branch(temp, true)?;
            }
            repo.create_branch(temp, release)?;
            repo.checkout(temp)?;
            Ok(WorkingBranch {
                name: temp.to_string(),
                temporary: true,
            })
        }
        None => Ok(WorkingBranch {
            name: release.to_string(),
            temporary: false,
        }),
        Some(target) => {
            let mut exists = repo.branch_exists(target)?;
            if exists && options.force_rebuild_target {
                debug!(branch = target, "recreating target branch");
                repo.delete_branch(target, true)?;
                exists = false;
            }
            if !exists {
                repo.create_branch(target, release)?;
            }
            repo.checkout(target)?;
            Ok(WorkingBranch {
                name: target.to_string(),
                temporary: false,
            })
        }
    }
}

fn apply_step(
    repo: &dyn GitOps,
    state: RunState,
    step: &ApplyStep,
    mode: ErrorMode,
    progress: &dyn ProgressCallback,
) -> Result<RunState> {
    match step {
        ApplyStep::Open { pr } => {
            Ok(state.record(CherryOutcome::new(pr, None, CherryStatus::Open), progress))
        }
        ApplyStep::AlreadyApplied { pr, commit } => Ok(state.record(
            CherryOutcome::new(pr, Some(&commit.sha), CherryStatus::SkippedAlreadyApplied),
            progress,
        )),
        ApplyStep::Blocked { pr, commit } => Ok(state
            .record(
                CherryOutcome::new(pr, Some(&commit.sha), CherryStatus::Blocked),
                progress,
            )
            .escalate(mode, progress)),
        ApplyStep::Pick { pr, commit } => {
            let mut state = state;
            match repo.cherry_pick(&commit.sha)? {
                PickOutcome::Applied if state.dry_run => {
                    repo.reset_hard(&state.last_good)?;
                    Ok(state.record(
                        CherryOutcome::new(pr, Some(&commit.sha), CherryStatus::DryRunApplied),
                        progress,
                    ))
                }
                PickOutcome::Applied => {
                    state.last_good = repo.head_sha()?;
                    Ok(state.record(
                        CherryOutcome::new(pr, Some(&commit.sha), CherryStatus::Applied),
                        progress,
                    ))
                }
                PickOutcome::AlreadyPresent => Ok(state.record(
                    CherryOutcome::new(pr, Some(&commit.sha), CherryStatus::SkippedEmpty),
                    progress,
                )),
                PickOutcome::Conflict => {
                    state.conflicts.push(CommitSummary::new(pr, commit));
                    Ok(state
                        .record(
                            CherryOutcome::new(pr, Some(&commit.sha), CherryStatus::Conflict),
                            progress,
                        )
                        .escalate(mode, progress))
                }
            }
        }
    }
}

/// Check out `reference`, logging instead of failing
fn restore_head(repo: &dyn GitOps, reference: &str) -> bool {
    match repo.checkout(reference) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, branch = reference, "could not restore original HEAD");
            false
        }
    }
}

/// Best-effort cleanup once a run has failed
///
/// Rolls the working branch back to `rollback` when given, restores HEAD
/// and drops the temporary branch. Failures are only logged.
fn abandon(repo: &dyn GitOps, working: &WorkingBranch, rollback: Option<&str>, restore_to: &str) {
    if let Some(sha) = rollback {
        if let Err(e) = repo.reset_hard(sha) {
            warn!(error = %e, to = sha, "could not roll back dry run");
        }
    }
    if !restore_head(repo, restore_to) {
        return;
    }
    if working.temporary {
        if let Err(e) = repo.delete_branch(&working.name, true) {
            warn!(error = %e, branch = %working.name, "could not delete temporary branch");
        }
    }
}

/// Execute the apply plan (EFFECTFUL)
///
/// Records HEAD, fetches, checks out the release branch, prepares the
/// working branch, processes every step and restores the original HEAD.
/// Dry runs (including runs downgraded midway) end with the working branch
/// reset to the last real successful pick.
///
/// A run started on the temporary branch returns to the release branch.
/// When a step fails the same rollback and restore are attempted before
/// the error is returned.
pub fn execute_apply(
    repo: &dyn GitOps,
    plan: &ApplyPlan,
    options: &ApplyOptions,
    progress: &dyn ProgressCallback,
) -> Result<ApplySummary> {
    let original_head = repo.current_head()?;
    debug!(head = %original_head, "recorded original HEAD");
    let restore_to = if original_head == options.temp_branch {
        warn!(
            branch = %original_head,
            "started on the temporary branch, returning to the release branch afterwards"
        );
        options.release_branch.clone()
    } else {
        original_head
    };

    repo.fetch_all()?;
    repo.checkout(&options.release_branch)?;
    let working = prepare_working_branch(repo, options).inspect_err(|_| {
        restore_head(repo, &restore_to);
    })?;
    let start = repo
        .head_sha()
        .inspect_err(|_| abandon(repo, &working, None, &restore_to))?;
    info!(
        branch = %working.name,
        dry_run = options.dry_run,
        mode = %options.error_mode,
        "applying cherries"
    );

    let mut state = RunState::new(options.dry_run, start.clone());
    for step in &plan.steps {
        let rollback = state.dry_run.then(|| state.last_good.clone());
        state = apply_step(repo, state, step, options.error_mode, progress)
            .inspect_err(|_| abandon(repo, &working, rollback.as_deref(), &restore_to))?;
        if state.halted {
            break;
        }
    }

    if state.dry_run {
        debug!(to = %state.last_good, "rolling back dry run");
        repo.reset_hard(&state.last_good)
            .inspect_err(|_| abandon(repo, &working, None, &restore_to))?;
    }

    repo.checkout(&restore_to)?;
    if working.temporary {
        repo.delete_branch(&working.name, true)?;
    }

    Ok(state.finish(working, start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        assert!(CherryStatus::Conflict.is_error());
        assert!(CherryStatus::Open.is_error());
        assert!(CherryStatus::Blocked.is_error());
        assert!(!CherryStatus::SkippedEmpty.is_error());
        assert!(!CherryStatus::DryRunApplied.is_error());
    }

    #[test]
    fn test_apply_options_defaults() {
        let options = ApplyOptions::new("1.0");
        assert_eq!(options.release_branch, "1.0");
        assert_eq!(options.temp_branch, DEFAULT_TEMP_BRANCH);
        assert_eq!(options.error_mode, ErrorMode::Skip);
        assert!(!options.dry_run);
    }
}
