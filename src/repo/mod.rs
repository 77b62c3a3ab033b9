//! Local git repository access
//!
//! All reads and mutations of the working checkout go through [`GitOps`].
//! [`GitRepo`] implements it on top of the `git` executable; tests substitute
//! an in-memory double.

mod git;

pub use git::GitRepo;

use crate::error::{Error, Result};
use crate::types::{Commit, GitRemote, PickOutcome};

/// Operations the engine needs from version control
///
/// Implementations own the checkout for the duration of a run; callers
/// assume nothing else moves HEAD or branches concurrently.
pub trait GitOps {
    /// Commits reachable from `branch`, ordered tip → root
    fn commits(&self, branch: &str) -> Result<Vec<Commit>>;

    /// Best common ancestors of two refs (full hashes)
    fn merge_bases(&self, a: &str, b: &str) -> Result<Vec<String>>;

    /// Current branch name, or the commit hash when HEAD is detached
    fn current_head(&self) -> Result<String>;

    /// Full hash of HEAD
    fn head_sha(&self) -> Result<String>;

    /// Whether a local branch exists
    fn branch_exists(&self, branch: &str) -> Result<bool>;

    /// Fetch every configured remote
    fn fetch_all(&self) -> Result<()>;

    /// Check out a branch or commit
    fn checkout(&self, reference: &str) -> Result<()>;

    /// Create `name` pointing at `start` (does not check it out)
    fn create_branch(&self, name: &str, start: &str) -> Result<()>;

    /// Delete a local branch
    fn delete_branch(&self, name: &str, force: bool) -> Result<()>;

    /// Cherry-pick `sha` onto HEAD, recording its origin
    ///
    /// Merge commits are picked against their first parent. A failed pick
    /// is aborted and retried as a fast-forward pick that tolerates empty
    /// results. If that succeeds the change is already present and HEAD is
    /// left where it was.
    fn cherry_pick(&self, sha: &str) -> Result<PickOutcome>;

    /// Hard-reset the current branch and working tree to `reference`
    fn reset_hard(&self, reference: &str) -> Result<()>;

    /// Configured remotes
    fn remotes(&self) -> Result<Vec<GitRemote>>;
}

/// Select the remote to use for repository detection
///
/// If `specified` is given it must exist. Otherwise "origin" is preferred,
/// falling back to the first remote.
pub fn select_remote(remotes: &[GitRemote], specified: Option<&str>) -> Result<String> {
    if let Some(name) = specified {
        return remotes
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.name.clone())
            .ok_or_else(|| Error::RemoteNotFound(name.to_string()));
    }

    if remotes.is_empty() {
        return Err(Error::NoSupportedRemotes(
            "repository has no remotes".to_string(),
        ));
    }

    Ok(remotes
        .iter()
        .find(|r| r.name == "origin")
        .unwrap_or(&remotes[0])
        .name
        .clone())
}
