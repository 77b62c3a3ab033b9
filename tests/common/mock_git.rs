//! In-memory git double for testing apply execution

#![allow(dead_code)]

use cherrytree::error::{Error, Result};
use cherrytree::repo::GitOps;
use cherrytree::types::{Commit, GitRemote, PickOutcome};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct RepoState {
    histories: HashMap<String, Vec<Commit>>,
    tips: HashMap<String, String>,
    head: String,
    merge_bases: Vec<String>,
    pick_outcomes: HashMap<String, PickOutcome>,
    next_commit: u64,
}

impl RepoState {
    fn resolve(&self, reference: &str) -> String {
        self.tips
            .get(reference)
            .cloned()
            .unwrap_or_else(|| reference.to_string())
    }

    /// Move the checked-out branch (or detached HEAD) to `sha`
    fn move_head(&mut self, sha: String) {
        if self.tips.contains_key(&self.head) {
            let head = self.head.clone();
            self.tips.insert(head, sha);
        } else {
            self.head = sha;
        }
    }
}

/// Mock `GitOps` tracking branch tips in memory
///
/// Cherry-picks succeed unless an outcome is scripted for the sha. A
/// successful pick moves the current branch to a fresh synthetic hash.
pub struct MockGitOps {
    state: Mutex<RepoState>,
    remotes: Mutex<Vec<GitRemote>>,
    // Call tracking
    pick_calls: Mutex<Vec<String>>,
    reset_calls: Mutex<Vec<String>>,
    checkout_calls: Mutex<Vec<String>>,
    created_branches: Mutex<Vec<(String, String)>>,
    deleted_branches: Mutex<Vec<String>>,
    fetch_count: AtomicUsize,
    // Error injection
    error_on_checkout: Mutex<Option<String>>,
    error_on_fetch: Mutex<Option<String>>,
    error_on_pick: Mutex<Option<(String, String)>>,
}

impl MockGitOps {
    /// Create an empty repository with `master` checked out
    pub fn new() -> Self {
        let state = RepoState {
            head: "master".to_string(),
            ..RepoState::default()
        };
        Self {
            state: Mutex::new(state),
            remotes: Mutex::new(Vec::new()),
            pick_calls: Mutex::new(Vec::new()),
            reset_calls: Mutex::new(Vec::new()),
            checkout_calls: Mutex::new(Vec::new()),
            created_branches: Mutex::new(Vec::new()),
            deleted_branches: Mutex::new(Vec::new()),
            fetch_count: AtomicUsize::new(0),
            error_on_checkout: Mutex::new(None),
            error_on_fetch: Mutex::new(None),
            error_on_pick: Mutex::new(None),
        }
    }

    // === Setup ===

    /// Add a branch with history ordered tip → root
    ///
    /// The tip is the first commit's sha, or `<name>-root` for an empty history.
    pub fn add_branch(&self, name: &str, commits: Vec<Commit>) {
        let tip = commits
            .first()
            .map_or_else(|| format!("{name}-root"), |c| c.sha.clone());
        let mut state = self.state.lock().unwrap();
        state.tips.insert(name.to_string(), tip);
        state.histories.insert(name.to_string(), commits);
    }

    /// Set the merge bases reported for any pair of refs
    pub fn set_merge_bases(&self, bases: &[&str]) {
        self.state.lock().unwrap().merge_bases = bases.iter().map(|s| (*s).to_string()).collect();
    }

    /// Script the result of picking `sha`
    pub fn set_pick_outcome(&self, sha: &str, outcome: PickOutcome) {
        self.state
            .lock()
            .unwrap()
            .pick_outcomes
            .insert(sha.to_string(), outcome);
    }

    /// Add a remote
    pub fn add_remote(&self, name: &str, url: &str) {
        self.remotes.lock().unwrap().push(GitRemote {
            name: name.to_string(),
            url: url.to_string(),
        });
    }

    /// Make `checkout` return an error
    pub fn fail_checkout(&self, msg: &str) {
        *self.error_on_checkout.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `fetch_all` return an error
    pub fn fail_fetch(&self, msg: &str) {
        *self.error_on_fetch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `cherry_pick` of `sha` return an error
    pub fn fail_cherry_pick(&self, sha: &str, msg: &str) {
        *self.error_on_pick.lock().unwrap() = Some((sha.to_string(), msg.to_string()));
    }

    // === Inspection ===

    /// Current tip of `branch`
    pub fn tip(&self, branch: &str) -> Option<String> {
        self.state.lock().unwrap().tips.get(branch).cloned()
    }

    /// Checked-out ref
    pub fn head(&self) -> String {
        self.state.lock().unwrap().head.clone()
    }

    /// Whether `branch` currently exists
    pub fn has_branch(&self, branch: &str) -> bool {
        self.state.lock().unwrap().tips.contains_key(branch)
    }

    /// Shas passed to `cherry_pick`, in call order
    pub fn pick_calls(&self) -> Vec<String> {
        self.pick_calls.lock().unwrap().clone()
    }

    /// Refs passed to `reset_hard`, in call order
    pub fn reset_calls(&self) -> Vec<String> {
        self.reset_calls.lock().unwrap().clone()
    }

    /// Refs passed to `checkout`, in call order
    pub fn checkout_calls(&self) -> Vec<String> {
        self.checkout_calls.lock().unwrap().clone()
    }

    /// `(name, start)` pairs passed to `create_branch`
    pub fn created_branches(&self) -> Vec<(String, String)> {
        self.created_branches.lock().unwrap().clone()
    }

    /// Branches passed to `delete_branch`
    pub fn deleted_branches(&self) -> Vec<String> {
        self.deleted_branches.lock().unwrap().clone()
    }

    /// Number of `fetch_all` calls
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

fn git_error(command: &str, msg: &str) -> Error {
    Error::GitCommand {
        command: command.to_string(),
        stderr: msg.to_string(),
    }
}

impl GitOps for MockGitOps {
    fn commits(&self, branch: &str) -> Result<Vec<Commit>> {
        self.state
            .lock()
            .unwrap()
            .histories
            .get(branch)
            .cloned()
            .ok_or_else(|| Error::BranchNotFound(branch.to_string()))
    }

    fn merge_bases(&self, _a: &str, _b: &str) -> Result<Vec<String>> {
        Ok(self.state.lock().unwrap().merge_bases.clone())
    }

    fn current_head(&self) -> Result<String> {
        Ok(self.head())
    }

    fn head_sha(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        Ok(state.resolve(&state.head))
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        Ok(self.has_branch(branch))
    }

    fn fetch_all(&self) -> Result<()> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = self.error_on_fetch.lock().unwrap().as_ref() {
            return Err(git_error("fetch --all", msg));
        }
        Ok(())
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.checkout_calls
            .lock()
            .unwrap()
            .push(reference.to_string());
        if let Some(msg) = self.error_on_checkout.lock().unwrap().as_ref() {
            return Err(git_error("checkout", msg));
        }
        self.state.lock().unwrap().head = reference.to_string();
        Ok(())
    }

    fn create_branch(&self, name: &str, start: &str) -> Result<()> {
        self.created_branches
            .lock()
            .unwrap()
            .push((name.to_string(), start.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.tips.contains_key(name) {
            return Err(git_error("branch", &format!("a branch named '{name}' already exists")));
        }
        let tip = state.resolve(start);
        let history = state.histories.get(start).cloned().unwrap_or_default();
        state.tips.insert(name.to_string(), tip);
        state.histories.insert(name.to_string(), history);
        Ok(())
    }

    fn delete_branch(&self, name: &str, _force: bool) -> Result<()> {
        self.deleted_branches.lock().unwrap().push(name.to_string());
        let mut state = self.state.lock().unwrap();
        if state.head == name {
            return Err(git_error(
                "branch -D",
                &format!("cannot delete branch '{name}' checked out"),
            ));
        }
        if state.tips.remove(name).is_none() {
            return Err(Error::BranchNotFound(name.to_string()));
        }
        state.histories.remove(name);
        Ok(())
    }

    fn cherry_pick(&self, sha: &str) -> Result<PickOutcome> {
        self.pick_calls.lock().unwrap().push(sha.to_string());
        if let Some((failing, msg)) = self.error_on_pick.lock().unwrap().as_ref() {
            if failing == sha {
                return Err(git_error("cherry-pick", msg));
            }
        }
        let mut state = self.state.lock().unwrap();
        let outcome = state
            .pick_outcomes
            .get(sha)
            .copied()
            .unwrap_or(PickOutcome::Applied);
        if outcome == PickOutcome::Applied {
            state.next_commit += 1;
            let new_sha = format!("pick{}-{sha}", state.next_commit);
            state.move_head(new_sha);
        }
        Ok(outcome)
    }

    fn reset_hard(&self, reference: &str) -> Result<()> {
        self.reset_calls.lock().unwrap().push(reference.to_string());
        let mut state = self.state.lock().unwrap();
        let target = state.resolve(reference);
        state.move_head(target);
        Ok(())
    }

    fn remotes(&self) -> Result<Vec<GitRemote>> {
        Ok(self.remotes.lock().unwrap().clone())
    }
}

/// Commit with a generated author
pub fn make_commit(sha: &str, message: &str) -> Commit {
    Commit {
        sha: sha.to_string(),
        message: message.to_string(),
        author: "Dev Eloper".to_string(),
    }
}
