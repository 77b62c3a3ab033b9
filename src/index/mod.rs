//! Commit indexing: which commit on a branch merged which pull request
//!
//! A branch's history is scanned from the tip backwards and every commit
//! whose summary references a PR number is recorded. When several commits
//! reference the same number, the most recent (tip-ward) one is kept.

mod rules;

pub use rules::{PrMatcher, PrRule};

use crate::error::Result;
use crate::repo::GitOps;
use crate::types::Commit;
use std::collections::HashMap;
use tracing::debug;

/// Ordered PR number → commit mapping for one branch
///
/// Iteration order is chronological (oldest first). The position of a PR is
/// where it was first seen walking forward; its commit is the latest one.
#[derive(Debug, Clone, Default)]
pub struct BranchCommitIndex {
    branch: String,
    entries: Vec<(u64, Commit)>,
    positions: HashMap<u64, usize>,
    skipped: usize,
}

impl BranchCommitIndex {
    /// Build an index from commits ordered tip → root
    pub fn from_commits(branch: impl Into<String>, commits: &[Commit], matcher: &PrMatcher) -> Self {
        let mut index = Self {
            branch: branch.into(),
            ..Self::default()
        };
        for commit in commits.iter().rev() {
            match matcher.pr_number(commit.summary()) {
                Some(number) => index.insert(number, commit.clone()),
                None => index.skipped += 1,
            }
        }
        index
    }

    fn insert(&mut self, number: u64, commit: Commit) {
        if let Some(&pos) = self.positions.get(&number) {
            self.entries[pos].1 = commit;
        } else {
            self.positions.insert(number, self.entries.len());
            self.entries.push((number, commit));
        }
    }

    /// Branch this index was built from
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Commit that merged `pr_number`, if any
    pub fn get(&self, pr_number: u64) -> Option<&Commit> {
        self.positions.get(&pr_number).map(|&pos| &self.entries[pos].1)
    }

    /// Whether the branch carries `pr_number`
    pub fn contains(&self, pr_number: u64) -> bool {
        self.positions.contains_key(&pr_number)
    }

    /// Number of indexed PRs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no commit referenced a PR
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Commits whose summary matched no rule
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Add PRs that only `other` carries
    ///
    /// PRs already indexed keep their commit; new ones are appended in
    /// `other`'s order.
    pub fn absorb(&mut self, other: &Self) {
        for (number, commit) in other.iter() {
            if !self.contains(number) {
                self.insert(number, commit.clone());
            }
        }
        self.skipped += other.skipped;
    }

    /// Entries in chronological order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Commit)> {
        self.entries.iter().map(|(n, c)| (*n, c))
    }
}

/// Index a branch of the repository
pub fn index_branch(
    repo: &dyn GitOps,
    branch: &str,
    matcher: &PrMatcher,
) -> Result<BranchCommitIndex> {
    let commits = repo.commits(branch)?;
    let index = BranchCommitIndex::from_commits(branch, &commits, matcher);
    debug!(
        branch,
        commits = commits.len(),
        indexed = index.len(),
        skipped = index.skipped(),
        "indexed branch"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(sha: &str, message: &str) -> Commit {
        Commit {
            sha: sha.to_string(),
            message: message.to_string(),
            author: "dev".to_string(),
        }
    }

    #[test]
    fn test_index_keeps_tipmost_commit() {
        // tip -> root
        let commits = vec![
            commit("c3", "again (#5)"),
            commit("c2", "other (#6)"),
            commit("c1", "first (#5)"),
        ];
        let index = BranchCommitIndex::from_commits("main", &commits, &PrMatcher::default());

        assert_eq!(index.len(), 2);
        assert_eq!(index.get(5).unwrap().sha, "c3");
        // position from first sighting, oldest first
        let order: Vec<u64> = index.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec![5, 6]);
    }

    #[test]
    fn test_index_counts_skipped() {
        let commits = vec![
            commit("c2", "chore: bump version"),
            commit("c1", "Merge pull request #1 from a/b"),
        ];
        let index = BranchCommitIndex::from_commits("main", &commits, &PrMatcher::default());
        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped(), 1);
        assert!(index.contains(1));
        assert!(!index.contains(2));
    }

    #[test]
    fn test_index_of_empty_history() {
        let index = BranchCommitIndex::from_commits("main", &[], &PrMatcher::default());
        assert!(index.is_empty());
        assert_eq!(index.branch(), "main");
    }

    #[test]
    fn test_absorb_prefers_existing_commit() {
        let matcher = PrMatcher::default();
        let mut main = BranchCommitIndex::from_commits(
            "master",
            &[commit("m2", "b (#2)"), commit("m1", "a (#1)")],
            &matcher,
        );
        let side = BranchCommitIndex::from_commits(
            "next",
            &[commit("n3", "c (#3)"), commit("n2", "b again (#2)"), commit("n0", "wip")],
            &matcher,
        );

        main.absorb(&side);

        assert_eq!(main.get(2).unwrap().sha, "m2");
        assert_eq!(main.get(3).unwrap().sha, "n3");
        let order: Vec<u64> = main.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(main.skipped(), 1);
        assert_eq!(main.branch(), "master");
    }

    #[test]
    fn test_index_uses_summary_only() {
        let commits = vec![commit("c1", "no ref here\n\nbody mentions (#9)")];
        let index = BranchCommitIndex::from_commits("main", &commits, &PrMatcher::default());
        assert!(index.is_empty());
    }
}
