//! Temporary git repository fixture

#![allow(dead_code)]

use cherrytree::repo::GitRepo;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Release branch used by [`TempGitRepo::release_scenario`]
pub const RELEASE: &str = "1.0";

/// A throwaway git repository driven through the `git` executable
pub struct TempGitRepo {
    dir: TempDir,
}

/// Hashes of the commits created by [`TempGitRepo::release_scenario`]
pub struct ReleaseScenario {
    /// Commit both branches start from
    pub base: String,
    /// `fix a (#10)` on master, also picked onto the release branch
    pub pr10: String,
    /// `Merge pull request #11 from user/fix`, a two-parent merge on master
    /// that picks cleanly
    pub pr11: String,
    /// Commit on the `user/fix` side of the #11 merge
    pub pr11_side: String,
    /// Edits `shared.txt`, conflicts with the release branch
    pub pr20: String,
    /// Adds `c.txt`, which the release branch already has verbatim
    pub pr30: String,
}

impl TempGitRepo {
    /// Initialize an empty repository on `master`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = Self { dir };
        repo.git(&["init", "--quiet", "--initial-branch=master"]);
        repo.git(&["config", "user.email", "test@test.com"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    /// Repository root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open the repository through the library
    pub fn repo(&self) -> GitRepo {
        GitRepo::open(self.path()).expect("open repo")
    }

    /// Run git, panicking on failure, returning trimmed stdout
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Write `file` and commit it, returning the new hash
    pub fn commit_file(&self, file: &str, content: &str, message: &str) -> String {
        fs::write(self.path().join(file), content).expect("write file");
        self.git(&["add", file]);
        self.git(&["commit", "--quiet", "-m", message]);
        self.git(&["rev-parse", "HEAD"])
    }

    /// Full hash of a ref
    pub fn rev(&self, reference: &str) -> String {
        self.git(&["rev-parse", reference])
    }

    /// Number of parents of `reference`
    pub fn parent_count(&self, reference: &str) -> usize {
        self.git(&["rev-list", "--parents", "-n", "1", reference])
            .split_whitespace()
            .count()
            - 1
    }

    /// Whether a cherry-pick is still in progress
    pub fn cherry_pick_in_progress(&self) -> bool {
        self.path().join(".git").join("CHERRY_PICK_HEAD").exists()
    }

    /// Build a master / release pair covering every pick outcome
    ///
    /// master:  base, #10, merge of user/fix as #11, #20, #30
    /// 1.0:     base, #10 (picked), own edit of shared.txt, own c.txt
    ///
    /// Leaves master checked out.
    pub fn release_scenario(&self) -> ReleaseScenario {
        let base = self.commit_file("shared.txt", "base\n", "Initial commit");
        self.git(&["branch", RELEASE]);

        let pr10 = self.commit_file("a.txt", "a\n", "fix a (#10)");
        self.git(&["checkout", "--quiet", "-b", "user/fix"]);
        let pr11_side = self.commit_file("b.txt", "b\n", "Fix b");
        self.git(&["checkout", "--quiet", "master"]);
        self.git(&[
            "merge",
            "--quiet",
            "--no-ff",
            "-m",
            "Merge pull request #11 from user/fix",
            "user/fix",
        ]);
        let pr11 = self.rev("HEAD");
        let pr20 = self.commit_file("shared.txt", "main\n", "Tweak shared (#20)");
        let pr30 = self.commit_file("c.txt", "same\n", "Add c (#30)");

        self.git(&["checkout", "--quiet", RELEASE]);
        self.git(&["cherry-pick", "-x", &pr10]);
        self.commit_file("shared.txt", "release\n", "Release-only shared edit");
        self.commit_file("c.txt", "same\n", "Add c on release");
        self.git(&["checkout", "--quiet", "master"]);

        ReleaseScenario {
            base,
            pr10,
            pr11,
            pr11_side,
            pr20,
            pr30,
        }
    }
}
