//! `GitOps` backed by the `git` executable

use crate::error::{Error, Result};
use crate::repo::GitOps;
use crate::types::{Commit, GitRemote, PickOutcome};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

const FIELD_SEP: char = '\x1f';
const RECORD_SEP: char = '\x1e';

/// Handle on a git working tree
///
/// Every command runs with the top-level directory as its working
/// directory, independent of the process's current directory.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Open the working tree containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(path)
            .output()
            .map_err(|e| Error::NotARepository(format!("{}: {e}", path.display())))?;

        if !output.status.success() {
            return Err(Error::NotARepository(path.display().to_string()));
        }

        let root = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        debug!(root = %root.display(), "opened git repository");
        Ok(Self { root })
    }

    /// Top-level directory of the working tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        debug!(?args, "git");
        Ok(Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()?)
    }

    /// Run git, returning stdout on success and `GitCommand` otherwise
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(Error::GitCommand {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run git, reporting only whether it succeeded
    fn succeeds(&self, args: &[&str]) -> Result<bool> {
        Ok(self.output(args)?.status.success())
    }

    /// Whether `sha` has more than one parent
    fn is_merge(&self, sha: &str) -> Result<bool> {
        let line = self.run(&["rev-list", "--parents", "-n", "1", sha])?;
        Ok(line.split_whitespace().count() > 2)
    }

    fn abort_cherry_pick(&self) {
        if let Err(e) = self.run(&["cherry-pick", "--abort"]) {
            debug!(error = %e, "cherry-pick abort had nothing to abort");
        }
    }
}

fn parse_log(raw: &str) -> Vec<Commit> {
    raw.split(RECORD_SEP)
        .map(|record| record.trim_start_matches('\n'))
        .filter(|record| !record.is_empty())
        .filter_map(|record| {
            let mut fields = record.splitn(3, FIELD_SEP);
            let sha = fields.next()?.trim();
            let author = fields.next()?;
            let message = fields.next().unwrap_or_default();
            Some(Commit {
                sha: sha.to_string(),
                author: author.to_string(),
                message: message.trim_end().to_string(),
            })
        })
        .collect()
}

impl GitOps for GitRepo {
    fn commits(&self, branch: &str) -> Result<Vec<Commit>> {
        let spec = format!("{branch}^{{commit}}");
        if !self.succeeds(&["rev-parse", "--verify", "--quiet", &spec])? {
            return Err(Error::BranchNotFound(branch.to_string()));
        }

        let raw = self.run(&["log", "--format=%H%x1f%an%x1f%B%x1e", branch, "--"])?;
        let commits = parse_log(&raw);
        debug!(branch, count = commits.len(), "read branch history");
        Ok(commits)
    }

    fn merge_bases(&self, a: &str, b: &str) -> Result<Vec<String>> {
        let output = self.output(&["merge-base", "--all", a, b])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        // exit status 1 with no output means "no common ancestor"
        if !output.status.success() && !(stdout.trim().is_empty() && stderr.trim().is_empty()) {
            return Err(Error::GitCommand {
                command: format!("merge-base --all {a} {b}"),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn current_head(&self) -> Result<String> {
        let output = self.output(&["symbolic-ref", "--short", "-q", "HEAD"])?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }
        self.head_sha()
    }

    fn head_sha(&self) -> Result<String> {
        Ok(self.run(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        let reference = format!("refs/heads/{branch}");
        self.succeeds(&["show-ref", "--verify", "--quiet", &reference])
    }

    fn fetch_all(&self) -> Result<()> {
        self.run(&["fetch", "--all", "--quiet"]).map(|_| ())
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.run(&["checkout", "--quiet", reference]).map(|_| ())
    }

    fn create_branch(&self, name: &str, start: &str) -> Result<()> {
        self.run(&["branch", name, start]).map(|_| ())
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        self.run(&["branch", flag, name]).map(|_| ())
    }

    fn cherry_pick(&self, sha: &str) -> Result<PickOutcome> {
        let before = self.head_sha()?;
        // Merge commits are replayed against their first parent
        let mainline: &[&str] = if self.is_merge(sha)? { &["-m", "1"] } else { &[] };

        let pick = [&["cherry-pick", "-x"][..], mainline, &[sha][..]].concat();
        let output = self.output(&pick)?;
        if output.status.success() {
            return Ok(PickOutcome::Applied);
        }
        debug!(
            sha,
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "cherry-pick failed, checking for already-present change"
        );
        self.abort_cherry_pick();

        // Succeeds only when the change contributes nothing new over HEAD
        let redundant = [
            &["cherry-pick", "--ff", "--keep-redundant-commits"][..],
            mainline,
            &[sha][..],
        ]
        .concat();
        if self.succeeds(&redundant)? {
            self.reset_hard(&before)?;
            return Ok(PickOutcome::AlreadyPresent);
        }
        self.abort_cherry_pick();
        self.reset_hard(&before)?;
        Ok(PickOutcome::Conflict)
    }

    fn reset_hard(&self, reference: &str) -> Result<()> {
        self.run(&["reset", "--hard", "--quiet", reference]).map(|_| ())
    }

    fn remotes(&self) -> Result<Vec<GitRemote>> {
        let names = self.run(&["remote"])?;
        names
            .lines()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|name| {
                let url = self.run(&["remote", "get-url", name])?;
                Ok(GitRemote {
                    name: name.to_string(),
                    url: url.trim().to_string(),
                })
            })
            .collect()
    }
}
