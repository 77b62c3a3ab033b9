//! Pull request number extraction rules
//!
//! Commit summaries link back to pull requests in one of a few conventional
//! shapes. Each shape is a [`PrRule`]; a [`PrMatcher`] tries them in order.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static MERGE_COMMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge pull request #(\d+) from").expect("merge-commit pattern is valid")
});

static SQUASH_MERGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)$").expect("squash-merge pattern is valid"));

/// A named pattern whose first capture group is the PR number
#[derive(Debug, Clone)]
pub struct PrRule {
    name: String,
    pattern: Regex,
}

impl PrRule {
    /// Compile a rule from a regex with one capture group
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        if regex.captures_len() < 2 {
            return Err(Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern needs a capture group for the PR number".to_string(),
            });
        }
        Ok(Self {
            name: name.into(),
            pattern: regex,
        })
    }

    /// `Merge pull request #N from ...`
    pub fn merge_commit() -> Self {
        Self {
            name: "merge-commit".to_string(),
            pattern: MERGE_COMMIT.clone(),
        }
    }

    /// `... (#N)`
    pub fn squash_merge() -> Self {
        Self {
            name: "squash-merge".to_string(),
            pattern: SQUASH_MERGE.clone(),
        }
    }

    /// Rule name (for diagnostics)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extract the PR number from a commit summary
    pub fn extract(&self, summary: &str) -> Option<u64> {
        self.pattern
            .captures(summary)?
            .get(1)?
            .as_str()
            .parse()
            .ok()
    }
}

/// Ordered list of extraction rules; the first rule that matches wins
#[derive(Debug, Clone)]
pub struct PrMatcher {
    rules: Vec<PrRule>,
}

impl Default for PrMatcher {
    fn default() -> Self {
        Self {
            rules: vec![PrRule::merge_commit(), PrRule::squash_merge()],
        }
    }
}

impl PrMatcher {
    /// Matcher with the canonical rules followed by `extra` patterns
    pub fn with_patterns<S: AsRef<str>>(extra: &[S]) -> Result<Self> {
        let mut matcher = Self::default();
        for (i, pattern) in extra.iter().enumerate() {
            matcher.push(PrRule::new(format!("custom-{}", i + 1), pattern.as_ref())?);
        }
        Ok(matcher)
    }

    /// Append a rule after the existing ones
    pub fn push(&mut self, rule: PrRule) {
        self.rules.push(rule);
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[PrRule] {
        &self.rules
    }

    /// PR number referenced by a commit summary, if any
    pub fn pr_number(&self, summary: &str) -> Option<u64> {
        self.rules.iter().find_map(|rule| rule.extract(summary))
    }
}
