//! Error types for cherrytree

use thiserror::Error;

/// Errors raised by the reconciliation and application engine
#[derive(Debug, Error)]
pub enum Error {
    /// A git command exited unsuccessfully
    #[error("git {command} failed: {stderr}")]
    GitCommand {
        /// The git arguments, joined with spaces
        command: String,
        /// Captured standard error of the command
        stderr: String,
    },

    /// Branch does not exist in the local repository
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Path is not inside a git working tree
    #[error("not a git repository: {0}")]
    NotARepository(String),

    /// Main and release branches share no history
    #[error("no common ancestor between {main} and {release}")]
    NoCommonAncestor {
        /// Main branch name
        main: String,
        /// Release branch name
        release: String,
    },

    /// Main and release branches have several best common ancestors
    #[error("ambiguous ancestor: {count} merge bases between {main} and {release}")]
    AmbiguousMergeBase {
        /// Main branch name
        main: String,
        /// Release branch name
        release: String,
        /// Number of merge bases found
        count: usize,
    },

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Missing or unusable credentials
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// A pull request pattern could not be compiled
    #[error("invalid pull request pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// Remote could not be parsed into a repository identifier
    #[error("no supported remote found: {0}")]
    NoSupportedRemotes(String),

    /// Requested remote does not exist
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for unexpected internal failures
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

impl Error {
    /// Whether this error is a configuration problem rather than a runtime failure
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Auth(_)
                | Self::NoCommonAncestor { .. }
                | Self::AmbiguousMergeBase { .. }
                | Self::InvalidPattern { .. }
                | Self::NoSupportedRemotes(_)
                | Self::RemoteNotFound(_)
        )
    }
}

/// Result type alias using cherrytree's `Error`
pub type Result<T> = std::result::Result<T, Error>;
