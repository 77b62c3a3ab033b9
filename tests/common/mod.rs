//! Shared test utilities

#![allow(dead_code, unused_imports)]

mod mock_git;
mod mock_platform;
mod temp_repo;

pub use mock_git::{MockGitOps, make_commit};
pub use mock_platform::{
    MockPlatformService, github_config, issue_for, make_issue, make_open_pr, make_pr,
};
pub use temp_repo::{RELEASE, ReleaseScenario, TempGitRepo};
