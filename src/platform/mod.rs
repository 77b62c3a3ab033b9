//! Issue tracker services
//!
//! Label lookups and labeled-issue listings go through [`PlatformService`].

mod detection;
mod factory;
mod github;

pub use detection::{parse_repo_id, parse_repo_info};
pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{Issue, Label, PlatformConfig};
use async_trait::async_trait;

/// Platform service trait for issue tracker queries
///
/// Pagination is the implementation's concern; callers always receive the
/// complete result set.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Look up a label by name, `None` if the tracker doesn't know it
    async fn get_label(&self, name: &str) -> Result<Option<Label>>;

    /// List every issue (open and closed) carrying `label`
    async fn list_issues(&self, label: &Label) -> Result<Vec<Issue>>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
