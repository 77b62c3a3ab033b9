//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by bake and cherrypick.

use crate::cli::style::{Stylize, check, spinner_style};
use cherrytree::config::{Overrides, Settings, load_config};
use cherrytree::error::{Error, Result};
use cherrytree::index::PrMatcher;
use cherrytree::platform::{PlatformService, create_platform_service, parse_repo_id, parse_repo_info};
use cherrytree::reconcile::{ReleaseQuery, ReleaseState, gather_release};
use cherrytree::repo::{GitOps, GitRepo, select_remote};
use cherrytree::types::PlatformConfig;
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;

/// Shared context for CLI commands that interact with GitHub
///
/// This struct encapsulates the common setup:
/// - Opening the git repository
/// - Loading and resolving configuration
/// - Detecting the GitHub repository and creating the service
pub struct CommandContext {
    /// The git repository
    pub repo: GitRepo,
    /// Resolved settings
    pub settings: Settings,
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
    /// PR number extraction rules
    pub matcher: PrMatcher,
}

/// Work out which GitHub repository to query
fn platform_config(repo: &GitRepo, settings: &Settings) -> Result<PlatformConfig> {
    if let Some(ref id) = settings.repo {
        return parse_repo_id(id, settings.host.clone());
    }

    let remotes = repo.remotes()?;
    let remote_name = select_remote(&remotes, settings.remote.as_deref())?;
    let remote = remotes
        .iter()
        .find(|r| r.name == remote_name)
        .ok_or_else(|| Error::RemoteNotFound(remote_name.clone()))?;

    let mut config = parse_repo_info(&remote.url)?;
    if settings.host.is_some() {
        config.host.clone_from(&settings.host);
    }
    Ok(config)
}

impl CommandContext {
    /// Create a new command context
    pub async fn new(
        path: &Path,
        config_path: Option<&Path>,
        overrides: Overrides,
        release_branch: &str,
    ) -> Result<Self> {
        let repo = GitRepo::open(path)?;
        let file = load_config(repo.root(), config_path)?;
        let settings = Settings::resolve(file, overrides, release_branch);
        let matcher = PrMatcher::with_patterns(&settings.pr_patterns)?;

        let platform_config = platform_config(&repo, &settings)?;
        let platform = create_platform_service(&platform_config).await?;

        Ok(Self {
            repo,
            settings,
            platform,
            matcher,
        })
    }

    /// Fetch labeled PRs, index both branches and reconcile, with a spinner
    #[allow(clippy::future_not_send)]
    pub async fn gather(&self, base_ref: Option<&str>) -> Result<ReleaseState> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(format!(
            "Fetching pull requests labeled {} from {}...",
            self.settings.labels.join(", ").accent(),
            self.platform.config().to_string().emphasis()
        ));
        spinner.enable_steady_tick(Duration::from_millis(80));

        let query = ReleaseQuery {
            main_branch: &self.settings.main_branch,
            search_branches: &self.settings.search_branches,
            release_branch: &self.settings.release_branch,
            labels: &self.settings.labels,
            blocking_labels: &self.settings.blocking_labels,
            base_ref,
        };
        let result = gather_release(&self.repo, self.platform.as_ref(), &self.matcher, &query).await;

        match &result {
            Ok(state) => spinner.finish_with_message(format!(
                "{} {} pull request(s), {} cherries",
                check(),
                state.labeled.pull_requests.len().accent(),
                state.reconciliation.cherries.len().accent()
            )),
            Err(_) => spinner.finish_and_clear(),
        }
        result
    }

    /// Git operations for this repository
    pub fn git(&self) -> &dyn GitOps {
        &self.repo
    }
}
