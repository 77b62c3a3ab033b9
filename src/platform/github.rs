//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Issue, Label, PlatformConfig, PrState};
use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::debug;

/// Issues per page when listing by label (GitHub maximum)
const PER_PAGE: u8 = 100;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config: PlatformConfig { owner, repo, host },
        })
    }
}

/// Helper to convert an octocrab issue to our `Issue` type
fn issue_from_octocrab(issue: octocrab::models::issues::Issue) -> Issue {
    let state = match issue.state {
        octocrab::models::IssueState::Open => PrState::Open,
        // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
        _ => PrState::Closed,
    };

    Issue {
        number: issue.number,
        title: issue.title,
        state,
        closed_at: issue.closed_at,
        author: issue.user.login,
        closed_by: issue.closed_by.map(|u| u.login),
        html_url: issue.html_url.to_string(),
        is_pull_request: issue.pull_request.is_some(),
    }
}

/// Whether an octocrab error is a plain 404
fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404
    )
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_label(&self, name: &str) -> Result<Option<Label>> {
        debug!(name, "getting label");
        match self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .get_label(name)
            .await
        {
            Ok(label) => Ok(Some(Label { name: label.name })),
            Err(e) if is_not_found(&e) => {
                debug!(name, "label not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_issues(&self, label: &Label) -> Result<Vec<Issue>> {
        debug!(label = %label.name, "listing labeled issues");
        let labels = vec![label.name.clone()];
        let mut issues = Vec::new();
        let mut page_num = 1u32;

        loop {
            let handler = self.client.issues(&self.config.owner, &self.config.repo);
            let page = handler
                .list()
                .labels(&labels)
                .state(octocrab::params::State::All)
                .per_page(PER_PAGE)
                .page(page_num)
                .send()
                .await?;

            let count = page.items.len();
            issues.extend(page.items.into_iter().map(issue_from_octocrab));

            if count < usize::from(PER_PAGE) || page.next.is_none() {
                break;
            }
            page_num += 1;
        }

        debug!(label = %label.name, count = issues.len(), "listed labeled issues");
        Ok(issues)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
