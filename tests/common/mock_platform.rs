//! Mock platform service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use cherrytree::error::{Error, Result};
use cherrytree::platform::PlatformService;
use cherrytree::types::{Issue, Label, PlatformConfig, PrState, PullRequest};
use std::collections::HashMap;
use std::sync::Mutex;

/// Simple mock platform service for testing
///
/// This manually implements `PlatformService` rather than using mockall,
/// because mockall has issues with methods returning references.
///
/// Features:
/// - Labels map to the issues carrying them
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    labels: Mutex<HashMap<String, Vec<Issue>>>,
    // Call tracking
    get_label_calls: Mutex<Vec<String>>,
    list_issues_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_get_label: Mutex<Option<String>>,
    error_on_list_issues: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            labels: Mutex::new(HashMap::new()),
            get_label_calls: Mutex::new(Vec::new()),
            list_issues_calls: Mutex::new(Vec::new()),
            error_on_get_label: Mutex::new(None),
            error_on_list_issues: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make `get_label` return an error
    pub fn fail_get_label(&self, msg: &str) {
        *self.error_on_get_label.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_issues` return an error
    pub fn fail_list_issues(&self, msg: &str) {
        *self.error_on_list_issues.lock().unwrap() = Some(msg.to_string());
    }

    // === Setup ===

    /// Register a label with no issues
    pub fn add_label(&self, name: &str) {
        self.labels
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default();
    }

    /// Attach a raw issue to a label (creating the label)
    pub fn add_issue(&self, label: &str, issue: Issue) {
        self.labels
            .lock()
            .unwrap()
            .entry(label.to_string())
            .or_default()
            .push(issue);
    }

    /// Attach a pull request to a label (creating the label)
    pub fn add_pr(&self, label: &str, pr: &PullRequest) {
        self.add_issue(label, issue_for(pr));
    }

    // === Call inspection ===

    /// Labels looked up, in call order
    pub fn get_label_calls(&self) -> Vec<String> {
        self.get_label_calls.lock().unwrap().clone()
    }

    /// Labels whose issues were listed, in call order
    pub fn list_issues_calls(&self) -> Vec<String> {
        self.list_issues_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_label(&self, name: &str) -> Result<Option<Label>> {
        self.get_label_calls.lock().unwrap().push(name.to_string());
        if let Some(msg) = self.error_on_get_label.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        Ok(self
            .labels
            .lock()
            .unwrap()
            .contains_key(name)
            .then(|| Label {
                name: name.to_string(),
            }))
    }

    async fn list_issues(&self, label: &Label) -> Result<Vec<Issue>> {
        self.list_issues_calls
            .lock()
            .unwrap()
            .push(label.name.clone());
        if let Some(msg) = self.error_on_list_issues.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        Ok(self
            .labels
            .lock()
            .unwrap()
            .get(&label.name)
            .cloned()
            .unwrap_or_default())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

/// Default GitHub config for tests
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

/// Create a closed PR, merged on the given day of January 2024
pub fn make_pr(number: u64, title: &str, closed_day: u32) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        state: PrState::Closed,
        closed_at: Some(Utc.with_ymd_and_hms(2024, 1, closed_day, 12, 0, 0).unwrap()),
        author: "contributor".to_string(),
        closed_by: Some("maintainer".to_string()),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
    }
}

/// Create an open PR
pub fn make_open_pr(number: u64, title: &str) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        state: PrState::Open,
        closed_at: None,
        author: "contributor".to_string(),
        closed_by: None,
        html_url: format!("https://github.com/test/repo/pull/{number}"),
    }
}

/// Issue record for a PR
pub fn issue_for(pr: &PullRequest) -> Issue {
    Issue {
        number: pr.number,
        title: pr.title.clone(),
        state: pr.state,
        closed_at: pr.closed_at,
        author: pr.author.clone(),
        closed_by: pr.closed_by.clone(),
        html_url: pr.html_url.clone(),
        is_pull_request: true,
    }
}

/// Plain issue (not a PR)
pub fn make_issue(number: u64, title: &str) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        state: PrState::Open,
        closed_at: None,
        author: "reporter".to_string(),
        closed_by: None,
        html_url: format!("https://github.com/test/repo/issues/{number}"),
        is_pull_request: false,
    }
}
