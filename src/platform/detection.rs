//! Repository detection from remote URLs and `owner/name` identifiers

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use url::Url;

const GITHUB_HOST: &str = "github.com";

/// Parse an `owner/name` repository identifier
pub fn parse_repo_id(id: &str, host: Option<String>) -> Result<PlatformConfig> {
    let trimmed = id.trim().trim_matches('/');
    match trimmed.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok(PlatformConfig {
                owner: owner.to_string(),
                repo: repo.trim_end_matches(".git").to_string(),
                host,
            })
        }
        _ => Err(Error::Config(format!(
            "repository must be given as owner/name, got '{id}'"
        ))),
    }
}

/// Split a remote URL into host and path
///
/// Handles `https://host/path`, `ssh://git@host/path` and the scp-like
/// `git@host:path` form.
fn split_remote(url: &str) -> Option<(String, String)> {
    if let Ok(parsed) = Url::parse(url) {
        let host = parsed.host_str()?.to_string();
        return Some((host, parsed.path().to_string()));
    }

    let (user_host, path) = url.split_once(':')?;
    let host = user_host.rsplit('@').next()?;
    Some((host.to_string(), path.to_string()))
}

/// Detect the GitHub repository a remote URL points at
///
/// github.com and GitHub Enterprise hosts (any host containing "github")
/// are accepted.
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    let (host, path) =
        split_remote(url).ok_or_else(|| Error::NoSupportedRemotes(url.to_string()))?;

    if !host.contains("github") {
        return Err(Error::NoSupportedRemotes(url.to_string()));
    }

    let path = path.trim_matches('/');
    let host = (host != GITHUB_HOST).then_some(host);
    parse_repo_id(path, host).map_err(|_| Error::NoSupportedRemotes(url.to_string()))
}
