//! Bake command - report which labeled PRs are on the release branch

use crate::cli::TITLE_WIDTH;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow, pr_link};
use anstream::println;
use cherrytree::config::Overrides;
use cherrytree::error::{Error, Result};
use cherrytree::reconcile::{ReleaseReport, ReleaseState};
use cherrytree::types::{Cherry, short_sha, truncate_str};
use std::path::Path;

/// Options for the bake command
#[derive(Debug, Clone, Default)]
pub struct BakeOptions {
    /// Explicit base ref instead of the merge base
    pub base_ref: Option<String>,
    /// Print the report as JSON
    pub json: bool,
}

/// Run the bake command
#[allow(clippy::future_not_send)]
pub async fn run_bake(
    path: &Path,
    config_path: Option<&Path>,
    release_branch: &str,
    overrides: Overrides,
    options: BakeOptions,
) -> Result<()> {
    let ctx = CommandContext::new(path, config_path, overrides, release_branch).await?;
    let state = ctx.gather(options.base_ref.as_deref()).await?;

    let report = ReleaseReport::new(&state, &ctx.settings.main_branch, release_branch);
    if options.json {
        let json = report
            .to_json()
            .map_err(|e| Error::Internal(format!("failed to serialize report: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    print_report(&state, &ctx.settings.main_branch, release_branch);
    Ok(())
}

fn cherry_line(cherry: &Cherry) -> String {
    let (icon, sha) = match &cherry.commit {
        Some(commit) if cherry.is_applied => ("✅", commit.short_sha().success()),
        Some(commit) => ("🍒", commit.short_sha().accent()),
        None => ("⏳", "open".warn()),
    };
    format!(
        "{icon} {:>7} {:<12} {}",
        pr_link(cherry.pr.number, &cherry.pr.html_url),
        sha,
        truncate_str(&cherry.pr.title, TITLE_WIDTH)
    )
}

fn print_report(state: &ReleaseState, main_branch: &str, release_branch: &str) {
    println!(
        "{} {} {} {}",
        "Release".emphasis(),
        release_branch.accent(),
        "from".muted(),
        format!("{main_branch} @ {}", short_sha(&state.base_ref)).muted()
    );
    println!();

    let reconciliation = &state.reconciliation;
    if reconciliation.cherries.is_empty() {
        println!("{}", "No labeled pull requests found on the main branch.".muted());
    }
    for cherry in &reconciliation.cherries {
        println!("{}", cherry_line(cherry));
    }

    if !reconciliation.missing.is_empty() {
        println!();
        println!(
            "{}",
            format!("Closed without a commit on {main_branch}:").warn()
        );
        for pr in &reconciliation.missing {
            println!(
                "  ❌ {} {}",
                pr_link(pr.number, &pr.html_url),
                truncate_str(&pr.title, TITLE_WIDTH)
            );
        }
    }

    if !state.labeled.unknown_labels.is_empty() {
        println!();
        for label in &state.labeled.unknown_labels {
            println!("  {} label {} not found", arrow(), label.warn());
        }
    }

    println!();
    println!(
        "{} applied, {} pending, {} open",
        reconciliation.applied_count().success(),
        reconciliation.pending_count().accent(),
        reconciliation.open_count().warn()
    );
}
