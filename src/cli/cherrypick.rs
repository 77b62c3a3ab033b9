//! Cherrypick command - apply missing labeled PRs to the release branch

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow, check, pr_link};
use crate::cli::{CliProgress, TITLE_WIDTH, paint, status_icon};
use anstream::println;
use cherrytree::apply::{
    ApplyOptions, ApplyPlan, ApplyStep, ApplySummary, CherryStatus, create_apply_plan,
    execute_apply,
};
use cherrytree::config::Overrides;
use cherrytree::error::{Error, Result};
use cherrytree::types::{short_sha, truncate_str};
use dialoguer::Confirm;
use std::path::Path;

/// Options for the cherrypick command
#[derive(Debug, Clone, Default)]
pub struct CherrypickOptions {
    /// Explicit base ref instead of the merge base
    pub base_ref: Option<String>,
    /// Build this branch instead of updating the release branch
    pub target_branch: Option<String>,
    /// Recreate the target branch if it exists
    pub force: bool,
    /// Record outcomes without keeping any pick
    pub dry_run: bool,
    /// Preview plan and prompt for confirmation before executing
    pub confirm: bool,
}

/// Run the cherrypick command, returning the process exit code
#[allow(clippy::future_not_send)]
pub async fn run_cherrypick(
    path: &Path,
    config_path: Option<&Path>,
    release_branch: &str,
    overrides: Overrides,
    options: CherrypickOptions,
) -> Result<u8> {
    // Phase 1: gather
    let ctx = CommandContext::new(path, config_path, overrides, release_branch).await?;
    let state = ctx.gather(options.base_ref.as_deref()).await?;

    // Phase 2: plan
    let plan = create_apply_plan(&state.reconciliation.cherries, &state.labeled.blocking);
    if plan.steps.is_empty() {
        println!("{}", "No labeled pull requests to cherry-pick.".muted());
        return Ok(0);
    }

    if options.confirm && !options.dry_run {
        print_plan(&plan);
        if !Confirm::new()
            .with_prompt("Proceed with cherry-pick?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(0);
        }
        println!();
    }

    // Phase 3: execute
    let apply_options = ApplyOptions {
        release_branch: ctx.settings.release_branch.clone(),
        target_branch: options.target_branch,
        dry_run: options.dry_run,
        error_mode: ctx.settings.error_mode,
        force_rebuild_target: options.force,
        temp_branch: ctx.settings.temp_branch.clone(),
    };

    let heading = if options.dry_run { "Dry run:" } else { "Cherry-picking" };
    println!(
        "{} {} {}",
        heading.emphasis(),
        format!("{} of {} cherries", plan.pick_count(), plan.steps.len()).accent(),
        format!("onto {}", apply_options.target_branch.as_deref().unwrap_or(release_branch)).muted()
    );

    let summary = execute_apply(ctx.git(), &plan, &apply_options, &CliProgress)?;
    print_summary(&summary);
    Ok(summary.exit_code())
}

fn print_plan(plan: &ApplyPlan) {
    println!("{}", "Plan:".emphasis());
    for step in &plan.steps {
        let line = step.to_string();
        let line = match step {
            ApplyStep::Pick { .. } => line.accent(),
            ApplyStep::AlreadyApplied { .. } => line.muted(),
            ApplyStep::Open { .. } | ApplyStep::Blocked { .. } => line.warn(),
        };
        println!("  {} {line}", arrow());
    }
    println!();
}

fn print_summary(summary: &ApplySummary) {
    println!();
    if summary.downgraded {
        println!("{}", "Run was switched to dry-run after an error.".warn());
    }
    if summary.halted {
        println!("{}", "Run stopped early; remaining cherries were not processed.".warn());
    }

    for status in [
        CherryStatus::Applied,
        CherryStatus::DryRunApplied,
        CherryStatus::SkippedAlreadyApplied,
        CherryStatus::SkippedEmpty,
        CherryStatus::Blocked,
        CherryStatus::Conflict,
        CherryStatus::Open,
    ] {
        let count = summary.count(status);
        if count > 0 {
            println!(
                "{} {:<18} {}",
                status_icon(status),
                paint(status, &status.to_string()),
                count
            );
        }
    }

    for status in [CherryStatus::Blocked, CherryStatus::Open] {
        for outcome in summary.with_status(status) {
            println!(
                "  {} {} {} {}",
                arrow(),
                paint(status, &status.to_string()),
                pr_link(outcome.pr_number, &outcome.html_url),
                truncate_str(&outcome.pr_title, TITLE_WIDTH)
            );
        }
    }

    if !summary.conflicts.is_empty() {
        println!();
        println!("{}", "Conflicts:".error());
        for conflict in &summary.conflicts {
            println!(
                "  {} #{} {} {}",
                arrow(),
                conflict.pr_number,
                short_sha(&conflict.sha).muted(),
                truncate_str(&conflict.pr_title, TITLE_WIDTH)
            );
            println!(
                "      {}",
                format!("author: {}, merged by: {}", conflict.author, conflict.merged_by).muted()
            );
        }
    }

    println!();
    if summary.has_errors() {
        println!("{}", "Finished with errors".error());
    } else {
        println!(
            "{} {} {}",
            check(),
            "Done".success(),
            format!("({} at {})", summary.working_branch.name, short_sha(&summary.final_head)).muted()
        );
    }
}
