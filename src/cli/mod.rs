//! CLI commands and terminal output

pub mod bake;
pub mod cherrypick;
pub mod context;
pub mod style;

use anstream::println;
use cherrytree::apply::{CherryOutcome, CherryStatus, ProgressCallback};
use cherrytree::types::{short_sha, truncate_str};
use style::{Stylize, pr_link};

/// Width of PR titles in tabular output
pub const TITLE_WIDTH: usize = 90;

/// Icon for a cherry status
pub const fn status_icon(status: CherryStatus) -> &'static str {
    match status {
        CherryStatus::Applied => "✅",
        CherryStatus::DryRunApplied => "☑️ ",
        CherryStatus::SkippedAlreadyApplied => "⏭️ ",
        CherryStatus::SkippedEmpty => "🫙",
        CherryStatus::Conflict => "💥",
        CherryStatus::Open => "⏳",
        CherryStatus::Blocked => "🚫",
    }
}

/// Color a value according to a cherry status
pub fn paint(status: CherryStatus, text: &str) -> String {
    match status {
        CherryStatus::Applied | CherryStatus::DryRunApplied => text.success(),
        CherryStatus::SkippedAlreadyApplied | CherryStatus::SkippedEmpty => text.muted(),
        CherryStatus::Open | CherryStatus::Blocked => text.warn(),
        CherryStatus::Conflict => text.error(),
    }
}

/// Prints one line per cherry as it is processed
#[derive(Debug, Clone, Copy, Default)]
pub struct CliProgress;

impl ProgressCallback for CliProgress {
    fn on_message(&self, message: &str) {
        println!("{}", message.warn());
    }

    fn on_outcome(&self, outcome: &CherryOutcome) {
        let sha = outcome.sha.as_deref().map_or("", short_sha);
        println!(
            "{} {:>7} {:<12} {:<18} {}",
            status_icon(outcome.status),
            pr_link(outcome.pr_number, &outcome.html_url),
            sha.muted(),
            paint(outcome.status, &outcome.status.to_string()),
            truncate_str(&outcome.pr_title, TITLE_WIDTH)
        );
    }
}
