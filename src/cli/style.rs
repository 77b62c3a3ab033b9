//! Terminal styling helpers
//!
//! Colors are always emitted; `anstream::println` strips them when stdout
//! is not a terminal.

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Style};
use std::fmt::Display;
use supports_hyperlinks::Stream;
use terminal_link::Link;

/// Check mark
pub const CHECK: &str = "✓";

/// Semantic color helpers for any displayable value
pub trait Stylize {
    /// Green: completed successfully
    fn success(&self) -> String;
    /// Yellow: needs attention
    fn warn(&self) -> String;
    /// Red: failed
    fn error(&self) -> String;
    /// Dimmed: secondary information
    fn muted(&self) -> String;
    /// Cyan: names and counts
    fn accent(&self) -> String;
    /// Bold: headings
    fn emphasis(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn success(&self) -> String {
        self.style(Style::new().green()).to_string()
    }

    fn warn(&self) -> String {
        self.style(Style::new().yellow()).to_string()
    }

    fn error(&self) -> String {
        self.style(Style::new().red().bold()).to_string()
    }

    fn muted(&self) -> String {
        self.style(Style::new().dimmed()).to_string()
    }

    fn accent(&self) -> String {
        self.style(Style::new().cyan()).to_string()
    }

    fn emphasis(&self) -> String {
        self.style(Style::new().bold()).to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Dimmed arrow for list items
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner used while waiting on GitHub or git
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// `#N`, hyperlinked to the PR when the terminal supports it
pub fn pr_link(number: u64, url: &str) -> String {
    let text = format!("#{number}");
    if url.is_empty() || !supports_hyperlinks::on(Stream::Stdout) {
        return text;
    }
    Link::new(&text, url).to_string()
}
