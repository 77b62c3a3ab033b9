//! cherrytree CLI - label-driven cherry-picking for release branches

mod cli;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use cherrytree::config::Overrides;
use cherrytree::error::Error;
use cherrytree::types::ErrorMode;
use cli::bake::{BakeOptions, run_bake};
use cli::cherrypick::{CherrypickOptions, run_cherrypick};
use cli::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status for fatal errors
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "cherrytree")]
#[command(about = "Label-driven cherry-picking for release branches")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the git repository
    #[arg(short, long, global = true, default_value = ".")]
    path: PathBuf,

    /// Configuration file (defaults to cherrytree.toml at the repository root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

/// Options shared by every command
#[derive(Args)]
struct ReleaseArgs {
    /// Release branch
    release_branch: String,

    /// Main integration branch
    #[arg(short, long)]
    main_branch: Option<String>,

    /// Further branch searched for PR commits (repeatable)
    #[arg(long = "search-branch")]
    search_branches: Vec<String>,

    /// Inclusion label (repeatable, defaults to v<release>)
    #[arg(short, long = "label")]
    labels: Vec<String>,

    /// Blocking label (repeatable)
    #[arg(short, long = "blocking-label")]
    blocking_labels: Vec<String>,

    /// GitHub repository as owner/name (detected from remotes by default)
    #[arg(long)]
    repo: Option<String>,

    /// Git remote used to detect the repository
    #[arg(long)]
    remote: Option<String>,

    /// Base ref of the release (defaults to the merge base of both branches)
    #[arg(long)]
    base_ref: Option<String>,
}

impl ReleaseArgs {
    fn overrides(&self, error_mode: Option<ErrorMode>) -> Overrides {
        Overrides {
            repo: self.repo.clone(),
            remote: self.remote.clone(),
            main_branch: self.main_branch.clone(),
            search_branches: self.search_branches.clone(),
            labels: self.labels.clone(),
            blocking_labels: self.blocking_labels.clone(),
            error_mode,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Report which labeled PRs are on the release branch
    Bake {
        #[command(flatten)]
        release: ReleaseArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Cherry-pick labeled PRs missing from the release branch
    Cherrypick {
        #[command(flatten)]
        release: ReleaseArgs,

        /// Build this branch from the release branch instead of updating it
        #[arg(short, long)]
        target_branch: Option<String>,

        /// Recreate the target branch if it already exists
        #[arg(short, long)]
        force: bool,

        /// Try every pick, then roll back
        #[arg(long)]
        dry_run: bool,

        /// What to do on a blocked or conflicting cherry
        #[arg(short, long, value_enum)]
        error_mode: Option<ErrorMode>,

        /// Preview plan and prompt for confirmation before executing
        #[arg(long)]
        confirm: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "cherrytree=warn",
        1 => "cherrytree=info",
        _ => "cherrytree=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Bake { release, json } => {
            let options = BakeOptions {
                base_ref: release.base_ref.clone(),
                json,
            };
            run_bake(
                &cli.path,
                config,
                &release.release_branch,
                release.overrides(None),
                options,
            )
            .await
            .with_context(|| format!("failed to bake {}", release.release_branch))?;
            Ok(0)
        }
        Commands::Cherrypick {
            release,
            target_branch,
            force,
            dry_run,
            error_mode,
            confirm,
        } => {
            let options = CherrypickOptions {
                base_ref: release.base_ref.clone(),
                target_branch,
                force,
                dry_run,
                confirm,
            };
            let code = run_cherrypick(
                &cli.path,
                config,
                &release.release_branch,
                release.overrides(error_mode),
                options,
            )
            .await
            .with_context(|| format!("failed to cherry-pick onto {}", release.release_branch))?;
            Ok(code)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            anstream::eprintln!("{} {e:#}", "error:".error());
            if e.downcast_ref::<Error>().is_some_and(Error::is_config) {
                anstream::eprintln!(
                    "{}",
                    "hint: check cherrytree.toml and the command-line options".muted()
                );
            }
            ExitCode::from(EXIT_FATAL)
        }
    }
}
