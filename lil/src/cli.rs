// lil/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use lil_common::cache::IssueCache;
use lil_common::error::{LilError, Result};
use lil_common::model::Issue;
use lil_common::Config;
use lil_net::LinearClient;

pub mod cache;
pub mod formula;
pub mod list;
pub mod open;
pub mod watch;

use crate::cli::cache::CacheCommand;
use crate::cli::formula::FormulaArgs;
use crate::cli::list::List;
use crate::cli::open::Open;
use crate::cli::watch::Watch;

#[derive(Parser, Debug)]
#[command(author, about, long_about = None, name = "lil", bin_name = "lil")]
#[command(disable_version_flag = true)]
pub struct CliArgs {
    /// Print version information and exit
    #[arg(long)]
    pub version: bool,

    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show assigned issues and keep them up to date (default)
    Watch(Watch),
    /// Print assigned issues once
    List(List),
    /// Open an issue in the browser
    Open(Open),
    /// Print the Homebrew formula for lil
    Formula(FormulaArgs),
    /// Inspect or clear the issue cache
    #[command(subcommand)]
    Cache(CacheCommand),
}

impl Default for Command {
    fn default() -> Self {
        Self::Watch(Watch)
    }
}

impl Command {
    pub async fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Watch(command) => command.run(config).await,
            Self::List(command) => command.run(config).await,
            Self::Open(command) => command.run(config).await,
            Self::Formula(command) => command.run(),
            Self::Cache(command) => command.run(config),
        }
    }
}

/// Issues from the cache (`cached`) or a fresh fetch, which also refreshes the cache.
pub(crate) async fn current_issues(config: &Config, cached: bool) -> Result<Vec<Issue>> {
    let cache = IssueCache::from_config(config);
    if cached {
        return cache.load()?.ok_or_else(|| {
            LilError::NotFound(format!("No cached issues at {}", cache.path().display()))
        });
    }

    let client = LinearClient::new(config)?;
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Fetching issues from Linear...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = client.fetch_assigned_issues().await;
    spinner.finish_and_clear();

    let issues = result?;
    if let Err(e) = cache.store(&issues) {
        tracing::warn!("Error caching issues: {}", e);
    }
    Ok(issues)
}
