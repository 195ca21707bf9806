use clap::Args;
use colored::Colorize;
use lil_common::config::Config;
use lil_common::error::Result;
use lil_core::build_menu;

use crate::cli::current_issues;
use crate::render::menu_lines;

#[derive(Args, Debug)]
pub struct List {
    /// Use the issue cache instead of querying Linear
    #[arg(long)]
    pub cached: bool,

    /// Print the raw issues as JSON
    #[arg(long)]
    pub json: bool,

    /// Show project, due date, assignee and status under each issue
    #[arg(long, short = 'd')]
    pub details: bool,
}

impl List {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let issues = current_issues(config, self.cached).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&issues)?);
            return Ok(());
        }

        let menu = build_menu(&issues);
        for line in menu_lines(&menu, self.details) {
            println!("{line}");
        }
        if !issues.is_empty() {
            println!();
            println!(
                "{}",
                format!("{} active assigned issues", issues.len()).bold()
            );
        }
        Ok(())
    }
}
