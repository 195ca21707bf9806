use clap::Args;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use lil_common::config::Config;
use lil_common::error::{LilError, Result};
use lil_core::{build_menu, IssueItem};
use tokio::process::Command;
use tracing::{debug, info};

use crate::cli::current_issues;

#[derive(Args, Debug)]
pub struct Open {
    /// Issue identifier, e.g. ENG-123. Prompts for one when omitted.
    pub identifier: Option<String>,

    /// Use the issue cache instead of querying Linear
    #[arg(long)]
    pub cached: bool,
}

impl Open {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let issues = current_issues(config, self.cached).await?;
        let menu = build_menu(&issues);

        let item = match &self.identifier {
            Some(identifier) => menu
                .find(identifier)
                .cloned()
                .ok_or_else(|| LilError::NotFound(format!("No assigned issue {identifier}")))?,
            None => match pick(menu.issue_items().cloned().collect())? {
                Some(item) => item,
                None => {
                    debug!("Selection cancelled");
                    return Ok(());
                }
            },
        };

        info!("Opening issue: {}", item.identifier);
        open_url(&item.url).await
    }
}

fn pick(items: Vec<IssueItem>) -> Result<Option<IssueItem>> {
    if items.is_empty() {
        return Err(LilError::NotFound("No active assigned issues".to_string()));
    }
    let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Open issue")
        .items(&titles)
        .default(0)
        .interact_opt()
        .map_err(|e| LilError::Generic(format!("Issue picker failed: {e}")))?;
    Ok(selection.map(|index| items[index].clone()))
}

#[cfg(target_os = "macos")]
const OPENER: (&str, &[&str]) = ("open", &[]);
#[cfg(target_os = "windows")]
const OPENER: (&str, &[&str]) = ("cmd", &["/C", "start", ""]);
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: (&str, &[&str]) = ("xdg-open", &[]);

pub async fn open_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url)
        .map_err(|e| LilError::ValidationError(format!("Could not parse URL '{url}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LilError::ValidationError(format!(
            "Refusing to open non-web URL '{url}'"
        )));
    }

    let (program, base_args) = OPENER;
    debug!("Running {} {:?} {}", program, base_args, url);
    let status = Command::new(program)
        .args(base_args)
        .arg(parsed.as_str())
        .status()
        .await
        .map_err(|e| LilError::CommandExecError(format!("{program}: {e}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(LilError::CommandExecError(format!(
            "Failed to open URL {url}: {program} exited with {status}"
        )))
    }
}
