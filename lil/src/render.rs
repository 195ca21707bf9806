// lil/src/render.rs
//! Terminal rendering of the tray menu.
use chrono::Local;
use colored::Colorize;
use lil_core::{Menu, MenuEntry, Snapshot};

const SEPARATOR: &str = "────────────────────────";
const TOOLTIP_INDENT: &str = "      ";

pub fn menu_lines(menu: &Menu, details: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in &menu.entries {
        match entry {
            MenuEntry::Placeholder(text) => lines.push(text.dimmed().to_string()),
            MenuEntry::Header(name) => lines.push(name.bold().to_string()),
            MenuEntry::Separator => lines.push(SEPARATOR.dimmed().to_string()),
            MenuEntry::Issue(item) => {
                let (identifier, rest) = item
                    .title
                    .split_once(": ")
                    .unwrap_or((item.identifier.as_str(), item.title.as_str()));
                lines.push(format!("  {}: {}", identifier.cyan(), rest));
                if details && !item.tooltip.is_empty() {
                    for line in item.tooltip.lines() {
                        lines.push(format!("{TOOLTIP_INDENT}{}", line.dimmed()));
                    }
                }
            }
        }
    }
    lines
}

/// Full watch-mode screen: status line, menu, quit hint.
pub fn snapshot_lines(snapshot: &Snapshot, details: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let status = match snapshot.refreshed_at {
        Some(at) => format!(
            "{} issues, updated {}",
            snapshot.issue_count,
            at.with_timezone(&Local).format("%H:%M:%S")
        ),
        None => "showing cached issues".to_string(),
    };
    lines.push(format!("{} {}", "Lil".bold(), status.dimmed()));
    if let Some(err) = &snapshot.error {
        lines.push(format!("{} {}", "Refresh failed:".red(), err));
    }
    lines.push(String::new());
    lines.extend(menu_lines(&snapshot.menu, details));
    lines.push(SEPARATOR.dimmed().to_string());
    lines.push("Quit Lil (Ctrl-C)".to_string());
    lines
}
