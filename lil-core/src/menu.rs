// lil-core/src/menu.rs
//! Turns the assigned-issue list into the tray menu layout: issues grouped by
//! project, groups ordered by their earliest date, unassigned-to-project
//! issues in a trailing group without a header.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use lil_common::model::Issue;

use crate::dates::{effective_date, format_short, parse_linear_date, sort_key};

pub const NO_ISSUES_TITLE: &str = "No active assigned issues";
pub const LOADING_TITLE: &str = "Loading issues...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueItem {
    pub identifier: String,
    pub title: String,
    pub tooltip: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Disabled informational line.
    Placeholder(String),
    /// Disabled project name.
    Header(String),
    Separator,
    Issue(IssueItem),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub entries: Vec<MenuEntry>,
}

impl Menu {
    pub fn loading() -> Self {
        Self {
            entries: vec![MenuEntry::Placeholder(LOADING_TITLE.to_string())],
        }
    }

    pub fn issue_items(&self) -> impl Iterator<Item = &IssueItem> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Issue(item) => Some(item),
            _ => None,
        })
    }

    pub fn find(&self, identifier: &str) -> Option<&IssueItem> {
        self.issue_items()
            .find(|item| item.identifier.eq_ignore_ascii_case(identifier))
    }
}

struct ProjectGroup<'a> {
    name: Option<&'a str>,
    earliest: DateTime<Utc>,
    issues: Vec<&'a Issue>,
}

pub fn build_menu(issues: &[Issue]) -> Menu {
    tracing::debug!("Building menu for {} issues", issues.len());
    if issues.is_empty() {
        return Menu {
            entries: vec![MenuEntry::Placeholder(NO_ISSUES_TITLE.to_string())],
        };
    }

    let mut groups: Vec<ProjectGroup<'_>> = Vec::new();
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();

    for issue in issues {
        let project = issue.project();
        let name = project.map(|p| p.name.as_str());
        let target = project
            .and_then(|p| p.target_date.as_deref())
            .and_then(parse_linear_date);

        let slot = *index.entry(name).or_insert_with(|| {
            groups.push(ProjectGroup {
                name,
                earliest: sort_key(target),
                issues: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.issues.push(issue);

        // A project target date wins over the dates of its issues.
        let candidate = match target {
            Some(t) => t,
            None => sort_key(effective_date(issue)),
        };
        if candidate < group.earliest {
            group.earliest = candidate;
        }
    }

    groups.sort_by(|a, b| match (a.name, b.name) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (Some(_), None) => std::cmp::Ordering::Less,
        (Some(an), Some(bn)) => a.earliest.cmp(&b.earliest).then_with(|| an.cmp(bn)),
    });

    let mut entries = Vec::new();
    for (i, group) in groups.iter_mut().enumerate() {
        if i > 0 {
            entries.push(MenuEntry::Separator);
        }
        if let Some(name) = group.name {
            entries.push(MenuEntry::Header(name.to_string()));
        }
        group
            .issues
            .sort_by_key(|issue| sort_key(effective_date(issue)));
        entries.extend(group.issues.iter().map(|issue| {
            MenuEntry::Issue(IssueItem {
                identifier: issue.identifier.clone(),
                title: issue.menu_title(),
                tooltip: tooltip(issue),
                url: issue.url.clone(),
            })
        }));
    }
    Menu { entries }
}

/// Hover text for an issue: project, due date, assignee and status, each only when known.
pub fn tooltip(issue: &Issue) -> String {
    let mut lines = Vec::new();
    if let Some(project) = issue.project() {
        lines.push(format!("Project: {}", project.name));
    }
    if let Some(due) = issue.due_date().and_then(parse_linear_date) {
        lines.push(format!("Due: {}", format_short(due)));
    }
    if let Some(assignee) = issue.assignee() {
        lines.push(format!("Assignee: {}", assignee.label()));
    }
    if let Some(state) = issue.state() {
        lines.push(format!("Status: {}", state.state_type));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use lil_common::model::{Project, User, WorkflowState};

    use super::*;

    fn issue(identifier: &str, project: Option<(&str, Option<&str>)>, due: Option<&str>, created: &str) -> Issue {
        Issue {
            id: format!("id-{identifier}"),
            identifier: identifier.to_string(),
            title: format!("Title {identifier}"),
            url: format!("https://linear.app/acme/issue/{identifier}"),
            due_date: due.map(str::to_string),
            created_at: Some(created.to_string()),
            state: None,
            project: project.map(|(name, target)| Project {
                id: format!("p-{name}"),
                name: name.to_string(),
                target_date: target.map(str::to_string),
            }),
            assignee: None,
        }
    }

    fn layout(menu: &Menu) -> Vec<String> {
        menu.entries
            .iter()
            .map(|e| match e {
                MenuEntry::Placeholder(t) => format!("({t})"),
                MenuEntry::Header(t) => format!("[{t}]"),
                MenuEntry::Separator => "---".to_string(),
                MenuEntry::Issue(item) => item.identifier.clone(),
            })
            .collect()
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let menu = build_menu(&[]);
        assert_eq!(layout(&menu), ["(No active assigned issues)"]);
        assert_eq!(menu.issue_items().count(), 0);
    }

    #[test]
    fn groups_are_ordered_by_earliest_date_with_no_project_last() {
        let issues = vec![
            issue("NP-1", None, None, "2020-01-01T00:00:00Z"),
            issue("A-1", Some(("Project A", Some("2023-05-01"))), None, "2023-03-01T00:00:00Z"),
            issue("B-1", Some(("Project B", None)), Some("2023-04-01"), "2023-01-01T00:00:00Z"),
            issue("A-2", Some(("Project A", Some("2023-05-01"))), Some("2023-02-01"), "2023-01-01T00:00:00Z"),
        ];
        let menu = build_menu(&issues);
        assert_eq!(
            layout(&menu),
            ["[Project B]", "B-1", "---", "[Project A]", "A-2", "A-1", "---", "NP-1"]
        );
    }

    #[test]
    fn project_target_date_beats_issue_dates() {
        let issues = vec![
            issue("X-1", Some(("X", Some("2025-01-01"))), Some("2023-01-01"), "2023-01-01T00:00:00Z"),
            issue("Y-1", Some(("Y", None)), Some("2024-06-01"), "2023-01-01T00:00:00Z"),
        ];
        let menu = build_menu(&issues);
        assert_eq!(layout(&menu), ["[Y]", "Y-1", "---", "[X]", "X-1"]);
    }

    #[test]
    fn issues_fall_back_to_creation_date() {
        let issues = vec![
            issue("I-3", None, None, "2023-03-01T00:00:00Z"),
            issue("I-1", None, Some("2023-01-15"), "2023-05-01T00:00:00Z"),
            issue("I-2", None, None, "2023-02-01T00:00:00Z"),
        ];
        assert_eq!(layout(&build_menu(&issues)), ["I-1", "I-2", "I-3"]);
    }

    #[test]
    fn equal_dates_order_by_project_name() {
        let issues = vec![
            issue("Z-1", Some(("Zeta", Some("2024-01-01"))), None, "2023-01-01T00:00:00Z"),
            issue("A-1", Some(("Alpha", Some("2024-01-01"))), None, "2023-01-01T00:00:00Z"),
        ];
        assert_eq!(
            layout(&build_menu(&issues)),
            ["[Alpha]", "A-1", "---", "[Zeta]", "Z-1"]
        );
    }

    #[test]
    fn find_is_case_insensitive() {
        let menu = build_menu(&[issue("ENG-9", None, None, "2023-01-01T00:00:00Z")]);
        let item = menu.find("eng-9").unwrap();
        assert_eq!(item.title, "ENG-9: Title ENG-9");
        assert_eq!(item.url, "https://linear.app/acme/issue/ENG-9");
        assert!(menu.find("ENG-10").is_none());
    }

    #[test]
    fn tooltip_lists_known_fields() {
        let mut i = issue("ABC-123", Some(("Test Project", None)), Some("2023-06-01"), "2023-01-01T00:00:00Z");
        i.state = Some(WorkflowState {
            id: "state1".into(),
            name: "In Progress".into(),
            state_type: "started".into(),
        });
        i.assignee = Some(User {
            id: "user1".into(),
            name: "John Doe".into(),
            display_name: None,
        });
        assert_eq!(
            tooltip(&i),
            "Project: Test Project\nDue: Jun 1, 2023\nAssignee: John Doe\nStatus: started"
        );

        i.project = None;
        assert_eq!(
            tooltip(&i),
            "Due: Jun 1, 2023\nAssignee: John Doe\nStatus: started"
        );
    }

    #[test]
    fn tooltip_prefers_display_name() {
        let mut i = issue("ABC-1", None, None, "2023-01-01T00:00:00Z");
        i.assignee = Some(User {
            id: "u".into(),
            name: "John Doe".into(),
            display_name: Some("johnny".into()),
        });
        assert_eq!(tooltip(&i), "Assignee: johnny");
    }
}
