use serde::{Deserialize, Serialize};

/// An issue assigned to the viewer, as selected by the `GetAssignedIssues` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub identifier: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub state: Option<WorkflowState>,
    #[serde(default)]
    pub project: Option<Project>,
    #[serde(default)]
    pub assignee: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub state_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl User {
    /// Display name when set, otherwise the full name.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }
}

// Nested objects with an empty id are placeholders, not real entities.
impl Issue {
    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref().filter(|p| !p.id.is_empty())
    }

    pub fn state(&self) -> Option<&WorkflowState> {
        self.state.as_ref().filter(|s| !s.id.is_empty())
    }

    pub fn assignee(&self) -> Option<&User> {
        self.assignee.as_ref().filter(|u| !u.id.is_empty())
    }

    pub fn due_date(&self) -> Option<&str> {
        self.due_date.as_deref().filter(|s| !s.is_empty())
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref().filter(|s| !s.is_empty())
    }

    /// Menu title: `IDENTIFIER: Title`.
    pub fn menu_title(&self) -> String {
        format!("{}: {}", self.identifier, self.title)
    }
}
