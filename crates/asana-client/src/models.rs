//! Request and response payloads for the Asana REST API.
//!
//! Every Asana body, in both directions, is wrapped in `{"data": ...}`. Ids
//! (`gid`) are opaque strings and are never parsed.

use serde::{Deserialize, Serialize};

/// The `{"data": ...}` wrapper around every request and response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Compact reference to another resource (assignee, workspace, project).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A work item.
///
/// List endpoints return compact records, so everything but `gid` is
/// defaulted when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub gid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_on: Option<String>,
    #[serde(default)]
    pub assignee: Option<ResourceRef>,
    #[serde(default)]
    pub projects: Vec<ResourceRef>,
}

/// A project (container of tasks).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub gid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub workspace: Option<ResourceRef>,
}

/// A workspace (grouping of projects).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub gid: String,
    #[serde(default)]
    pub name: String,
}

/// A section inside a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub gid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub project: Option<ResourceRef>,
}

// ── Request bodies ──

/// Body of `POST /tasks`.
///
/// Field order is the wire order: `name, notes, projects, due_on?, assignee?`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub name: String,
    pub notes: String,
    pub projects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl NewTask {
    pub fn new(name: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notes: String::new(),
            projects: vec![project_id.into()],
            due_on: None,
            assignee: None,
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    #[must_use]
    pub fn with_due_on(mut self, due_on: Option<String>) -> Self {
        self.due_on = due_on;
        self
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee: Option<String>) -> Self {
        self.assignee = assignee;
        self
    }
}

/// Body of `PUT /tasks/{task_gid}`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskUpdate {
    /// The update sent by "complete task": `{"completed": true}`.
    pub fn completion() -> Self {
        Self {
            completed: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `POST /projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProject {
    pub name: String,
    pub notes: String,
    pub workspace: String,
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Body of `PUT /projects/{project_gid}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `POST /projects/{project_gid}/sections`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSection {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_after: Option<String>,
}

impl NewSection {
    /// Build a section body. Asana accepts only one positioning hint, so
    /// `insert_before` wins when both are given.
    pub fn new(
        name: impl Into<String>,
        insert_before: Option<String>,
        insert_after: Option<String>,
    ) -> Self {
        let (insert_before, insert_after) = match (insert_before, insert_after) {
            (Some(before), _) => (Some(before), None),
            (None, after) => (None, after),
        };
        Self {
            name: name.into(),
            insert_before,
            insert_after,
        }
    }
}

/// Body of `POST /sections/{section_gid}/addTask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionTask {
    pub task: String,
}

/// Body of `POST /tasks/{task_gid}/addDependencies` and `removeDependencies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyChange {
    pub dependencies: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_minimal_wire_shape() {
        let body = Envelope::new(NewTask::new("Write spec", "999"));
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"data":{"name":"Write spec","notes":"","projects":["999"]}}"#
        );
    }

    #[test]
    fn test_new_task_optional_fields() {
        let task = NewTask::new("Ship", "1")
            .with_notes("release notes")
            .with_due_on(Some("2025-04-01".to_string()))
            .with_assignee(Some("me".to_string()));
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["due_on"], "2025-04-01");
        assert_eq!(value["assignee"], "me");
        assert_eq!(value["notes"], "release notes");
    }

    #[test]
    fn test_completion_update_shape() {
        let body = Envelope::new(TaskUpdate::completion());
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"data":{"completed":true}}"#
        );
    }

    #[test]
    fn test_section_insert_before_wins() {
        let section = NewSection::new("Backlog", Some("s1".into()), Some("s2".into()));
        assert_eq!(section.insert_before.as_deref(), Some("s1"));
        assert!(section.insert_after.is_none());
        assert_eq!(
            serde_json::to_string(&section).unwrap(),
            r#"{"name":"Backlog","insert_before":"s1"}"#
        );
    }

    #[test]
    fn test_section_insert_after_alone() {
        let section = NewSection::new("Done", None, Some("s2".into()));
        assert_eq!(
            serde_json::to_string(&section).unwrap(),
            r#"{"name":"Done","insert_after":"s2"}"#
        );
    }

    #[test]
    fn test_compact_task_deserializes() {
        let task: Task = serde_json::from_str(
            r#"{"gid":"1209708771942231","name":"Compact","resource_type":"task"}"#,
        )
        .unwrap();
        assert_eq!(task.gid, "1209708771942231");
        assert!(!task.completed);
        assert!(task.due_on.is_none());
    }

    #[test]
    fn test_project_update_empty() {
        assert!(ProjectUpdate::default().is_empty());
        let update = ProjectUpdate {
            public: Some(false),
            ..ProjectUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
