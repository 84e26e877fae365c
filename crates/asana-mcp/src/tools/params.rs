//! Parameter structs for all Asana tools.
//!
//! Field names are camelCase on the wire. The advertised input schema and
//! the argument checks are both derived from these structs.

use schemars::JsonSchema;
use serde::Deserialize;

// ── tasks ──

/// Parameters for the `create-task` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskParams {
    #[schemars(description = "Task name")]
    pub name: String,
    /// Sent as the task's `notes`.
    #[schemars(description = "Task description (notes)")]
    pub description: Option<String>,
    /// Sent as `due_on`.
    #[schemars(description = "Due date, YYYY-MM-DD")]
    pub due_date: Option<String>,
    #[schemars(description = "Assignee gid, email or 'me'")]
    pub assignee: Option<String>,
    #[schemars(description = "Project id (defaults to the configured project)")]
    pub project: Option<String>,
}

/// Parameters for the `list-tasks` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksParams {
    #[schemars(description = "Project id (defaults to the configured project)")]
    pub project_id: Option<String>,
}

/// Parameters for the `update-task` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskParams {
    #[schemars(description = "Task id")]
    pub task_id: String,
    #[schemars(description = "New task name")]
    pub name: Option<String>,
    #[schemars(description = "New description (notes)")]
    pub description: Option<String>,
    #[schemars(description = "New due date, YYYY-MM-DD")]
    pub due_date: Option<String>,
    #[schemars(description = "New assignee gid, email or 'me'")]
    pub assignee: Option<String>,
    #[schemars(description = "Completion state")]
    pub completed: Option<bool>,
}

/// Parameters for tools addressing a single task
/// (`complete-task`, `delete-task`, `get-dependencies`).
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskIdParams {
    #[schemars(description = "Task id")]
    pub task_id: String,
}

// ── projects ──

/// Parameters for the `create-project` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectParams {
    #[schemars(description = "Project name")]
    pub name: String,
    #[schemars(description = "Project notes")]
    pub notes: Option<String>,
    #[schemars(description = "Project color, e.g. light-green")]
    pub color: Option<String>,
    #[schemars(description = "Visible to the whole team (default true)")]
    pub is_public: Option<bool>,
    #[schemars(description = "Workspace id (defaults to the configured workspace)")]
    pub workspace_id: Option<String>,
}

/// Parameters for tools addressing a single project
/// (`get-project`, `delete-project`).
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdParams {
    #[schemars(description = "Project id")]
    pub project_id: String,
}

/// Parameters for the `update-project` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectParams {
    #[schemars(description = "Project id")]
    pub project_id: String,
    #[schemars(description = "New project name")]
    pub name: Option<String>,
    #[schemars(description = "New project notes")]
    pub notes: Option<String>,
    #[schemars(description = "New project color")]
    pub color: Option<String>,
    #[schemars(description = "Visible to the whole team")]
    pub is_public: Option<bool>,
}

/// Parameters for the `list-projects` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsParams {
    #[schemars(description = "Workspace id (defaults to the configured workspace)")]
    pub workspace_id: Option<String>,
}

// ── workspaces ──

/// Parameters for the `list-workspaces` tool (none).
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListWorkspacesParams {}

// ── sections ──

/// Parameters for the `create-section` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionParams {
    #[schemars(description = "Project id")]
    pub project_id: String,
    #[schemars(description = "Section name")]
    pub name: String,
    #[schemars(description = "Place before this section id (wins over insertAfter)")]
    pub insert_before: Option<String>,
    #[schemars(description = "Place after this section id")]
    pub insert_after: Option<String>,
}

/// Parameters for the `list-sections` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListSectionsParams {
    #[schemars(description = "Project id (defaults to the configured project)")]
    pub project_id: Option<String>,
}

/// Parameters for the `add-task-to-section` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskToSectionParams {
    #[schemars(description = "Section id")]
    pub section_id: String,
    #[schemars(description = "Task id")]
    pub task_id: String,
}

// ── dependencies ──

/// Parameters for `add-dependencies` and `remove-dependencies`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependencyParams {
    #[schemars(description = "Dependent task id")]
    pub task_id: String,
    #[schemars(description = "Prerequisite task ids", length(min = 1))]
    pub dependency_ids: Vec<String>,
}
