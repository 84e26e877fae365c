//! Markdown/text rendering of Asana resources for tool output.

use asana_client::{ClientError, Project, Section, Task, Workspace};
use serde::Serialize;

use crate::protocol::{CallToolResult, Content};

pub const STUB_LABEL: &str = "(stub implementation)";

const NOTES_PREVIEW_CHARS: usize = 50;

/// A single text block.
pub fn text(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Tool output for a failed remote call: `Error <verb>: <cause>`.
pub fn remote_error(verb: &str, err: &ClientError) -> CallToolResult {
    text(format!("Error {verb}: {err}"))
}

/// Stub-mode output, always labelled.
pub fn stub(body: impl AsRef<str>) -> CallToolResult {
    text(format!("{} {STUB_LABEL}", body.as_ref()))
}

/// Make a value safe inside a markdown table cell.
fn cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}

fn preview(notes: Option<&str>) -> String {
    match notes.map(str::trim).filter(|n| !n.is_empty()) {
        None => "No notes".to_string(),
        Some(notes) if notes.chars().count() > NOTES_PREVIEW_CHARS => {
            let cut: String = notes.chars().take(NOTES_PREVIEW_CHARS).collect();
            format!("{cut}...")
        }
        Some(notes) => notes.to_string(),
    }
}

fn table(title: &str, header: &str, separator: &str, rows: impl Iterator<Item = String>) -> String {
    let mut out = format!("## {title}\n\n{header}\n{separator}\n");
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    out
}

pub fn tasks_table(title: &str, tasks: &[Task]) -> String {
    table(
        title,
        "| ID | Name | Completed | Due Date |",
        "|---|------|-----------|----------|",
        tasks.iter().map(|t| {
            format!(
                "| {} | {} | {} | {} |",
                t.gid,
                cell(&t.name),
                if t.completed { "✓" } else { "✗" },
                t.due_on.as_deref().unwrap_or("No due date")
            )
        }),
    )
}

pub fn projects_table(projects: &[Project]) -> String {
    table(
        "Projects",
        "| ID | Name | Notes |",
        "|---|------|-------|",
        projects.iter().map(|p| {
            format!(
                "| {} | {} | {} |",
                p.gid,
                cell(&p.name),
                cell(&preview(p.notes.as_deref()))
            )
        }),
    )
}

pub fn workspaces_table(workspaces: &[Workspace]) -> String {
    table(
        "Workspaces",
        "| ID | Name |",
        "|---|------|",
        workspaces
            .iter()
            .map(|w| format!("| {} | {} |", w.gid, cell(&w.name))),
    )
}

pub fn sections_table(project_id: &str, sections: &[Section]) -> String {
    table(
        &format!("Sections in project {project_id}"),
        "| ID | Name |",
        "|---|------|",
        sections
            .iter()
            .map(|s| format!("| {} | {} |", s.gid, cell(&s.name))),
    )
}

pub fn project_details(project: &Project) -> String {
    let mut out = format!("## Project: {}\n\n", project.name);
    out.push_str(&format!("- **ID**: {}\n", project.gid));
    out.push_str(&format!(
        "- **Notes**: {}\n",
        project
            .notes
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("No notes")
    ));
    out.push_str(&format!(
        "- **Color**: {}\n",
        project.color.as_deref().unwrap_or("none")
    ));
    if let Some(public) = project.public {
        out.push_str(&format!("- **Public**: {}\n", if public { "yes" } else { "no" }));
    }
    if let Some(archived) = project.archived {
        out.push_str(&format!("- **Archived**: {}\n", if archived { "yes" } else { "no" }));
    }
    if let Some(workspace) = &project.workspace {
        match &workspace.name {
            Some(name) => out.push_str(&format!("- **Workspace**: {name} ({})\n", workspace.gid)),
            None => out.push_str(&format!("- **Workspace**: {}\n", workspace.gid)),
        }
    }
    out
}

/// Compact dependency record shown by `get-dependencies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySummary {
    pub id: String,
    pub name: String,
    pub completed: bool,
}

impl From<&Task> for DependencySummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.gid.clone(),
            name: task.name.clone(),
            completed: task.completed,
        }
    }
}

pub fn dependencies_json(dependencies: &[DependencySummary]) -> String {
    serde_json::to_string_pretty(dependencies).unwrap_or_else(|_| "[]".to_string())
}
