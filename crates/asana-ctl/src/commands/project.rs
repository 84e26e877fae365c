//! Project command handlers for the Asana CLI

use super::{Arguments, ToolInvocation};
use crate::ProjectCommands;

pub(crate) fn invocation(cmd: ProjectCommands) -> ToolInvocation {
    match cmd {
        ProjectCommands::Create {
            name,
            notes,
            color,
            public,
            workspace_id,
        } => ToolInvocation::new(
            "create-project",
            Arguments::new()
                .set("name", name)
                .set_opt("notes", notes)
                .set_opt("color", color)
                .set_opt("isPublic", public)
                .set_opt("workspaceId", workspace_id),
        ),
        ProjectCommands::Get { project_id } => {
            ToolInvocation::new("get-project", Arguments::new().set("projectId", project_id))
        }
        ProjectCommands::Update {
            project_id,
            name,
            notes,
            color,
            public,
        } => ToolInvocation::new(
            "update-project",
            Arguments::new()
                .set("projectId", project_id)
                .set_opt("name", name)
                .set_opt("notes", notes)
                .set_opt("color", color)
                .set_opt("isPublic", public),
        ),
        ProjectCommands::Delete { project_id } => ToolInvocation::new(
            "delete-project",
            Arguments::new().set("projectId", project_id),
        ),
        ProjectCommands::List { workspace_id } => ToolInvocation::new(
            "list-projects",
            Arguments::new().set_opt("workspaceId", workspace_id),
        ),
    }
}
