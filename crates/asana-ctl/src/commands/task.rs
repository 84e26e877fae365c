//! Task command handlers for the Asana CLI

use super::{Arguments, ToolInvocation};
use crate::TaskCommands;

pub(crate) fn invocation(cmd: TaskCommands) -> ToolInvocation {
    match cmd {
        TaskCommands::Create {
            name,
            description,
            due_date,
            assignee,
            project,
        } => ToolInvocation::new(
            "create-task",
            Arguments::new()
                .set("name", name)
                .set_opt("description", description)
                .set_opt("dueDate", due_date)
                .set_opt("assignee", assignee)
                .set_opt("project", project),
        ),
        TaskCommands::List { project_id } => ToolInvocation::new(
            "list-tasks",
            Arguments::new().set_opt("projectId", project_id),
        ),
        TaskCommands::Update {
            task_id,
            name,
            description,
            due_date,
            assignee,
            completed,
        } => ToolInvocation::new(
            "update-task",
            Arguments::new()
                .set("taskId", task_id)
                .set_opt("name", name)
                .set_opt("description", description)
                .set_opt("dueDate", due_date)
                .set_opt("assignee", assignee)
                .set_opt("completed", completed),
        ),
        TaskCommands::Complete { task_id } => {
            ToolInvocation::new("complete-task", Arguments::new().set("taskId", task_id))
        }
        TaskCommands::Delete { task_id } => {
            ToolInvocation::new("delete-task", Arguments::new().set("taskId", task_id))
        }
    }
}
