//! Dependency command handlers for the Asana CLI

use super::{Arguments, ToolInvocation};
use crate::DependencyCommands;

pub(crate) fn invocation(cmd: DependencyCommands) -> ToolInvocation {
    match cmd {
        DependencyCommands::Add {
            task_id,
            dependency_ids,
        } => ToolInvocation::new(
            "add-dependencies",
            Arguments::new()
                .set("taskId", task_id)
                .set("dependencyIds", dependency_ids),
        ),
        DependencyCommands::Remove {
            task_id,
            dependency_ids,
        } => ToolInvocation::new(
            "remove-dependencies",
            Arguments::new()
                .set("taskId", task_id)
                .set("dependencyIds", dependency_ids),
        ),
        DependencyCommands::List { task_id } => {
            ToolInvocation::new("get-dependencies", Arguments::new().set("taskId", task_id))
        }
    }
}
