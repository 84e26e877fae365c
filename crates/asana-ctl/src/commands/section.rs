//! Section command handlers for the Asana CLI

use super::{Arguments, ToolInvocation};
use crate::SectionCommands;

pub(crate) fn invocation(cmd: SectionCommands) -> ToolInvocation {
    match cmd {
        SectionCommands::Create {
            project_id,
            name,
            insert_before,
            insert_after,
        } => ToolInvocation::new(
            "create-section",
            Arguments::new()
                .set("projectId", project_id)
                .set("name", name)
                .set_opt("insertBefore", insert_before)
                .set_opt("insertAfter", insert_after),
        ),
        SectionCommands::List { project_id } => ToolInvocation::new(
            "list-sections",
            Arguments::new().set_opt("projectId", project_id),
        ),
        SectionCommands::AddTask {
            section_id,
            task_id,
        } => ToolInvocation::new(
            "add-task-to-section",
            Arguments::new()
                .set("sectionId", section_id)
                .set("taskId", task_id),
        ),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_add_task() {
        let invocation = invocation(SectionCommands::AddTask {
            section_id: "8".into(),
            task_id: "5".into(),
        });
        assert_eq!(invocation.tool, "add-task-to-section");
        assert_eq!(invocation.arguments, json!({"sectionId": "8", "taskId": "5"}));
    }

    #[test]
    fn test_create_passes_both_positions_through() {
        // the gateway decides which one wins
        let invocation = invocation(SectionCommands::Create {
            project_id: "42".into(),
            name: "Backlog".into(),
            insert_before: Some("100".into()),
            insert_after: Some("200".into()),
        });
        assert_eq!(
            invocation.arguments,
            json!({"projectId": "42", "name": "Backlog", "insertBefore": "100", "insertAfter": "200"})
        );
    }
}
