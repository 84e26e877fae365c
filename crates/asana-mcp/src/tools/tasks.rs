//! Task tools: `create-task`, `list-tasks`, `update-task`, `complete-task`,
//! `delete-task`.

use std::sync::Arc;

use asana_client::{NewTask, TaskUpdate};
use tracing::{debug, warn};

use super::params::{CreateTaskParams, ListTasksParams, TaskIdParams, UpdateTaskParams};
use super::render;
use super::ToolContext;
use crate::protocol::CallToolResult;

pub async fn create_task(ctx: Arc<ToolContext>, params: CreateTaskParams) -> CallToolResult {
    let project_id = match ctx.resolve_project(params.project, "project") {
        Ok(id) => id,
        Err(missing) => return render::text(missing.to_string()),
    };

    let Some(api) = ctx.api() else {
        return render::stub(format!(
            "Task \"{}\" created successfully in project {project_id}",
            params.name
        ));
    };

    let task = NewTask::new(params.name.as_str(), project_id)
        .with_notes(params.description.unwrap_or_default())
        .with_due_on(params.due_date)
        .with_assignee(params.assignee);

    match api.create_task(&task).await {
        Ok(created) => {
            debug!(task_id = %created.gid, "Task created");
            render::text(format!(
                "Task \"{}\" created successfully with ID: {}",
                params.name, created.gid
            ))
        }
        Err(e) => {
            warn!(error = %e, "create-task failed");
            render::remote_error("creating task", &e)
        }
    }
}

pub async fn list_tasks(ctx: Arc<ToolContext>, params: ListTasksParams) -> CallToolResult {
    let project_id = match ctx.resolve_project(params.project_id, "projectId") {
        Ok(id) => id,
        Err(missing) => return render::text(missing.to_string()),
    };

    let Some(api) = ctx.api() else {
        let examples = [
            asana_client::Task {
                gid: "1234567890".into(),
                name: "Example Task 1".into(),
                due_on: Some("2025-04-01".into()),
                ..Default::default()
            },
            asana_client::Task {
                gid: "0987654321".into(),
                name: "Example Task 2".into(),
                completed: true,
                due_on: Some("2025-03-15".into()),
                ..Default::default()
            },
        ];
        return render::text(render::tasks_table(
            &format!("Tasks {}", render::STUB_LABEL),
            &examples,
        ));
    };

    match api.list_tasks(&project_id).await {
        Ok(tasks) => {
            debug!(project_id = %project_id, count = tasks.len(), "Listed tasks");
            render::text(render::tasks_table("Tasks", &tasks))
        }
        Err(e) => {
            warn!(error = %e, "list-tasks failed");
            render::remote_error("listing tasks", &e)
        }
    }
}

pub async fn update_task(ctx: Arc<ToolContext>, params: UpdateTaskParams) -> CallToolResult {
    let update = TaskUpdate {
        name: params.name,
        notes: params.description,
        due_on: params.due_date,
        assignee: params.assignee,
        completed: params.completed,
    };
    if update.is_empty() {
        return render::text(format!(
            "No fields given for task {}; nothing to update",
            params.task_id
        ));
    }

    let Some(api) = ctx.api() else {
        return render::stub(format!("Task {} updated successfully", params.task_id));
    };

    match api.update_task(&params.task_id, &update).await {
        Ok(_) => render::text(format!("Task {} updated successfully", params.task_id)),
        Err(e) => {
            warn!(task_id = %params.task_id, error = %e, "update-task failed");
            render::remote_error("updating task", &e)
        }
    }
}

pub async fn complete_task(ctx: Arc<ToolContext>, params: TaskIdParams) -> CallToolResult {
    let Some(api) = ctx.api() else {
        return render::stub(format!("Task {} marked as completed", params.task_id));
    };

    match api.complete_task(&params.task_id).await {
        Ok(_) => render::text(format!("Task {} marked as completed", params.task_id)),
        Err(e) => {
            warn!(task_id = %params.task_id, error = %e, "complete-task failed");
            render::remote_error("completing task", &e)
        }
    }
}

pub async fn delete_task(ctx: Arc<ToolContext>, params: TaskIdParams) -> CallToolResult {
    let Some(api) = ctx.api() else {
        return render::stub(format!("Task {} deleted successfully", params.task_id));
    };

    match api.delete_task(&params.task_id).await {
        Ok(()) => render::text(format!("Task {} deleted successfully", params.task_id)),
        Err(e) => {
            warn!(task_id = %params.task_id, error = %e, "delete-task failed");
            render::remote_error("deleting task", &e)
        }
    }
}
