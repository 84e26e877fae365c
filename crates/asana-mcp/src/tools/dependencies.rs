//! Dependency tools: `add-dependencies`, `remove-dependencies`,
//! `get-dependencies`.
//!
//! Asana only allows dependencies on premium workspaces; a 402 arrives as
//! `ClientError::PremiumRequired` and its text says so.

use std::sync::Arc;

use tracing::warn;

use super::params::{DependencyParams, TaskIdParams};
use super::render::{self, DependencySummary};
use super::ToolContext;
use crate::protocol::{CallToolResult, Content};

pub async fn add_dependencies(ctx: Arc<ToolContext>, params: DependencyParams) -> CallToolResult {
    let done = format!(
        "Dependencies {} added to task {} successfully",
        params.dependency_ids.join(", "),
        params.task_id
    );
    let Some(api) = ctx.api() else {
        return render::stub(done);
    };

    match api
        .add_dependencies(&params.task_id, &params.dependency_ids)
        .await
    {
        Ok(()) => render::text(done),
        Err(e) => {
            warn!(task_id = %params.task_id, status = ?e.status(), error = %e, "add-dependencies failed");
            render::remote_error("adding dependencies to task", &e)
        }
    }
}

pub async fn remove_dependencies(
    ctx: Arc<ToolContext>,
    params: DependencyParams,
) -> CallToolResult {
    let done = format!(
        "Dependencies {} removed from task {} successfully",
        params.dependency_ids.join(", "),
        params.task_id
    );
    let Some(api) = ctx.api() else {
        return render::stub(done);
    };

    match api
        .remove_dependencies(&params.task_id, &params.dependency_ids)
        .await
    {
        Ok(()) => render::text(done),
        Err(e) => {
            warn!(task_id = %params.task_id, status = ?e.status(), error = %e, "remove-dependencies failed");
            render::remote_error("removing dependencies from task", &e)
        }
    }
}

/// Two blocks: a heading line, then the dependencies as pretty JSON.
pub async fn get_dependencies(ctx: Arc<ToolContext>, params: TaskIdParams) -> CallToolResult {
    let Some(api) = ctx.api() else {
        let examples = [
            DependencySummary {
                id: "12345".into(),
                name: "Stub dependency 1".into(),
                completed: false,
            },
            DependencySummary {
                id: "67890".into(),
                name: "Stub dependency 2".into(),
                completed: true,
            },
        ];
        return CallToolResult::success(vec![
            Content::text(format!(
                "Dependencies for task {} {}:",
                params.task_id,
                render::STUB_LABEL
            )),
            Content::text(render::dependencies_json(&examples)),
        ]);
    };

    match api.get_dependencies(&params.task_id).await {
        Ok(tasks) => {
            let summaries: Vec<DependencySummary> =
                tasks.iter().map(DependencySummary::from).collect();
            CallToolResult::success(vec![
                Content::text(format!("Dependencies for task {}:", params.task_id)),
                Content::text(render::dependencies_json(&summaries)),
            ])
        }
        Err(e) => {
            warn!(task_id = %params.task_id, status = ?e.status(), error = %e, "get-dependencies failed");
            render::remote_error("getting dependencies for task", &e)
        }
    }
}
