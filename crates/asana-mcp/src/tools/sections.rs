//! Section tools: `create-section`, `list-sections`, `add-task-to-section`.

use std::sync::Arc;

use asana_client::NewSection;
use tracing::{debug, warn};

use super::params::{AddTaskToSectionParams, CreateSectionParams, ListSectionsParams};
use super::render;
use super::ToolContext;
use crate::protocol::CallToolResult;

pub async fn create_section(ctx: Arc<ToolContext>, params: CreateSectionParams) -> CallToolResult {
    let Some(api) = ctx.api() else {
        return render::stub(format!(
            "Section \"{}\" created successfully in project {}",
            params.name, params.project_id
        ));
    };

    let section = NewSection::new(params.name.as_str(), params.insert_before, params.insert_after);
    match api.create_section(&params.project_id, &section).await {
        Ok(created) => {
            debug!(section_id = %created.gid, "Section created");
            render::text(format!(
                "Section \"{}\" created successfully in project {} with ID: {}",
                params.name, params.project_id, created.gid
            ))
        }
        Err(e) => {
            warn!(project_id = %params.project_id, error = %e, "create-section failed");
            render::remote_error("creating section", &e)
        }
    }
}

pub async fn list_sections(ctx: Arc<ToolContext>, params: ListSectionsParams) -> CallToolResult {
    let project_id = match ctx.resolve_project(params.project_id, "projectId") {
        Ok(id) => id,
        Err(missing) => return render::text(missing.to_string()),
    };

    let Some(api) = ctx.api() else {
        return render::stub(format!("## Sections in project {project_id}\n\nNo sections found"));
    };

    match api.list_sections(&project_id).await {
        Ok(sections) => render::text(render::sections_table(&project_id, &sections)),
        Err(e) => {
            warn!(project_id = %project_id, error = %e, "list-sections failed");
            render::remote_error("listing sections", &e)
        }
    }
}

pub async fn add_task_to_section(
    ctx: Arc<ToolContext>,
    params: AddTaskToSectionParams,
) -> CallToolResult {
    let done = format!(
        "Task {} added to section {} successfully",
        params.task_id, params.section_id
    );
    let Some(api) = ctx.api() else {
        return render::stub(done);
    };

    match api
        .add_task_to_section(&params.section_id, &params.task_id)
        .await
    {
        Ok(()) => render::text(done),
        Err(e) => {
            warn!(section_id = %params.section_id, task_id = %params.task_id, error = %e, "add-task-to-section failed");
            render::remote_error("adding task to section", &e)
        }
    }
}
