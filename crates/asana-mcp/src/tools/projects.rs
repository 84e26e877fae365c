//! Project tools: `create-project`, `get-project`, `update-project`,
//! `delete-project`, `list-projects`.

use std::sync::Arc;

use asana_client::{NewProject, ProjectUpdate};
use tracing::{debug, warn};

use super::params::{CreateProjectParams, ListProjectsParams, ProjectIdParams, UpdateProjectParams};
use super::render;
use super::ToolContext;
use crate::protocol::CallToolResult;

pub async fn create_project(ctx: Arc<ToolContext>, params: CreateProjectParams) -> CallToolResult {
    let workspace = match ctx.resolve_workspace(params.workspace_id) {
        Ok(id) => id,
        Err(missing) => return render::text(missing.to_string()),
    };

    let Some(api) = ctx.api() else {
        return render::stub(format!(
            "Project \"{}\" created successfully in workspace {workspace}",
            params.name
        ));
    };

    let project = NewProject {
        name: params.name,
        notes: params.notes.unwrap_or_default(),
        workspace,
        public: params.is_public.unwrap_or(true),
        color: params.color,
    };

    match api.create_project(&project).await {
        Ok(created) => {
            debug!(project_id = %created.gid, "Project created");
            render::text(format!(
                "Project \"{}\" created successfully with ID: {}",
                project.name, created.gid
            ))
        }
        Err(e) => {
            warn!(error = %e, "create-project failed");
            render::remote_error("creating project", &e)
        }
    }
}

pub async fn get_project(ctx: Arc<ToolContext>, params: ProjectIdParams) -> CallToolResult {
    let Some(api) = ctx.api() else {
        return render::stub(format!("## Project {}\n\nNo details available", params.project_id));
    };

    match api.get_project(&params.project_id).await {
        Ok(project) => render::text(render::project_details(&project)),
        Err(e) => {
            warn!(project_id = %params.project_id, error = %e, "get-project failed");
            render::remote_error("getting project", &e)
        }
    }
}

pub async fn update_project(ctx: Arc<ToolContext>, params: UpdateProjectParams) -> CallToolResult {
    let update = ProjectUpdate {
        name: params.name,
        notes: params.notes,
        color: params.color,
        public: params.is_public,
    };
    if update.is_empty() {
        return render::text(format!(
            "No fields given for project {}; nothing to update",
            params.project_id
        ));
    }

    let Some(api) = ctx.api() else {
        return render::stub(format!("Project {} updated successfully", params.project_id));
    };

    match api.update_project(&params.project_id, &update).await {
        Ok(_) => render::text(format!(
            "Project {} updated successfully",
            params.project_id
        )),
        Err(e) => {
            warn!(project_id = %params.project_id, error = %e, "update-project failed");
            render::remote_error("updating project", &e)
        }
    }
}

pub async fn delete_project(ctx: Arc<ToolContext>, params: ProjectIdParams) -> CallToolResult {
    let Some(api) = ctx.api() else {
        return render::stub(format!("Project {} deleted successfully", params.project_id));
    };

    match api.delete_project(&params.project_id).await {
        Ok(()) => render::text(format!(
            "Project {} deleted successfully",
            params.project_id
        )),
        Err(e) => {
            warn!(project_id = %params.project_id, error = %e, "delete-project failed");
            render::remote_error("deleting project", &e)
        }
    }
}

pub async fn list_projects(ctx: Arc<ToolContext>, params: ListProjectsParams) -> CallToolResult {
    let workspace_id = match ctx.resolve_workspace(params.workspace_id) {
        Ok(id) => id,
        Err(missing) => return render::text(missing.to_string()),
    };

    let Some(api) = ctx.api() else {
        return render::stub("## Projects\n\nNo projects found");
    };

    match api.list_projects(&workspace_id).await {
        Ok(projects) => {
            debug!(workspace_id = %workspace_id, count = projects.len(), "Listed projects");
            render::text(render::projects_table(&projects))
        }
        Err(e) => {
            warn!(error = %e, "list-projects failed");
            render::remote_error("listing projects", &e)
        }
    }
}
