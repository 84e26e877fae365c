//! `list-workspaces`.

use std::sync::Arc;

use tracing::warn;

use super::params::ListWorkspacesParams;
use super::render;
use super::ToolContext;
use crate::protocol::CallToolResult;

pub async fn list_workspaces(ctx: Arc<ToolContext>, _params: ListWorkspacesParams) -> CallToolResult {
    let Some(api) = ctx.api() else {
        return render::stub("## Workspaces\n\nNo workspaces found");
    };

    match api.list_workspaces().await {
        Ok(workspaces) => render::text(render::workspaces_table(&workspaces)),
        Err(e) => {
            warn!(error = %e, "list-workspaces failed");
            render::remote_error("listing workspaces", &e)
        }
    }
}
