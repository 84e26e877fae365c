//! The Asana MCP server: tool table plus shared handler context.
//!
//! **Tasks**
//! - `create-task` — Create a task in a project (default project if omitted)
//! - `list-tasks` — List a project's tasks as a markdown table
//! - `update-task` — Change name, notes, due date, assignee or completion
//! - `complete-task` — Mark a task completed
//! - `delete-task` — Delete a task
//!
//! **Projects and workspaces**
//! - `create-project` — Create a project in a workspace (default workspace if omitted)
//! - `get-project` — Show one project's details
//! - `update-project` — Change name, notes, color or visibility
//! - `delete-project` — Delete a project
//! - `list-projects` — List a workspace's projects
//! - `list-workspaces` — List workspaces visible to the token
//!
//! **Sections**
//! - `create-section` — Create a section, optionally positioned before/after another
//! - `list-sections` — List a project's sections
//! - `add-task-to-section` — Move a task into a section
//!
//! **Dependencies (premium workspaces only)**
//! - `add-dependencies` / `remove-dependencies` — Edit a task's prerequisites
//! - `get-dependencies` — List a task's prerequisites

use std::sync::Arc;

use asana_client::{AsanaApi, AsanaConfig, AsanaRestClient};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{GatewayError, RegistryError};
use crate::protocol::{
    negotiate_protocol_version, CallToolResult, Implementation, InitializeResult,
    ServerCapabilities,
};
use crate::registry::ToolRegistry;
use crate::tools::{dependencies, projects, sections, tasks, workspaces, ToolContext};

pub const SERVER_NAME: &str = "asana-mcp";

/// Tool table and context, shared by the dispatch loop.
#[derive(Debug, Clone)]
pub struct AsanaMcpServer {
    registry: Arc<ToolRegistry<ToolContext>>,
    context: Arc<ToolContext>,
}

impl AsanaMcpServer {
    pub fn new(context: ToolContext) -> Result<Self, RegistryError> {
        Ok(Self {
            registry: Arc::new(build_registry()?),
            context: Arc::new(context),
        })
    }

    /// Build from resolved config. Without a usable token the server runs in
    /// stub mode instead of failing.
    pub fn from_config(config: AsanaConfig) -> Result<Self, RegistryError> {
        let api: Option<Arc<dyn AsanaApi>> = if config.has_credentials() {
            match AsanaRestClient::new(&config) {
                Ok(client) => {
                    info!(base_url = %client.base_url(), token_source = %config.token_source, "Asana client ready");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    warn!(error = %e, "Failed to build Asana client, using stub implementations");
                    None
                }
            }
        } else {
            warn!("No Asana access token found, using stub implementations");
            None
        };
        Self::new(ToolContext::new(Arc::new(config), api))
    }

    /// Stub mode regardless of credentials.
    pub fn offline(config: AsanaConfig) -> Result<Self, RegistryError> {
        Self::new(ToolContext::offline(Arc::new(config)))
    }

    pub fn registry(&self) -> &ToolRegistry<ToolContext> {
        &self.registry
    }

    pub fn context(&self) -> &Arc<ToolContext> {
        &self.context
    }

    pub fn is_stub(&self) -> bool {
        self.context.is_stub()
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<CallToolResult, GatewayError> {
        self.registry
            .invoke(Arc::clone(&self.context), name, arguments)
            .await
    }

    pub fn get_info(&self, requested_version: Option<&str>) -> InitializeResult {
        let mut instructions = String::from(
            "Manage Asana work from here. Tasks: create-task, list-tasks, update-task, \
             complete-task, delete-task. Projects: create-project, get-project, update-project, \
             delete-project, list-projects; list-workspaces finds workspace ids. Sections: \
             create-section, list-sections, add-task-to-section. Dependencies (premium \
             workspaces only): add-dependencies, remove-dependencies, get-dependencies.\n\
             Project and workspace ids are optional where a default is configured.",
        );
        if self.is_stub() {
            instructions.push_str(
                "\nRunning WITHOUT an Asana access token: every tool answers with stub output \
                 labelled (stub implementation) and nothing is sent to Asana.",
            );
        }

        InitializeResult {
            protocol_version: negotiate_protocol_version(requested_version),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: Some("Asana MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "MCP server exposing Asana tasks, projects, sections and dependencies"
                        .to_string(),
                ),
                icons: None,
                website_url: None,
            },
            instructions: Some(instructions),
        }
    }
}

/// The fixed tool table, in advertised order. Argument schemas come from
/// the parameter structs in [`crate::tools::params`].
pub fn build_registry() -> Result<ToolRegistry<ToolContext>, RegistryError> {
    ToolRegistry::builder()
        // ── tasks ──
        .tool("create-task", "Create a new Asana task", tasks::create_task)
        .tool("list-tasks", "List the tasks of a project", tasks::list_tasks)
        .tool("update-task", "Update an existing Asana task", tasks::update_task)
        .tool("complete-task", "Mark a task as completed", tasks::complete_task)
        .tool("delete-task", "Delete a task", tasks::delete_task)
        // ── projects ──
        .tool(
            "create-project",
            "Create a new Asana project",
            projects::create_project,
        )
        .tool(
            "get-project",
            "Show the details of a project",
            projects::get_project,
        )
        .tool(
            "update-project",
            "Update an existing project",
            projects::update_project,
        )
        .tool("delete-project", "Delete a project", projects::delete_project)
        .tool(
            "list-projects",
            "List the projects of a workspace",
            projects::list_projects,
        )
        .tool(
            "list-workspaces",
            "List the workspaces visible to the token",
            workspaces::list_workspaces,
        )
        // ── sections ──
        .tool(
            "create-section",
            "Create a section in a project",
            sections::create_section,
        )
        .tool(
            "list-sections",
            "List the sections of a project",
            sections::list_sections,
        )
        .tool(
            "add-task-to-section",
            "Move a task into a section",
            sections::add_task_to_section,
        )
        // ── dependencies ──
        .tool(
            "add-dependencies",
            "Make a task depend on other tasks (premium workspaces only)",
            dependencies::add_dependencies,
        )
        .tool(
            "remove-dependencies",
            "Remove prerequisites from a task (premium workspaces only)",
            dependencies::remove_dependencies,
        )
        .tool(
            "get-dependencies",
            "List the prerequisites of a task (premium workspaces only)",
            dependencies::get_dependencies,
        )
        .build()
}
