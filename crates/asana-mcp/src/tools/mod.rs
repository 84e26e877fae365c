//! Asana tool handlers and their parameter types.
//!
//! Every handler has the shape `async fn(Arc<ToolContext>, Params) -> CallToolResult`
//! and never fails at the protocol level: remote errors, missing defaults and
//! stub mode all come back as text.

pub mod dependencies;
pub mod params;
pub mod projects;
pub mod render;
pub mod sections;
pub mod tasks;
pub mod workspaces;

use std::sync::Arc;

use asana_client::{AsanaApi, AsanaConfig};
use thiserror::Error;

pub use params::*;

/// No id was passed and no default is configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing configuration: no {what} was given and no default is configured. Pass `{argument}` or set {env} (or --{flag}).")]
pub struct MissingConfiguration {
    pub what: &'static str,
    pub argument: &'static str,
    pub env: &'static str,
    pub flag: &'static str,
}

/// Shared, read-only state handed to every handler.
///
/// `api` is `None` when no access token was found; handlers then answer with
/// labelled stub output and do no network I/O.
#[derive(Debug, Clone)]
pub struct ToolContext {
    config: Arc<AsanaConfig>,
    api: Option<Arc<dyn AsanaApi>>,
}

impl ToolContext {
    pub fn new(config: Arc<AsanaConfig>, api: Option<Arc<dyn AsanaApi>>) -> Self {
        Self { config, api }
    }

    /// Stub-mode context: no remote client.
    pub fn offline(config: Arc<AsanaConfig>) -> Self {
        Self::new(config, None)
    }

    pub fn config(&self) -> &AsanaConfig {
        &self.config
    }

    pub fn api(&self) -> Option<&dyn AsanaApi> {
        self.api.as_deref()
    }

    pub fn is_stub(&self) -> bool {
        self.api.is_none()
    }

    pub fn resolve_project(
        &self,
        explicit: Option<String>,
        argument: &'static str,
    ) -> Result<String, MissingConfiguration> {
        explicit
            .or_else(|| self.config.default_project_id.clone())
            .ok_or(MissingConfiguration {
                what: "project id",
                argument,
                env: asana_client::config::ENV_PROJECT_ID,
                flag: "project-id",
            })
    }

    pub fn resolve_workspace(
        &self,
        explicit: Option<String>,
    ) -> Result<String, MissingConfiguration> {
        explicit
            .or_else(|| self.config.default_workspace_id.clone())
            .ok_or(MissingConfiguration {
                what: "workspace id",
                argument: "workspaceId",
                env: asana_client::config::ENV_WORKSPACE_ID,
                flag: "workspace-id",
            })
    }
}
