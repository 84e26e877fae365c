//! Transport-agnostic trait over the Asana operations the gateway needs.
//!
//! [`crate::AsanaRestClient`] is the production implementation; tool handlers
//! only ever see `dyn AsanaApi`, so tests substitute a recording fake.

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::models::{
    NewProject, NewSection, NewTask, Project, ProjectUpdate, Section, Task, TaskUpdate, Workspace,
};

#[async_trait]
pub trait AsanaApi: Send + Sync + std::fmt::Debug {
    // ── tasks ──

    /// `POST /tasks`
    async fn create_task(&self, task: &NewTask) -> ClientResult<Task>;

    /// `GET /projects/{project_id}/tasks`
    async fn list_tasks(&self, project_id: &str) -> ClientResult<Vec<Task>>;

    /// `PUT /tasks/{task_id}`
    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> ClientResult<Task>;

    /// `PUT /tasks/{task_id}` with `{"completed": true}`
    async fn complete_task(&self, task_id: &str) -> ClientResult<Task> {
        self.update_task(task_id, &TaskUpdate::completion()).await
    }

    /// `DELETE /tasks/{task_id}`
    async fn delete_task(&self, task_id: &str) -> ClientResult<()>;

    // ── projects ──

    /// `POST /projects`
    async fn create_project(&self, project: &NewProject) -> ClientResult<Project>;

    /// `GET /workspaces/{workspace_id}/projects`
    async fn list_projects(&self, workspace_id: &str) -> ClientResult<Vec<Project>>;

    /// `GET /projects/{project_id}`
    async fn get_project(&self, project_id: &str) -> ClientResult<Project>;

    /// `PUT /projects/{project_id}`
    async fn update_project(
        &self,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> ClientResult<Project>;

    /// `DELETE /projects/{project_id}`
    async fn delete_project(&self, project_id: &str) -> ClientResult<()>;

    // ── workspaces ──

    /// `GET /workspaces`
    async fn list_workspaces(&self) -> ClientResult<Vec<Workspace>>;

    // ── sections ──

    /// `POST /projects/{project_id}/sections`
    async fn create_section(&self, project_id: &str, section: &NewSection)
        -> ClientResult<Section>;

    /// `GET /projects/{project_id}/sections`
    async fn list_sections(&self, project_id: &str) -> ClientResult<Vec<Section>>;

    /// `POST /sections/{section_id}/addTask`
    async fn add_task_to_section(&self, section_id: &str, task_id: &str) -> ClientResult<()>;

    // ── dependencies (premium only) ──

    /// `POST /tasks/{task_id}/addDependencies`
    async fn add_dependencies(&self, task_id: &str, dependency_ids: &[String])
        -> ClientResult<()>;

    /// `POST /tasks/{task_id}/removeDependencies`
    async fn remove_dependencies(
        &self,
        task_id: &str,
        dependency_ids: &[String],
    ) -> ClientResult<()>;

    /// `GET /tasks/{task_id}/dependencies`
    async fn get_dependencies(&self, task_id: &str) -> ClientResult<Vec<Task>>;
}
