//! REST implementation of [`AsanaApi`] over `reqwest`.
//!
//! One request per call, no retries. Every request carries
//! `Authorization: Bearer <token>` and `Content-Type: application/json`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::api::AsanaApi;
use crate::config::AsanaConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    DependencyChange, Envelope, NewProject, NewSection, NewTask, Project, ProjectUpdate, Section,
    SectionTask, Task, TaskUpdate, Workspace,
};

/// Authenticated HTTP client for the Asana REST API.
#[derive(Clone)]
pub struct AsanaRestClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for AsanaRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsanaRestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AsanaRestClient {
    /// Build a client from resolved config. Fails if no access token is configured.
    pub fn new(config: &AsanaConfig) -> ClientResult<Self> {
        let token = config.access_token.clone().ok_or_else(|| {
            ClientError::config_error(
                "no Asana access token: set ASANA_ACCESS_TOKEN or create an asana.token file",
            )
        })?;

        let base_url = config.base_url.trim_end_matches('/');
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ClientError::config_error(format!("invalid base URL: {base_url}")))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL extended by `segments`, each encoded as exactly one path
    /// segment. Ids can never add segments, climb out of their collection or
    /// start a query.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ClientError::InvalidId((*bad).to_string()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::config_error("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        Ok(self
            .http
            .request(method, self.endpoint(segments)?)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json"))
    }

    fn request_with_body<B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<RequestBuilder> {
        Ok(self.request(method, segments)?.json(&Envelope::new(body)))
    }

    /// Send and decode the `data` member of a successful response.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = Self::checked(builder).await?;
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }

    /// Send and discard the body of a successful response.
    async fn send_unit(&self, builder: RequestBuilder) -> ClientResult<()> {
        Self::checked(builder).await.map(|_| ())
    }

    async fn checked(builder: RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Asana response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_response(status.as_u16(), &body))
    }
}

#[async_trait]
impl AsanaApi for AsanaRestClient {
    async fn create_task(&self, task: &NewTask) -> ClientResult<Task> {
        debug!(name = %task.name, projects = ?task.projects, "Creating task");
        self.send(self.request_with_body(Method::POST, &["tasks"], task)?)
            .await
    }

    async fn list_tasks(&self, project_id: &str) -> ClientResult<Vec<Task>> {
        debug!(project_id, "Listing tasks");
        self.send(self.request(Method::GET, &["projects", project_id, "tasks"])?)
            .await
    }

    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> ClientResult<Task> {
        debug!(task_id, ?update, "Updating task");
        self.send(self.request_with_body(Method::PUT, &["tasks", task_id], update)?)
            .await
    }

    async fn delete_task(&self, task_id: &str) -> ClientResult<()> {
        debug!(task_id, "Deleting task");
        self.send_unit(self.request(Method::DELETE, &["tasks", task_id])?)
            .await
    }

    async fn create_project(&self, project: &NewProject) -> ClientResult<Project> {
        debug!(name = %project.name, workspace = %project.workspace, "Creating project");
        self.send(self.request_with_body(Method::POST, &["projects"], project)?)
            .await
    }

    async fn list_projects(&self, workspace_id: &str) -> ClientResult<Vec<Project>> {
        debug!(workspace_id, "Listing projects");
        self.send(self.request(Method::GET, &["workspaces", workspace_id, "projects"])?)
            .await
    }

    async fn get_project(&self, project_id: &str) -> ClientResult<Project> {
        debug!(project_id, "Getting project");
        self.send(self.request(Method::GET, &["projects", project_id])?)
            .await
    }

    async fn update_project(
        &self,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> ClientResult<Project> {
        debug!(project_id, ?update, "Updating project");
        self.send(self.request_with_body(Method::PUT, &["projects", project_id], update)?)
            .await
    }

    async fn delete_project(&self, project_id: &str) -> ClientResult<()> {
        debug!(project_id, "Deleting project");
        self.send_unit(self.request(Method::DELETE, &["projects", project_id])?)
            .await
    }

    async fn list_workspaces(&self) -> ClientResult<Vec<Workspace>> {
        debug!("Listing workspaces");
        self.send(self.request(Method::GET, &["workspaces"])?).await
    }

    async fn create_section(
        &self,
        project_id: &str,
        section: &NewSection,
    ) -> ClientResult<Section> {
        debug!(project_id, name = %section.name, "Creating section");
        self.send(self.request_with_body(
            Method::POST,
            &["projects", project_id, "sections"],
            section,
        )?)
        .await
    }

    async fn list_sections(&self, project_id: &str) -> ClientResult<Vec<Section>> {
        debug!(project_id, "Listing sections");
        self.send(self.request(Method::GET, &["projects", project_id, "sections"])?)
            .await
    }

    async fn add_task_to_section(&self, section_id: &str, task_id: &str) -> ClientResult<()> {
        debug!(section_id, task_id, "Adding task to section");
        let body = SectionTask {
            task: task_id.to_string(),
        };
        self.send_unit(self.request_with_body(
            Method::POST,
            &["sections", section_id, "addTask"],
            &body,
        )?)
        .await
    }

    async fn add_dependencies(
        &self,
        task_id: &str,
        dependency_ids: &[String],
    ) -> ClientResult<()> {
        debug!(task_id, ?dependency_ids, "Adding dependencies");
        let body = DependencyChange {
            dependencies: dependency_ids.to_vec(),
        };
        self.send_unit(self.request_with_body(
            Method::POST,
            &["tasks", task_id, "addDependencies"],
            &body,
        )?)
        .await
        .map_err(ClientError::premium_gated)
    }

    async fn remove_dependencies(
        &self,
        task_id: &str,
        dependency_ids: &[String],
    ) -> ClientResult<()> {
        debug!(task_id, ?dependency_ids, "Removing dependencies");
        let body = DependencyChange {
            dependencies: dependency_ids.to_vec(),
        };
        self.send_unit(self.request_with_body(
            Method::POST,
            &["tasks", task_id, "removeDependencies"],
            &body,
        )?)
        .await
        .map_err(ClientError::premium_gated)
    }

    async fn get_dependencies(&self, task_id: &str) -> ClientResult<Vec<Task>> {
        debug!(task_id, "Getting dependencies");
        self.send(self.request(Method::GET, &["tasks", task_id, "dependencies"])?)
            .await
            .map_err(ClientError::premium_gated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AsanaRestClient {
        let config = AsanaConfig {
            access_token: Some("test-token".into()),
            base_url: "https://app.asana.com/api/1.0/".into(),
            ..AsanaConfig::default()
        };
        AsanaRestClient::new(&config).unwrap()
    }

    #[test]
    fn test_new_requires_token() {
        let err = AsanaRestClient::new(&AsanaConfig::default()).unwrap_err();
        assert!(matches!(err, ClientError::ConfigError(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url(), "https://app.asana.com/api/1.0");
    }

    #[test]
    fn test_request_headers_and_url() {
        let request = client()
            .request(Method::GET, &["projects", "42", "tasks"])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://app.asana.com/api/1.0/projects/42/tasks"
        );
        assert_eq!(request.headers()["authorization"], "Bearer test-token");
        assert_eq!(request.headers()["content-type"], "application/json");
    }

    #[test]
    fn test_request_body_is_enveloped() {
        let request = client()
            .request_with_body(Method::POST, &["tasks"], &NewTask::new("Write spec", "999"))
            .unwrap()
            .build()
            .unwrap();
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(
            std::str::from_utf8(body).unwrap(),
            r#"{"data":{"name":"Write spec","notes":"","projects":["999"]}}"#
        );
        assert_eq!(request.headers().get_all("content-type").iter().count(), 1);
    }

    #[test]
    fn test_endpoint_encodes_each_id_as_one_segment() {
        let client = client();
        let url = client
            .endpoint(&["tasks", "123/../../projects/456"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://app.asana.com/api/1.0/tasks/123%2F..%2F..%2Fprojects%2F456"
        );
        let url = client.endpoint(&["tasks", "9?x=1#frag"]).unwrap();
        assert_eq!(url.path(), "/api/1.0/tasks/9%3Fx=1%23frag");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_endpoint_rejects_ids_that_are_not_segments() {
        for id in ["", ".", ".."] {
            let err = client().endpoint(&["tasks", id]).unwrap_err();
            assert!(matches!(err, ClientError::InvalidId(ref bad) if bad == id), "{err}");
        }
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let config = AsanaConfig {
            access_token: Some("test-token".into()),
            base_url: "not a url".into(),
            ..AsanaConfig::default()
        };
        let err = AsanaRestClient::new(&config).unwrap_err();
        assert!(matches!(err, ClientError::ConfigError(_)));
    }

    #[test]
    fn test_debug_hides_token() {
        let debug_str = format!("{:?}", client());
        assert!(!debug_str.contains("test-token"));
    }
}
