//! Shared fixtures: a recording fake of the Asana API and an in-process
//! gateway wired to a `GatewayClient` over `tokio::io::duplex`.

#![expect(
    dead_code,
    reason = "Test utilities shared across integration test modules"
)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use asana_client::{
    AsanaApi, AsanaConfig, ClientError, ClientResult, Envelope, NewProject, NewSection, NewTask,
    Project, ProjectUpdate, Section, Task, TaskUpdate, Workspace,
};
use asana_mcp::{gateway, AsanaMcpServer, GatewayClient, ToolContext};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf,
};
use tokio::task::JoinHandle;

pub const CREATED_TASK_GID: &str = "1209900000000001";
pub const CREATED_PROJECT_GID: &str = "1209900000000002";
pub const CREATED_SECTION_GID: &str = "1209900000000003";

/// One call the gateway made against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub op: &'static str,
    pub ids: Vec<String>,
    /// Request body as it would go on the wire, `{"data": ...}` included.
    pub body: Option<String>,
}

/// Fake `AsanaApi` that records every call and answers with canned data.
#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<RecordedCall>>,
    failures: Mutex<HashMap<&'static str, (u16, String)>>,
    delays: Mutex<HashMap<&'static str, Duration>>,
    tasks: Mutex<Vec<Task>>,
    dependencies: Mutex<Vec<Task>>,
}

impl RecordingApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `op` answer with an Asana-style error body.
    pub fn fail(&self, op: &'static str, status: u16, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(op, (status, message.to_string()));
    }

    pub fn delay(&self, op: &'static str, delay: Duration) {
        self.delays.lock().unwrap().insert(op, delay);
    }

    pub fn set_tasks(&self, tasks: Vec<Task>) {
        *self.tasks.lock().unwrap() = tasks;
    }

    pub fn set_dependencies(&self, tasks: Vec<Task>) {
        *self.dependencies.lock().unwrap() = tasks;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.op).collect()
    }

    pub fn only_call(&self) -> RecordedCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "Expected exactly one call, got {calls:?}");
        calls.into_iter().next().unwrap()
    }

    async fn enter<B: Serialize>(
        &self,
        op: &'static str,
        ids: &[&str],
        body: Option<&B>,
    ) -> ClientResult<()> {
        let body = body.map(|b| serde_json::to_string(&Envelope::new(b)).unwrap());
        self.calls.lock().unwrap().push(RecordedCall {
            op,
            ids: ids.iter().map(|s| s.to_string()).collect(),
            body,
        });

        let delay = self.delays.lock().unwrap().get(op).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().unwrap().get(op).cloned();
        match failure {
            Some((status, message)) => Err(ClientError::from_response(
                status,
                &serde_json::json!({ "errors": [{ "message": message }] }).to_string(),
            )),
            None => Ok(()),
        }
    }
}

const NO_BODY: Option<&()> = None;

#[async_trait]
impl AsanaApi for RecordingApi {
    async fn create_task(&self, task: &NewTask) -> ClientResult<Task> {
        self.enter("create_task", &[], Some(task)).await?;
        Ok(Task {
            gid: CREATED_TASK_GID.into(),
            name: task.name.clone(),
            ..Task::default()
        })
    }

    async fn list_tasks(&self, project_id: &str) -> ClientResult<Vec<Task>> {
        self.enter("list_tasks", &[project_id], NO_BODY).await?;
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> ClientResult<Task> {
        self.enter("update_task", &[task_id], Some(update)).await?;
        Ok(Task {
            gid: task_id.into(),
            completed: update.completed.unwrap_or(false),
            ..Task::default()
        })
    }

    async fn delete_task(&self, task_id: &str) -> ClientResult<()> {
        self.enter("delete_task", &[task_id], NO_BODY).await
    }

    async fn create_project(&self, project: &NewProject) -> ClientResult<Project> {
        self.enter("create_project", &[], Some(project)).await?;
        Ok(Project {
            gid: CREATED_PROJECT_GID.into(),
            name: project.name.clone(),
            ..Project::default()
        })
    }

    async fn list_projects(&self, workspace_id: &str) -> ClientResult<Vec<Project>> {
        self.enter("list_projects", &[workspace_id], NO_BODY).await?;
        Ok(Vec::new())
    }

    async fn get_project(&self, project_id: &str) -> ClientResult<Project> {
        self.enter("get_project", &[project_id], NO_BODY).await?;
        Ok(Project {
            gid: project_id.into(),
            name: "Roadmap".into(),
            notes: Some("Quarterly plan".into()),
            public: Some(true),
            ..Project::default()
        })
    }

    async fn update_project(
        &self,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> ClientResult<Project> {
        self.enter("update_project", &[project_id], Some(update))
            .await?;
        Ok(Project {
            gid: project_id.into(),
            ..Project::default()
        })
    }

    async fn delete_project(&self, project_id: &str) -> ClientResult<()> {
        self.enter("delete_project", &[project_id], NO_BODY).await
    }

    async fn list_workspaces(&self) -> ClientResult<Vec<Workspace>> {
        self.enter("list_workspaces", &[], NO_BODY).await?;
        Ok(vec![Workspace {
            gid: "1201956770127069".into(),
            name: "Engineering".into(),
        }])
    }

    async fn create_section(
        &self,
        project_id: &str,
        section: &NewSection,
    ) -> ClientResult<Section> {
        self.enter("create_section", &[project_id], Some(section))
            .await?;
        Ok(Section {
            gid: CREATED_SECTION_GID.into(),
            name: section.name.clone(),
            project: None,
        })
    }

    async fn list_sections(&self, project_id: &str) -> ClientResult<Vec<Section>> {
        self.enter("list_sections", &[project_id], NO_BODY).await?;
        Ok(Vec::new())
    }

    async fn add_task_to_section(&self, section_id: &str, task_id: &str) -> ClientResult<()> {
        self.enter("add_task_to_section", &[section_id, task_id], NO_BODY)
            .await
    }

    async fn add_dependencies(
        &self,
        task_id: &str,
        dependency_ids: &[String],
    ) -> ClientResult<()> {
        let body = asana_client::DependencyChange {
            dependencies: dependency_ids.to_vec(),
        };
        self.enter("add_dependencies", &[task_id], Some(&body))
            .await
            .map_err(ClientError::premium_gated)
    }

    async fn remove_dependencies(
        &self,
        task_id: &str,
        dependency_ids: &[String],
    ) -> ClientResult<()> {
        let body = asana_client::DependencyChange {
            dependencies: dependency_ids.to_vec(),
        };
        self.enter("remove_dependencies", &[task_id], Some(&body))
            .await
            .map_err(ClientError::premium_gated)
    }

    async fn get_dependencies(&self, task_id: &str) -> ClientResult<Vec<Task>> {
        self.enter("get_dependencies", &[task_id], NO_BODY)
            .await
            .map_err(ClientError::premium_gated)?;
        Ok(self.dependencies.lock().unwrap().clone())
    }
}

pub fn config(project: Option<&str>, workspace: Option<&str>) -> AsanaConfig {
    AsanaConfig {
        default_project_id: project.map(str::to_string),
        default_workspace_id: workspace.map(str::to_string),
        ..AsanaConfig::default()
    }
}

pub type DuplexClient = GatewayClient<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

/// A gateway task serving one end of a duplex pipe.
fn spawn_gateway(server: AsanaMcpServer) -> (DuplexStream, JoinHandle<std::io::Result<()>>) {
    let (client_end, server_end) = tokio::io::duplex(64 * 1024);
    let handle = tokio::spawn(async move {
        let (reader, writer) = tokio::io::split(server_end);
        gateway::serve(&server, reader, writer).await
    });
    (client_end, handle)
}

/// Gateway backed by `api`, with a handshaken client attached.
pub async fn connect(api: Arc<RecordingApi>, config: AsanaConfig) -> DuplexClient {
    let api: Arc<dyn AsanaApi> = api;
    let server = AsanaMcpServer::new(ToolContext::new(Arc::new(config), Some(api))).unwrap();
    connect_to(server).await
}

/// Stub-mode gateway with a handshaken client attached.
pub async fn connect_stub(config: AsanaConfig) -> DuplexClient {
    connect_to(AsanaMcpServer::offline(config).unwrap()).await
}

async fn connect_to(server: AsanaMcpServer) -> DuplexClient {
    let (client_end, _handle) = spawn_gateway(server);
    let (reader, writer) = tokio::io::split(client_end);
    let mut client = GatewayClient::new(reader, writer).with_timeout(Duration::from_secs(5));
    client.initialize().await.unwrap();
    client
}

/// Raw line access to a gateway, for framing-level tests.
pub struct RawGateway {
    writer: WriteHalf<DuplexStream>,
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    pub handle: JoinHandle<std::io::Result<()>>,
}

impl RawGateway {
    pub fn start(api: Arc<RecordingApi>, config: AsanaConfig) -> Self {
        let api: Arc<dyn AsanaApi> = api;
        let server = AsanaMcpServer::new(ToolContext::new(Arc::new(config), Some(api))).unwrap();
        let (client_end, handle) = spawn_gateway(server);
        let (reader, writer) = tokio::io::split(client_end);
        Self {
            writer,
            lines: BufReader::new(reader).lines(),
            handle,
        }
    }

    pub async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    /// Next output line, parsed. Panics on anything that is not JSON.
    pub async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("timed out waiting for gateway output")
            .unwrap()
            .expect("gateway closed its output");
        serde_json::from_str(&line)
            .unwrap_or_else(|e| panic!("gateway wrote a non-JSON line {line:?}: {e}"))
    }

    /// Close input and return whatever output remains.
    pub async fn finish(mut self) -> Vec<String> {
        self.writer.shutdown().await.unwrap();
        drop(self.writer);
        let mut rest = Vec::new();
        while let Some(line) = self.lines.next_line().await.unwrap() {
            rest.push(line);
        }
        self.handle.await.unwrap().unwrap();
        rest
    }
}
