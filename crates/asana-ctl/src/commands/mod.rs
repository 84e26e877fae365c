//! Command handlers for the Asana CLI
//!
//! Each command group maps its subcommand onto one gateway tool and its
//! camelCase arguments; [`run`] starts the gateway and performs the call.

pub(crate) mod dependency;
pub(crate) mod project;
pub(crate) mod section;
pub(crate) mod task;
pub(crate) mod workspace;

use std::time::Duration;

use anyhow::Context;
use asana_mcp::protocol::result_text;
use asana_mcp::GatewayClient;
use serde_json::{Map, Value};
use tracing::debug;

use crate::output;
use crate::Commands;

/// A tool name plus the arguments object to send it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ToolInvocation {
    pub tool: String,
    pub arguments: Value,
}

impl ToolInvocation {
    pub(crate) fn new(tool: &str, arguments: Arguments) -> Self {
        Self {
            tool: tool.to_string(),
            arguments: Value::Object(arguments.0),
        }
    }
}

/// Arguments object builder that leaves out flags the user did not pass.
#[derive(Debug, Default)]
pub(crate) struct Arguments(Map<String, Value>);

impl Arguments {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn set_opt(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }
}

/// What one run of the CLI does against the gateway.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    ListTools,
    Invoke(ToolInvocation),
}

impl Action {
    /// Resolve a parsed command. Fails only on a malformed `call --args`.
    pub(crate) fn from_command(command: Commands) -> anyhow::Result<Self> {
        let invocation = match command {
            Commands::Tools => return Ok(Self::ListTools),
            Commands::Task(cmd) => task::invocation(cmd),
            Commands::Project(cmd) => project::invocation(cmd),
            Commands::Workspace(cmd) => workspace::invocation(cmd),
            Commands::Section(cmd) => section::invocation(cmd),
            Commands::Dependency(cmd) => dependency::invocation(cmd),
            Commands::Call { tool, args } => raw_invocation(tool, &args)?,
        };
        Ok(Self::Invoke(invocation))
    }
}

fn raw_invocation(tool: String, args: &str) -> anyhow::Result<ToolInvocation> {
    let arguments: Value =
        serde_json::from_str(args).with_context(|| format!("--args is not valid JSON: {args}"))?;
    anyhow::ensure!(arguments.is_object(), "--args must be a JSON object, got {arguments}");
    Ok(ToolInvocation { tool, arguments })
}

/// Start the gateway, perform `action`, and shut the gateway down.
///
/// `Ok(false)` means the gateway answered with a protocol error, which has
/// already been printed.
pub(crate) async fn run(
    server: &str,
    server_args: &[String],
    timeout: Duration,
    action: Action,
    json: bool,
) -> anyhow::Result<bool> {
    let mut client = GatewayClient::spawn(server, server_args)?.with_timeout(timeout);
    let info = client
        .initialize()
        .await
        .with_context(|| format!("handshake with {server} failed"))?;
    debug!(server = %info.server_info.name, version = %info.server_info.version, "Connected");

    let succeeded = match action {
        Action::ListTools => {
            let tools = client.list_tools().await?;
            if json {
                output::json(&serde_json::to_value(&tools)?);
            } else {
                output::tools(&tools);
            }
            true
        }
        Action::Invoke(invocation) => {
            debug!(tool = %invocation.tool, arguments = %invocation.arguments, "Invoking tool");
            let result = client
                .invoke(&invocation.tool, invocation.arguments)
                .await
                .with_context(|| format!("{} did not complete", invocation.tool))?;
            match result.outcome {
                Ok(call) if json => {
                    output::json(&serde_json::to_value(&call)?);
                    true
                }
                Ok(call) => {
                    output::plain(result_text(&call));
                    true
                }
                Err(error) => {
                    output::rpc_error(&error);
                    false
                }
            }
        }
    };

    client.shutdown().await?;
    Ok(succeeded)
}
