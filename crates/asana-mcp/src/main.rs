//! Asana MCP Server
//!
//! Stdio tool gateway exposing Asana tasks, projects, sections and task
//! dependencies to LLM agents. Protocol lines go to stdout, logs to stderr.

use std::path::PathBuf;

use anyhow::Context;
use asana_client::AsanaConfig;
use asana_mcp::{gateway, AsanaMcpServer};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "asana-mcp", version, about = "Asana tool gateway over MCP stdio")]
struct Args {
    /// Config file (default: ./.asana-mcp.toml, then ~/.config/asana-mcp.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Default project id for tools that take an optional project
    #[arg(long)]
    project_id: Option<String>,

    /// Default workspace id for tools that take an optional workspace
    #[arg(long)]
    workspace_id: Option<String>,

    /// Serve stub output even if an access token is available
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("asana_mcp=info".parse()?)
                .add_directive("asana_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("asana-mcp starting (stdio transport)");

    let config = AsanaConfig::load(args.config.as_deref())
        .context("failed to load asana-mcp configuration")?
        .with_overrides(args.project_id, args.workspace_id);
    tracing::info!(
        token_source = %config.token_source,
        default_project_id = ?config.default_project_id,
        default_workspace_id = ?config.default_workspace_id,
        "Configuration resolved"
    );

    let server = if args.offline {
        AsanaMcpServer::offline(config)?
    } else {
        AsanaMcpServer::from_config(config)?
    };

    gateway::serve(&server, tokio::io::stdin(), tokio::io::stdout()).await?;

    Ok(())
}
