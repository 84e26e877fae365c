//! Asana CLI
//!
//! Starts an `asana-mcp` gateway as a child process, performs the MCP
//! handshake and invokes one tool per run. Tool text goes to stdout; logs and
//! errors go to stderr.

mod commands;
mod output;

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::Action;

#[derive(Debug, Parser)]
#[command(name = "asana-ctl", version, about = "Invoke asana-mcp tools from the command line")]
#[command(styles = output::clap_styles())]
pub(crate) struct Cli {
    /// Gateway program to start
    #[arg(long, env = "ASANA_MCP_SERVER", default_value = "asana-mcp", global = true)]
    server: String,

    /// Extra argument passed to the gateway (repeatable)
    #[arg(long = "server-arg", allow_hyphen_values = true, global = true)]
    server_args: Vec<String>,

    /// Seconds to wait for each response
    #[arg(long, default_value_t = 10, global = true)]
    timeout_secs: u64,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the raw result as JSON instead of its text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Task operations
    #[command(subcommand)]
    Task(TaskCommands),
    /// Project operations
    #[command(subcommand)]
    Project(ProjectCommands),
    /// Workspace operations
    #[command(subcommand)]
    Workspace(WorkspaceCommands),
    /// Section operations
    #[command(subcommand)]
    Section(SectionCommands),
    /// Task dependency operations (premium workspaces only)
    #[command(subcommand)]
    Dependency(DependencyCommands),
    /// List the tools the gateway registers
    Tools,
    /// Call any tool with raw JSON arguments
    Call {
        /// Tool name, e.g. create-task
        tool: String,
        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum TaskCommands {
    /// Create a task (create-task)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        due_date: Option<String>,
        /// Assignee gid, email or 'me'
        #[arg(long)]
        assignee: Option<String>,
        /// Project id (defaults to the gateway's configured project)
        #[arg(long)]
        project: Option<String>,
    },
    /// List the tasks of a project (list-tasks)
    List {
        #[arg(long)]
        project_id: Option<String>,
    },
    /// Update a task (update-task)
    Update {
        task_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due_date: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark a task completed (complete-task)
    Complete { task_id: String },
    /// Delete a task (delete-task)
    Delete { task_id: String },
}

#[derive(Debug, Subcommand)]
pub(crate) enum ProjectCommands {
    /// Create a project (create-project)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Visible to the whole team (gateway default: true)
        #[arg(long)]
        public: Option<bool>,
        #[arg(long)]
        workspace_id: Option<String>,
    },
    /// Show a project (get-project)
    Get { project_id: String },
    /// Update a project (update-project)
    Update {
        project_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        public: Option<bool>,
    },
    /// Delete a project (delete-project)
    Delete { project_id: String },
    /// List the projects of a workspace (list-projects)
    List {
        #[arg(long)]
        workspace_id: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum WorkspaceCommands {
    /// List workspaces (list-workspaces)
    List,
}

#[derive(Debug, Subcommand)]
pub(crate) enum SectionCommands {
    /// Create a section (create-section)
    Create {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        insert_before: Option<String>,
        #[arg(long)]
        insert_after: Option<String>,
    },
    /// List the sections of a project (list-sections)
    List {
        #[arg(long)]
        project_id: Option<String>,
    },
    /// Move a task into a section (add-task-to-section)
    AddTask {
        #[arg(long)]
        section_id: String,
        #[arg(long)]
        task_id: String,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum DependencyCommands {
    /// Add prerequisites to a task (add-dependencies)
    Add {
        task_id: String,
        /// Comma-separated prerequisite task ids
        #[arg(long, value_delimiter = ',', required = true)]
        dependency_ids: Vec<String>,
    },
    /// Remove prerequisites from a task (remove-dependencies)
    Remove {
        task_id: String,
        /// Comma-separated prerequisite task ids
        #[arg(long, value_delimiter = ',', required = true)]
        dependency_ids: Vec<String>,
    },
    /// Show the prerequisites of a task (get-dependencies)
    List { task_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            e.print().ok();
            std::process::exit(1);
        }
    };

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("asana_ctl={default_level}").parse()?)
                .add_directive(format!("asana_mcp={default_level}").parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let action = match Action::from_command(cli.command) {
        Ok(action) => action,
        Err(e) => {
            output::error(format!("{e:#}"));
            std::process::exit(1);
        }
    };

    let timeout = Duration::from_secs(cli.timeout_secs);
    let succeeded =
        match commands::run(&cli.server, &cli.server_args, timeout, action, cli.json).await {
            Ok(succeeded) => succeeded,
            Err(e) => {
                output::error(format!("{e:#}"));
                false
            }
        };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
