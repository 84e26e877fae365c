//! Workspace command handlers for the Asana CLI

use super::{Arguments, ToolInvocation};
use crate::WorkspaceCommands;

pub(crate) fn invocation(cmd: WorkspaceCommands) -> ToolInvocation {
    match cmd {
        WorkspaceCommands::List => ToolInvocation::new("list-workspaces", Arguments::new()),
    }
}
