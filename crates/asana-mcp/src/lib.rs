//! Asana MCP gateway library.
//!
//! Provides the [`AsanaMcpServer`] tool table, the serial stdio dispatch loop
//! ([`gateway::serve`]) and the [`GatewayClient`] used by `asana-ctl`. Used by
//! the `asana-mcp` binary and available for integration testing.

pub mod client;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod tools;

pub use client::{GatewayClient, InvocationResult};
pub use error::{GatewayError, InvokeError, RegistryError};
pub use server::AsanaMcpServer;
pub use tools::ToolContext;
