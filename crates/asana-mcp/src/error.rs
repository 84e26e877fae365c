//! # Gateway Error Types
//!
//! - [`GatewayError`]: structural failures answered with a JSON-RPC `error`.
//! - [`RegistryError`]: bad tool table at construction time.
//! - [`InvokeError`]: local failures on the invocation client side.

use std::time::Duration;

use serde_json::json;
use thiserror::Error;

use crate::protocol::{ErrorCode, ErrorData};

/// Failures the gateway reports as protocol errors instead of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments {
        tool: String,
        field: Option<String>,
        reason: String,
    },

    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    pub fn invalid_arguments(
        tool: impl Into<String>,
        field: Option<&str>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            field: field.map(str::to_string),
            reason: reason.into(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// JSON-RPC error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownTool { .. } | Self::InvalidArguments { .. } => ErrorCode::INVALID_PARAMS,
            Self::MethodNotFound { .. } => ErrorCode::METHOD_NOT_FOUND,
            Self::InvalidRequest { .. } => ErrorCode::INVALID_REQUEST,
            Self::Internal(_) => ErrorCode::INTERNAL_ERROR,
        }
    }

    /// Machine-readable classification carried in `error.data.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool { .. } => "unknown_tool",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::MethodNotFound { .. } => "method_not_found",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn to_error_data(&self) -> ErrorData {
        let data = match self {
            Self::UnknownTool { name } => json!({ "kind": self.kind(), "tool": name }),
            Self::InvalidArguments { tool, field, .. } => {
                json!({ "kind": self.kind(), "tool": tool, "field": field })
            }
            Self::MethodNotFound { method } => json!({ "kind": self.kind(), "method": method }),
            Self::InvalidRequest { .. } | Self::Internal(_) => json!({ "kind": self.kind() }),
        };
        ErrorData::new(self.code(), self.to_string(), Some(data))
    }
}

/// Tool table construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("tool '{0}' is registered more than once")]
    DuplicateTool(String),

    #[error("tool '{tool}' has an unusable argument schema: {reason}")]
    InvalidSchema { tool: String, reason: String },
}

/// Invocation client failures. None of these change gateway state.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to start gateway '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error talking to gateway: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("timed out after {}ms waiting for response to '{method}'", .after.as_millis())]
    Timeout { method: String, after: Duration },

    #[error("gateway closed the connection before answering '{method}'")]
    Closed { method: String },

    #[error("gateway returned an error: {} (code {})", .0.message, .0.code.0)]
    Rpc(ErrorData),

    #[error("unexpected response to '{method}': {reason}")]
    UnexpectedResponse { method: String, reason: String },
}
