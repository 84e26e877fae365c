//! JSON-RPC 2.0 framing for the MCP stdio transport.
//!
//! One JSON object per line in each direction. MCP payloads (tool results,
//! tool descriptors, the `initialize` handshake, error objects) are the
//! `rmcp::model` types. Only the envelope is declared here, because the
//! gateway has to answer requests whose envelope is broken.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

pub use rmcp::model::{
    CallToolRequestParams, CallToolResult, ClientInfo, Content, ErrorCode, ErrorData,
    Implementation, InitializeResult, ListToolsResult, ProtocolVersion, ServerCapabilities, Tool,
};

pub const JSONRPC_VERSION: &str = "2.0";

// ── method names ──

pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_INITIALIZED: &str = "notifications/initialized";
pub const METHOD_PING: &str = "ping";
pub const METHOD_TOOLS_LIST: &str = "tools/list";
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// Correlation id. Echoed back verbatim, never interpreted.
///
/// Any JSON number is accepted, fractional and out-of-range ones included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl RequestId {
    /// The `id` member of a message, if it is one we can answer to.
    /// `null`, booleans, arrays and objects are not.
    pub fn from_message(message: &Map<String, Value>) -> Option<Self> {
        match message.get("id")? {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::String(s.clone())),
            _ => None,
        }
    }
}

/// A request, or a notification when `id` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            method: method.into(),
            params: None,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// A response: exactly one of `result` or `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorData>,
}

impl JsonRpcResponse {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: RequestId, error: ErrorData) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn into_outcome(self) -> Result<Value, ErrorData> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// `error.data.kind`, when the gateway classified the error.
pub fn error_kind(error: &ErrorData) -> Option<&str> {
    error.data.as_ref()?.get("kind")?.as_str()
}

/// All text blocks of a tool result, joined by newlines.
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.raw.as_text())
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pick the protocol revision to answer an `initialize` with. Unknown or
/// missing revisions get 2025-03-26.
pub fn negotiate_protocol_version(requested: Option<&str>) -> ProtocolVersion {
    match requested {
        Some("2024-11-05") => ProtocolVersion::V_2024_11_05,
        Some("2025-06-18") => ProtocolVersion::V_2025_06_18,
        _ => ProtocolVersion::V_2025_03_26,
    }
}

/// Serialize a message as one protocol line, newline included.
pub fn encode_line<T: Serialize>(message: &T) -> serde_json::Result<Vec<u8>> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    Ok(line)
}
