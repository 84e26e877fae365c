//! Serial dispatch loop over newline-delimited JSON-RPC.
//!
//! One line is read, dispatched and answered before the next is read, so
//! responses leave in arrival order. Logging goes through `tracing` (stderr in
//! the binary). The writer only ever receives protocol lines.

use std::time::Instant;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::error::GatewayError;
use crate::protocol::{
    encode_line, CallToolRequestParams, JsonRpcRequest, JsonRpcResponse, ListToolsResult,
    RequestId, JSONRPC_VERSION, METHOD_INITIALIZE, METHOD_INITIALIZED, METHOD_PING,
    METHOD_TOOLS_CALL, METHOD_TOOLS_LIST,
};
use crate::server::AsanaMcpServer;

/// Serve until the reader reaches end of input.
///
/// Lines are split on raw bytes. A line that is not UTF-8 is logged and
/// skipped like any other malformed input. Only I/O failures end the loop.
pub async fn serve<R, W>(server: &AsanaMcpServer, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).split(b'\n');
    info!(tools = server.registry().len(), stub = server.is_stub(), "Gateway ready");

    while let Some(bytes) = lines.next_segment().await? {
        let line = match std::str::from_utf8(&bytes) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, len = bytes.len(), "Dropping line that is not valid UTF-8");
                continue;
            }
        };
        let Some(response) = handle_line(server, line).await else {
            continue;
        };
        let bytes = encode_line(&response)?;
        writer.write_all(&bytes).await?;
        writer.flush().await?;
    }

    info!("Input closed, gateway stopping");
    Ok(())
}

/// Handle one input line. `None` means nothing is written back: blank
/// lines, notifications, and malformed input that carries no usable id.
/// Malformed input with an id is answered with `-32600`.
pub async fn handle_line(server: &AsanaMcpServer, line: &str) -> Option<JsonRpcResponse> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Dropping line that is not valid JSON");
            return None;
        }
    };
    let Value::Object(message) = value else {
        warn!("Dropping JSON that is not an object");
        return None;
    };
    let usable_id = RequestId::from_message(&message);

    let request: JsonRpcRequest = match serde_json::from_value(Value::Object(message)) {
        Ok(request) => request,
        Err(e) => {
            let Some(id) = usable_id else {
                warn!(error = %e, "Dropping JSON-RPC message without a usable id");
                return None;
            };
            let error = GatewayError::invalid_request(e.to_string());
            warn!(id = %id, error = %error, "Malformed request");
            return Some(JsonRpcResponse::failure(id, error.to_error_data()));
        }
    };

    let Some(id) = request.id.clone() else {
        handle_notification(&request);
        return None;
    };

    let response = match dispatch(server, &request).await {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(e) => {
            warn!(id = %id, method = %request.method, code = e.code().0, error = %e, "Request failed");
            JsonRpcResponse::failure(id, e.to_error_data())
        }
    };
    Some(response)
}

fn handle_notification(request: &JsonRpcRequest) {
    match request.method.as_str() {
        METHOD_INITIALIZED => info!("Client initialized"),
        other => debug!(method = %other, "Ignoring notification"),
    }
}

async fn dispatch(server: &AsanaMcpServer, request: &JsonRpcRequest) -> Result<Value, GatewayError> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(GatewayError::invalid_request(format!(
            "unsupported jsonrpc version '{}'",
            request.jsonrpc
        )));
    }

    match request.method.as_str() {
        METHOD_INITIALIZE => {
            let requested = request
                .params
                .as_ref()
                .and_then(|p| p.get("protocolVersion"))
                .and_then(Value::as_str);
            let info = server.get_info(requested);
            info!(protocol_version = ?info.protocol_version, "Initialize");
            to_result(&info)
        }
        METHOD_PING => Ok(json!({})),
        METHOD_TOOLS_LIST => to_result(&ListToolsResult::with_all_items(
            server.registry().descriptors(),
        )),
        METHOD_TOOLS_CALL => call_tool(server, request.id.as_ref(), request.params.clone()).await,
        other => Err(GatewayError::MethodNotFound {
            method: other.to_string(),
        }),
    }
}

async fn call_tool(
    server: &AsanaMcpServer,
    id: Option<&RequestId>,
    params: Option<Value>,
) -> Result<Value, GatewayError> {
    let mut params =
        params.ok_or_else(|| GatewayError::invalid_request("tools/call requires params"))?;
    // Arguments stay raw so that non-object arguments are reported against
    // the named tool by the registry.
    let arguments = params
        .as_object_mut()
        .and_then(|p| p.remove("arguments"))
        .filter(|a| !a.is_null());
    let params: CallToolRequestParams = serde_json::from_value(params).map_err(|e| {
        GatewayError::invalid_request(format!("tools/call params must name a tool: {e}"))
    })?;

    let started = Instant::now();
    info!(id = ?id, tool = %params.name, "Tool call");
    let result = server.call_tool(&params.name, arguments).await?;
    debug!(
        tool = %params.name,
        elapsed = ?started.elapsed(),
        blocks = result.content.len(),
        "Tool call finished"
    );
    to_result(&result)
}

fn to_result<T: Serialize>(value: &T) -> Result<Value, GatewayError> {
    serde_json::to_value(value).map_err(|e| GatewayError::Internal(e.to_string()))
}
