//! Invocation client: talks to a gateway over any line-oriented byte stream.
//!
//! Attach to an existing `AsyncRead`/`AsyncWrite` pair with
//! [`GatewayClient::new`], or start the gateway binary as a child process with
//! [`GatewayClient::spawn`]. Every request gets the next id from a per-client
//! counter. Lines that are not JSON, or answer a different id, are skipped
//! while waiting. A timeout is a local failure: the gateway is not told.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

use crate::error::InvokeError;
use crate::protocol::{
    encode_line, negotiate_protocol_version, result_text, CallToolRequestParams, CallToolResult,
    ClientInfo, ErrorData, Implementation, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, RequestId, Tool, METHOD_INITIALIZE, METHOD_INITIALIZED, METHOD_PING,
    METHOD_TOOLS_CALL, METHOD_TOOLS_LIST,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const CLIENT_NAME: &str = "asana-ctl";

/// Outcome of one `tools/call`, tagged with the id it answered.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    pub id: RequestId,
    pub outcome: Result<CallToolResult, ErrorData>,
}

impl InvocationResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Rendered tool text, or `None` for a protocol error.
    pub fn text(&self) -> Option<String> {
        self.outcome.as_ref().ok().map(result_text)
    }
}

pub struct GatewayClient<R, W> {
    lines: Lines<BufReader<R>>,
    writer: W,
    next_id: i64,
    timeout: Duration,
    child: Option<Child>,
}

impl<R, W> fmt::Debug for GatewayClient<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("next_id", &self.next_id)
            .field("timeout", &self.timeout)
            .field("child", &self.child)
            .finish_non_exhaustive()
    }
}

impl GatewayClient<ChildStdout, ChildStdin> {
    /// Start `program` with piped stdin/stdout. Its stderr (the gateway's log)
    /// is inherited. The child is killed if the client is dropped.
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, InvokeError> {
        let spawn_error = |source: std::io::Error| InvokeError::Spawn {
            program: program.to_string(),
            source,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_error(std::io::Error::other("stdin was not captured")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_error(std::io::Error::other("stdout was not captured")))?;

        debug!(program, pid = ?child.id(), "Spawned gateway");
        let mut client = Self::new(stdout, stdin);
        client.child = Some(child);
        Ok(client)
    }
}

impl<R, W> GatewayClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
            next_id: 1,
            timeout: DEFAULT_TIMEOUT,
            child: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn next_request_id(&mut self) -> RequestId {
        let id = RequestId::from(self.next_id);
        self.next_id += 1;
        id
    }

    /// MCP handshake: `initialize`, then `notifications/initialized`.
    pub async fn initialize(&mut self) -> Result<InitializeResult, InvokeError> {
        let hello = ClientInfo {
            protocol_version: negotiate_protocol_version(None),
            client_info: Implementation {
                name: CLIENT_NAME.to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            ..ClientInfo::default()
        };
        let params = serde_json::to_value(&hello)?;
        let result = self
            .request(METHOD_INITIALIZE, Some(params))
            .await?
            .into_outcome()
            .map_err(InvokeError::Rpc)?;
        let info: InitializeResult = decode(METHOD_INITIALIZE, result)?;
        self.notify(METHOD_INITIALIZED).await?;
        debug!(server = %info.server_info.name, protocol_version = ?info.protocol_version, "Handshake complete");
        Ok(info)
    }

    pub async fn ping(&mut self) -> Result<(), InvokeError> {
        self.request(METHOD_PING, None)
            .await?
            .into_outcome()
            .map(|_| ())
            .map_err(InvokeError::Rpc)
    }

    pub async fn list_tools(&mut self) -> Result<Vec<Tool>, InvokeError> {
        let result = self
            .request(METHOD_TOOLS_LIST, None)
            .await?
            .into_outcome()
            .map_err(InvokeError::Rpc)?;
        let list: ListToolsResult = decode(METHOD_TOOLS_LIST, result)?;
        Ok(list.tools)
    }

    /// Call one tool and wait for its response.
    ///
    /// Protocol errors (unknown tool, invalid arguments) come back inside
    /// [`InvocationResult::outcome`]; only local failures are `Err`.
    pub async fn invoke(
        &mut self,
        tool: &str,
        arguments: Value,
    ) -> Result<InvocationResult, InvokeError> {
        let mut params = serde_json::to_value(CallToolRequestParams {
            meta: None,
            name: tool.to_string().into(),
            arguments: None,
            task: None,
        })?;
        // Arguments go out as given, objects or not; the gateway validates them.
        if let Some(obj) = params.as_object_mut() {
            obj.insert("arguments".to_string(), arguments);
        }
        let response = self.request(METHOD_TOOLS_CALL, Some(params)).await?;
        let id = response.id.clone();
        let outcome = match response.into_outcome() {
            Ok(result) => Ok(decode(METHOD_TOOLS_CALL, result)?),
            Err(error) => Err(error),
        };
        Ok(InvocationResult { id, outcome })
    }

    /// Send a request and wait for the response carrying its id.
    pub async fn request(
        &mut self,
        method: &str,
        params: Option<Value>,
    ) -> Result<JsonRpcResponse, InvokeError> {
        let id = self.next_request_id();
        self.send(&JsonRpcRequest::new(id.clone(), method, params))
            .await?;
        self.wait_for(&id, method).await
    }

    pub async fn notify(&mut self, method: &str) -> Result<(), InvokeError> {
        self.send(&JsonRpcRequest::notification(method)).await
    }

    async fn send(&mut self, request: &JsonRpcRequest) -> Result<(), InvokeError> {
        let line = encode_line(request)?;
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn wait_for(&mut self, id: &RequestId, method: &str) -> Result<JsonRpcResponse, InvokeError> {
        let deadline = tokio::time::Instant::now() + self.timeout;
        loop {
            let line = match tokio::time::timeout_at(deadline, self.lines.next_line()).await {
                Err(_) => {
                    warn!(id = %id, method, "Timed out waiting for gateway response");
                    return Err(InvokeError::Timeout {
                        method: method.to_string(),
                        after: self.timeout,
                    });
                }
                Ok(Err(e)) => return Err(InvokeError::Io(e)),
                Ok(Ok(None)) => {
                    return Err(InvokeError::Closed {
                        method: method.to_string(),
                    })
                }
                Ok(Ok(Some(line))) => line,
            };

            match serde_json::from_str::<JsonRpcResponse>(&line) {
                Ok(response) if &response.id == id => return Ok(response),
                Ok(response) => debug!(expected = %id, got = %response.id, "Skipping response for another id"),
                Err(_) => debug!(line = %line, "Skipping non-response line"),
            }
        }
    }

    /// Close the gateway's input and wait for a spawned child to exit.
    pub async fn shutdown(self) -> Result<(), InvokeError> {
        let Self {
            writer,
            child,
            timeout,
            ..
        } = self;
        drop(writer);

        if let Some(mut child) = child {
            match tokio::time::timeout(timeout, child.wait()).await {
                Ok(status) => {
                    let status = status?;
                    debug!(?status, "Gateway exited");
                }
                Err(_) => {
                    warn!("Gateway did not exit after its input closed, killing it");
                    child.kill().await?;
                }
            }
        }
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(method: &str, value: Value) -> Result<T, InvokeError> {
    serde_json::from_value(value).map_err(|e| InvokeError::UnexpectedResponse {
        method: method.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    use super::*;

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let (client_end, _server_end) = tokio::io::duplex(1024);
        let (reader, writer) = tokio::io::split(client_end);
        let mut client = GatewayClient::new(reader, writer);
        assert_eq!(client.next_request_id(), RequestId::from(1));
        assert_eq!(client.next_request_id(), RequestId::from(2));
    }

    #[tokio::test]
    async fn test_skips_noise_and_other_ids() {
        let (client_end, server_end) = tokio::io::duplex(4096);
        let (reader, writer) = tokio::io::split(client_end);
        let mut client = GatewayClient::new(reader, writer);

        let fake = tokio::spawn(async move {
            let (read_half, mut write_half) = tokio::io::split(server_end);
            let mut lines = BufReader::new(read_half).lines();
            let request = lines.next_line().await.unwrap().unwrap();
            assert!(request.contains(r#""method":"ping""#));
            write_half
                .write_all(b"starting up...\n{\"jsonrpc\":\"2.0\",\"id\":99,\"result\":{}}\n{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n")
                .await
                .unwrap();
            // keep the stream open until the client is done
            let _ = lines.next_line().await;
        });

        client.ping().await.unwrap();
        drop(client);
        fake.await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_is_local_failure() {
        let (client_end, _server_end) = tokio::io::duplex(1024);
        let (reader, writer) = tokio::io::split(client_end);
        let mut client =
            GatewayClient::new(reader, writer).with_timeout(Duration::from_millis(50));
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, InvokeError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_closed_stream() {
        let (client_end, server_end) = tokio::io::duplex(1024);
        drop(server_end);
        let (reader, writer) = tokio::io::split(client_end);
        let mut client = GatewayClient::new(reader, writer);
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, InvokeError::Closed { .. } | InvokeError::Io(_)));
    }

    #[tokio::test]
    async fn test_spawn_missing_program() {
        let err = GatewayClient::spawn("/nonexistent/asana-mcp", &[]).unwrap_err();
        assert!(matches!(err, InvokeError::Spawn { .. }));
    }
}
