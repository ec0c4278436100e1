use crate::{
    config::Config,
    error::Result,
    mcp::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpProtocol, MessageReader, MessageWriter},
    registry::ToolRegistry,
};
use computer_control::{ActionDispatcher, HttpComputerBackend};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Name and version reported in the `initialize` handshake.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// The MCP server.
#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    info: Arc<ServerInfo>,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, info: ServerInfo) -> Self {
        Self {
            registry: Arc::new(registry),
            info: Arc::new(info),
        }
    }

    /// Build a server whose tools drive the HTTP backend named in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = HttpComputerBackend::new(config.backend_config())?;
        let registry = ToolRegistry::new(ActionDispatcher::new(Arc::new(backend)));
        Ok(Self::new(registry, ServerInfo::new(config.server_name.clone())))
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve on stdin/stdout until stdin closes.
    pub async fn run(&self) -> Result<()> {
        self.serve(MessageReader::stdin(), MessageWriter::stdout()).await
    }

    /// Serve until `reader` reaches end of input.
    ///
    /// Each message is handled on its own task, so a slow tool call does not
    /// hold up the ones behind it. Responses may therefore arrive out of
    /// order; clients match them by `id`. Returns once every in-flight
    /// message has been answered.
    pub async fn serve<R, W>(&self, mut reader: MessageReader<R>, writer: MessageWriter<W>) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        info!(name = %self.info.name, tools = self.registry.len(), "MCP server started, listening on stdio");
        let mut tasks = JoinSet::new();

        while let Some(line) = reader.read_line().await? {
            let server = self.clone();
            let writer = writer.clone();
            tasks.spawn(async move {
                if let Some(response) = server.handle_line(&line).await {
                    if let Err(e) = writer.write_message(&response).await {
                        error!(error = %e, "failed to write response");
                    }
                }
            });
        }

        info!("input stream closed, shutting down");
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "message handler task failed");
            }
        }
        Ok(())
    }

    /// Handle one raw line. `None` when nothing should be sent back.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match McpProtocol::deserialize(line) {
            Ok(request) => self.handle_request(request).await,
            Err(response) => {
                warn!(error = ?response.error, "rejected malformed message");
                Some(response)
            }
        }
    }

    /// Handle one parsed request. Notifications never get a response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "received notification");
            return None;
        };

        let span = info_span!("request", id = %id, method = %request.method);
        let outcome = self.route(request).instrument(span).await;

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    async fn route(&self, request: JsonRpcRequest) -> std::result::Result<Value, JsonRpcError> {
        match request.method.as_str() {
            "initialize" => Ok(McpProtocol::initialize_result(&self.info.name, &self.info.version)),
            "ping" => Ok(json!({})),
            "tools/list" => {
                McpProtocol::tools_list_result(&self.registry.descriptors()).map_err(JsonRpcError::internal)
            }
            "tools/call" => self.call_tool(request.params.unwrap_or(Value::Null)).await,
            other => {
                warn!(method = %other, "unknown method");
                Err(JsonRpcError::method_not_found(other))
            }
        }
    }

    async fn call_tool(&self, params: Value) -> std::result::Result<Value, JsonRpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| JsonRpcError::invalid_params("Missing tool name"))?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        info!(tool = %name, "received tool call");
        let result = self
            .registry
            .call(name, &arguments)
            .await
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown tool: {}", name)))?;

        McpProtocol::tool_call_result(&result).map_err(JsonRpcError::internal)
    }
}
