use crate::app::{App, AppConfig};
use crate::constants::server as server_constants;
use crate::errors::{ToolError, ToolErrorKind};
use crate::mcp::catalog::{tool_catalog, validate_tool_args};
use crate::mcp::protocol::{ErrorCode, JsonRpcRequest, JsonRpcResponse, McpError};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

fn map_tool_error(tool: &str, error: &ToolError) -> McpError {
    let mut lines = vec![
        "ToolError".to_string(),
        format!("tool: {}", tool),
        format!("kind: {:?}", error.kind).to_lowercase(),
        format!("code: {}", error.code),
        format!("message: {}", error.message),
    ];
    if let Some(hint) = &error.hint {
        lines.push(format!("hint: {}", hint));
    }
    let message = lines.join("\n");

    let code = match error.kind {
        ToolErrorKind::InvalidParams => ErrorCode::InvalidParams,
        ToolErrorKind::NotFound => ErrorCode::InvalidRequest,
        ToolErrorKind::Internal => ErrorCode::InternalError,
    };
    McpError::new(code, message)
}

pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new(config: AppConfig) -> Result<Self, ToolError> {
        let app = App::initialize(config)?;
        Ok(Self::with_app(Arc::new(app)))
    }

    pub fn with_app(app: Arc<App>) -> Self {
        Self { app }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": server_constants::PROTOCOL_VERSION,
            "capabilities": {"tools": {"list": true, "call": true}},
            "serverInfo": {"name": server_constants::NAME, "version": server_constants::VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": tool_catalog() })
    }

    pub async fn handle_tools_call(&self, name: &str, args: Value) -> Result<Value, McpError> {
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };
        validate_tool_args(name, &args)?;

        let payload = self
            .app
            .tool_executor
            .execute(name, args)
            .await
            .map_err(|err| map_tool_error(name, &err))?;

        let text = serde_json::to_string(&payload)
            .map_err(|err| McpError::new(ErrorCode::InternalError, err.to_string()))?;
        Ok(serde_json::json!({
            "content": [ { "type": "text", "text": text } ]
        }))
    }

    /// Answers one JSON-RPC line; `None` for notifications and blank lines.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let parsed: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(_) => return Some(JsonRpcResponse::failure(Value::Null, ErrorCode::ParseError)),
        };
        let request: JsonRpcRequest = match serde_json::from_value(parsed) {
            Ok(req) => req,
            Err(_) => return Some(JsonRpcResponse::failure(Value::Null, ErrorCode::InvalidRequest)),
        };

        // Requests without an id are notifications.
        let id = request.id.clone()?;
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.handle_initialize()),
            "tools/list" => JsonRpcResponse::success(id, self.handle_tools_list()),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/call" => {
                let params = request.params.as_object().cloned().unwrap_or_default();
                let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
                if name.is_empty() {
                    JsonRpcResponse::failure(
                        id,
                        McpError::new(ErrorCode::InvalidParams, "Missing tool name"),
                    )
                } else {
                    let args = params.get("arguments").cloned().unwrap_or(Value::Null);
                    match self.handle_tools_call(name, args).await {
                        Ok(result) => JsonRpcResponse::success(id, result),
                        Err(err) => JsonRpcResponse::failure(id, err),
                    }
                }
            }
            _ if request.method.starts_with("notifications/") => {
                JsonRpcResponse::success(id, serde_json::json!({}))
            }
            _ => JsonRpcResponse::failure(id, ErrorCode::MethodNotFound),
        };
        Some(response)
    }

    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ToolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut writer = BufWriter::new(writer);
        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.handle_line(&line).await {
                let payload = serde_json::to_string(&response)
                    .map_err(|err| ToolError::internal(err.to_string()))?;
                writer.write_all(payload.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<(), ToolError> {
        self.app.logger.info(
            "serving on stdio",
            Some(&serde_json::json!({ "version": server_constants::VERSION })),
        );
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }
}

pub async fn run_stdio(config: AppConfig) -> Result<(), ToolError> {
    let server = McpServer::new(config)?;
    server.run_stdio().await
}
