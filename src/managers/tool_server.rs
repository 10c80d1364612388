use crate::constants::limits::MAX_SUGGESTIONS;
use crate::errors::{into_payload, InvocationError, ToolError};
use crate::openapi::{
    build, operation_ids, resolve, tool_specs, ArgumentMap, Executor, OpenApiDocument,
};
use crate::services::connections::{ConnectionService, ToolServerConnection};
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::suggest::suggest;
use crate::utils::tool_errors::{unknown_action_error, unknown_value_error};
use serde_json::Value;
use std::sync::Arc;

pub const OPENAPI_TOOL: &str = "openapi";

const OPENAPI_ACTIONS: &[&str] = &["servers", "list_tools", "resolve", "build", "invoke"];

/// The `openapi` tool: lists, resolves, dry-runs and invokes operations of
/// tool servers described by OpenAPI documents.
#[derive(Clone)]
pub struct ToolServerManager {
    logger: Logger,
    validation: Validation,
    connections: Arc<ConnectionService>,
    executor: Executor,
}

/// Where one call is aimed: the document, the server base URL and the token.
struct Target {
    document: Result<OpenApiDocument, InvocationError>,
    base_url: Option<String>,
    token: Option<String>,
}

impl ToolServerManager {
    pub fn new(
        logger: Logger,
        validation: Validation,
        connections: Arc<ConnectionService>,
        executor: Executor,
    ) -> Self {
        Self {
            logger: logger.child("openapi"),
            validation,
            connections,
            executor,
        }
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action").and_then(|v| v.as_str()).unwrap_or("");
        match action {
            "servers" => Ok(self.servers()),
            "list_tools" => self.list_tools(&args),
            "resolve" => self.resolve_route(&args),
            "build" => self.build_request(&args),
            "invoke" => self.invoke(&args).await,
            _ => Err(unknown_action_error(OPENAPI_TOOL, action, OPENAPI_ACTIONS)),
        }
    }

    fn servers(&self) -> Value {
        serde_json::json!({
            "servers": self.connections.list(),
            "connections_path": self.connections.file_path(),
        })
    }

    fn list_tools(&self, args: &Value) -> Result<Value, ToolError> {
        let target = self.resolve_target(args)?;
        let document = match target.document {
            Ok(document) => document,
            Err(err) => return Ok(err.to_payload()),
        };
        Ok(serde_json::json!({
            "info": document.info,
            "tools": tool_specs(&document),
        }))
    }

    fn resolve_route(&self, args: &Value) -> Result<Value, ToolError> {
        let name = self.operation_name(args)?;
        let target = self.resolve_target(args)?;
        let document = match target.document {
            Ok(document) => document,
            Err(err) => return Ok(err.to_payload()),
        };
        let payload = match resolve(&document, &name) {
            Ok(route) => serde_json::json!({
                "operation_id": route.operation_id(),
                "path": route.path_template,
                "method": route.method.wire_name(),
            }),
            Err(err) => failure_payload(&err, &document),
        };
        Ok(payload)
    }

    fn build_request(&self, args: &Value) -> Result<Value, ToolError> {
        let name = self.operation_name(args)?;
        let arguments = self.validation.ensure_arguments(args.get("params"))?;
        let target = self.resolve_target(args)?;
        let base_url = require_base_url(&target)?;
        let document = match target.document {
            Ok(document) => document,
            Err(err) => return Ok(err.to_payload()),
        };
        let payload = match resolve(&document, &name)
            .and_then(|route| build(&route, arguments.as_ref(), &base_url))
        {
            Ok(request) => request.to_value(),
            Err(err) => failure_payload(&err, &document),
        };
        Ok(payload)
    }

    async fn invoke(&self, args: &Value) -> Result<Value, ToolError> {
        let name = self.operation_name(args)?;
        let arguments: Option<ArgumentMap> =
            self.validation.ensure_arguments(args.get("params"))?;
        let target = self.resolve_target(args)?;
        let base_url = require_base_url(&target)?;
        let document = match target.document {
            Ok(document) => document,
            Err(err) => return Ok(err.to_payload()),
        };

        let result = self
            .executor
            .invoke(
                &document,
                &name,
                arguments.as_ref(),
                &base_url,
                target.token.as_deref(),
            )
            .await;
        Ok(match result {
            Err(err @ InvocationError::NoMatchingRoute { .. }) => failure_payload(&err, &document),
            other => into_payload(other),
        })
    }

    fn operation_name(&self, args: &Value) -> Result<String, ToolError> {
        self.validation
            .ensure_string(args.get("name").unwrap_or(&Value::Null), "name", true)
    }

    fn connection(&self, args: &Value) -> Result<Option<&ToolServerConnection>, ToolError> {
        let Some(name) = self
            .validation
            .ensure_optional_string(args.get("server"), "server", true)?
        else {
            return Ok(None);
        };
        self.connections
            .get(&name)
            .map(Some)
            .ok_or_else(|| unknown_value_error("server", &name, &self.connections.names()))
    }

    fn resolve_target(&self, args: &Value) -> Result<Target, ToolError> {
        let connection = self.connection(args)?;

        let inline = args.get("openapi").filter(|v| !v.is_null());
        let document = match (inline, connection) {
            (Some(raw), _) => OpenApiDocument::from_value(raw.clone()),
            (None, Some(conn)) => conn.read_document()?.ok_or_else(|| {
                ToolError::invalid_params(format!(
                    "Server '{}' has no openapi_path; pass the document as openapi",
                    conn.name
                ))
            })?,
            (None, None) => {
                return Err(ToolError::invalid_params("openapi document is required")
                    .with_hint("Pass openapi (the parsed document) or server (a configured connection)."))
            }
        };

        let base_url = self
            .validation
            .ensure_optional_string(args.get("url"), "url", true)?
            .or_else(|| connection.map(|conn| conn.url.clone()));
        let token = match self.validation.ensure_token(args.get("token"))? {
            Some(token) => Some(token),
            None => connection.and_then(|conn| conn.token().map(str::to_string)),
        };

        if let Err(err) = document.as_ref() {
            self.logger.warn(
                "rejected OpenAPI document",
                Some(&serde_json::json!({ "error": err.to_string() })),
            );
        }

        Ok(Target {
            document,
            base_url,
            token,
        })
    }
}

fn require_base_url(target: &Target) -> Result<String, ToolError> {
    target.base_url.clone().ok_or_else(|| {
        ToolError::invalid_params("url is required")
            .with_hint("Pass url (the tool server base URL) or server (a configured connection).")
    })
}

fn failure_payload(err: &InvocationError, document: &OpenApiDocument) -> Value {
    let mut payload = err.to_payload();
    if let (InvocationError::NoMatchingRoute { operation_id }, Value::Object(map)) =
        (err, &mut payload)
    {
        let candidates = suggest(operation_id, &operation_ids(document), MAX_SUGGESTIONS);
        map.insert("did_you_mean".to_string(), serde_json::json!(candidates));
    }
    payload
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for ToolServerManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.handle_action(args).await
    }
}
