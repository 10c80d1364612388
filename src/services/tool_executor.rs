use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::utils::tool_errors::unknown_value_error;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, args: Value) -> Result<Value, ToolError>;
}

#[derive(Clone)]
pub(crate) struct ToolCallMeta {
    pub started_at: i64,
    pub trace_id: String,
}

/// Routes tool calls to their handlers and wraps results with call metadata.
#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub(crate) fn wrap_result(&self, tool: &str, args: &Value, result: Value, meta: ToolCallMeta) -> Value {
        serde_json::json!({
            "ok": true,
            "result": result,
            "meta": {
                "tool": tool,
                "action": args.get("action").cloned().unwrap_or(Value::Null),
                "trace_id": meta.trace_id,
                "duration_ms": chrono::Utc::now().timestamp_millis() - meta.started_at,
            },
        })
    }

    pub async fn execute(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        let started_at = chrono::Utc::now().timestamp_millis();
        let Some(handler) = self.handlers.get(tool) else {
            let mut known: Vec<String> = self.handlers.keys().cloned().collect();
            known.sort();
            let err = unknown_value_error("tool", tool, &known);
            return Err(ToolError {
                hint: err.hint,
                details: err.details,
                ..ToolError::not_found(err.message)
            });
        };

        let trace_id = args
            .get("trace_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let handler_args = strip_meta_args(&args);

        self.logger.debug(
            "tool call",
            Some(&serde_json::json!({
                "tool": tool,
                "action": args.get("action"),
                "trace_id": trace_id,
            })),
        );

        match handler.handle(handler_args).await {
            Ok(result) => Ok(self.wrap_result(
                tool,
                &args,
                result,
                ToolCallMeta {
                    started_at,
                    trace_id,
                },
            )),
            Err(err) => {
                self.logger.warn(
                    "tool call failed",
                    Some(&serde_json::json!({
                        "tool": tool,
                        "code": err.code,
                        "message": err.message,
                        "trace_id": trace_id,
                    })),
                );
                Err(err)
            }
        }
    }
}

fn strip_meta_args(args: &Value) -> Value {
    let mut cleaned = args.clone();
    if let Value::Object(map) = &mut cleaned {
        map.remove("trace_id");
    }
    cleaned
}
