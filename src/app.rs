use crate::constants::env as env_keys;
use crate::errors::ToolError;
use crate::managers::tool_server::{ToolServerManager, OPENAPI_TOOL};
use crate::mcp::catalog::tool_catalog;
use crate::openapi::Executor;
use crate::services::connections::ConnectionService;
use crate::services::logger::{LogLevel, Logger};
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::validation::Validation;
use crate::utils::paths::resolve_connections_path;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Startup settings. Environment first, CLI flags override.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub connections_path: PathBuf,
    pub log_level: LogLevel,
    pub timeout_ms: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ToolError> {
        let timeout_ms = match std::env::var(env_keys::TIMEOUT_MS) {
            Ok(raw) => parse_timeout_ms(&raw)?,
            Err(_) => None,
        };
        Ok(Self {
            connections_path: resolve_connections_path(),
            log_level: LogLevel::from_env(),
            timeout_ms,
        })
    }
}

/// Blank means no timeout; anything else must be at least one millisecond.
fn parse_timeout_ms(raw: &str) -> Result<Option<u64>, ToolError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u64>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(ToolError::invalid_params(format!(
            "{} must be a positive integer (milliseconds)",
            env_keys::TIMEOUT_MS
        ))),
    }
}

pub struct App {
    pub logger: Logger,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint("Every tool in tool_catalog.json must have a handler.")
            .with_details(serde_json::json!({ "missing_tools": missing })))
    }

    pub fn initialize(config: AppConfig) -> Result<Self, ToolError> {
        let logger = Logger::new("toolserver").with_level(config.log_level);
        let validation = Validation::new();

        let connections = Arc::new(ConnectionService::new(config.connections_path.clone())?);
        logger.info(
            "connections loaded",
            Some(&serde_json::json!({
                "path": config.connections_path,
                "count": connections.len(),
            })),
        );

        let executor = Executor::new(logger.clone(), config.timeout_ms)?;
        let tool_server_manager = Arc::new(ToolServerManager::new(
            logger.clone(),
            validation,
            connections,
            executor,
        ));

        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        handlers.insert(OPENAPI_TOOL.to_string(), tool_server_manager);

        Self::validate_tool_wiring(&handlers)?;

        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));

        Ok(Self {
            logger,
            tool_executor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wiring_reports_catalog_tools_without_handlers() {
        let err = App::validate_tool_wiring(&HashMap::new()).unwrap_err();
        assert_eq!(err.details.unwrap()["missing_tools"], serde_json::json!(["openapi"]));
    }

    #[test]
    fn timeout_must_be_positive_when_set() {
        assert_eq!(parse_timeout_ms("").unwrap(), None);
        assert_eq!(parse_timeout_ms(" 1500 ").unwrap(), Some(1500));
        let err = parse_timeout_ms("0").unwrap_err();
        assert_eq!(err.message, "TOOLSERVER_TIMEOUT_MS must be a positive integer (milliseconds)");
        assert!(parse_timeout_ms("-5").is_err());
        assert!(parse_timeout_ms("soon").is_err());
    }
}
