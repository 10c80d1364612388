use crate::mcp::protocol::{ErrorCode, McpError};
use crate::utils::suggest::suggest;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_MAP: Lazy<HashMap<String, ToolDef>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .cloned()
        .map(|tool| (tool.name.clone(), tool))
        .collect()
});

static TOOL_VALIDATORS: Lazy<HashMap<String, JSONSchema>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for tool in TOOL_CATALOG.iter() {
        if let Ok(schema) = JSONSchema::compile(&tool.input_schema) {
            map.insert(tool.name.clone(), schema);
        }
    }
    map
});

pub fn tool_catalog() -> &'static Vec<ToolDef> {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_MAP.get(name)
}

pub fn tool_names() -> Vec<String> {
    TOOL_CATALOG.iter().map(|tool| tool.name.clone()).collect()
}

/// Checks `args` against the tool's input schema. Unknown tools pass; the
/// executor reports them.
pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), McpError> {
    let (Some(tool), Some(schema)) = (tool_by_name(tool_name), TOOL_VALIDATORS.get(tool_name))
    else {
        return Ok(());
    };
    if let Err(errors) = schema.validate(args) {
        let message = format_schema_errors(tool_name, args, errors, &tool.input_schema);
        return Err(McpError::new(ErrorCode::InvalidParams, message));
    }
    Ok(())
}

fn format_schema_errors(
    tool_name: &str,
    args: &Value,
    errors: jsonschema::ErrorIterator,
    schema: &Value,
) -> String {
    let header = match args.get("action").and_then(|v| v.as_str()) {
        Some(action) => format!("Invalid arguments for {}:{}", tool_name, action),
        None => format!("Invalid arguments for {}", tool_name),
    };
    let properties: Vec<String> = schema
        .get("properties")
        .and_then(|v| v.as_object())
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();

    let mut rendered = Vec::new();
    let mut did_you_means = Vec::new();
    for err in errors.take(10) {
        let pointer = err.instance_path.to_string();
        let location = if pointer.is_empty() {
            "(root)".to_string()
        } else {
            pointer.clone()
        };
        match &err.kind {
            jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
                for unknown in unexpected {
                    rendered.push(format!("{}: unknown field '{}'", location, unknown));
                    let suggestions = suggest(unknown, &properties, 3);
                    if !suggestions.is_empty() {
                        did_you_means.push(format!(
                            "field '{}': {}",
                            unknown,
                            suggestions.join(", ")
                        ));
                    }
                }
            }
            jsonschema::error::ValidationErrorKind::Enum { options } => {
                let allowed: Vec<String> = options
                    .as_array()
                    .map(|arr| {
                        arr.iter()
                            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                            .collect()
                    })
                    .unwrap_or_default();
                rendered.push(format!("{}: expected one of {}", location, allowed.join(", ")));
                let received = args
                    .pointer(&pointer)
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                let suggestions = suggest(received, &allowed, 3);
                if !suggestions.is_empty() {
                    did_you_means.push(format!("{}: {}", location, suggestions.join(", ")));
                }
            }
            jsonschema::error::ValidationErrorKind::Required { property } => {
                let prop = property
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| property.to_string());
                rendered.push(format!("{}: missing required field '{}'", location, prop));
            }
            jsonschema::error::ValidationErrorKind::Type { kind } => {
                rendered.push(format!("{}: expected {}", location, format_type_kind(kind)));
            }
            _ => rendered.push(format!("{}: {}", location, err)),
        }
    }

    let mut lines = vec![header];
    lines.extend(rendered.iter().map(|line| format!("- {}", line)));
    if !did_you_means.is_empty() {
        lines.push(format!("Did you mean: {}", did_you_means.join(" | ")));
    }
    lines.join("\n")
}

fn format_type_kind(kind: &jsonschema::error::TypeKind) -> String {
    match kind {
        jsonschema::error::TypeKind::Single(primitive) => primitive.to_string(),
        jsonschema::error::TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "unknown".to_string()
            } else {
                list.join(" | ")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_exposes_the_openapi_tool() {
        assert_eq!(tool_names(), vec!["openapi"]);
        let tool = tool_by_name("openapi").unwrap();
        assert_eq!(tool.input_schema["required"], json!(["action"]));
    }

    #[test]
    fn accepts_well_formed_arguments() {
        let args = json!({
            "action": "invoke",
            "url": "http://localhost",
            "openapi": {"paths": {}},
            "name": "getPet",
            "params": {"id": 1},
            "token": null
        });
        assert!(validate_tool_args("openapi", &args).is_ok());
    }

    #[test]
    fn explains_unknown_fields_and_actions() {
        let err = validate_tool_args("openapi", &json!({"action": "invok", "nmae": "x"}))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParams);
        assert!(err.message.starts_with("Invalid arguments for openapi:invok"));
        assert!(err.message.contains("unknown field 'nmae'"));
        assert!(err.message.contains("field 'nmae': name"));
        assert!(err.message.contains("/action: invoke"));
    }

    #[test]
    fn missing_action_is_reported() {
        let err = validate_tool_args("openapi", &json!({})).unwrap_err();
        assert!(err.message.contains("missing required field 'action'"));
    }
}
