//! OpenAPI operations as function-calling tool descriptions.

use crate::openapi::document::{HttpMethod, OpenApiDocument, OperationDefinition};
use serde::Serialize;
use serde_json::{Map, Value};

const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub parameters: ToolParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolParameters {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub properties: Map<String, Value>,
    pub required: Vec<String>,
}

impl ToolParameters {
    fn new() -> Self {
        Self {
            kind: "object",
            properties: Map::new(),
            required: Vec::new(),
        }
    }

    fn require(&mut self, name: &str) {
        if !self.required.iter().any(|existing| existing == name) {
            self.required.push(name.to_string());
        }
    }
}

/// One tool per identified operation, in document enumeration order.
pub fn tool_specs(document: &OpenApiDocument) -> Vec<ToolSpec> {
    document
        .operations()
        .filter_map(|(path, method, operation)| tool_spec(path, method, operation))
        .collect()
}

fn tool_spec(path: &str, method: HttpMethod, operation: &OperationDefinition) -> Option<ToolSpec> {
    let name = operation.operation_id.clone()?;
    let description = operation
        .description
        .clone()
        .or_else(|| operation.summary.clone())
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| format!("{} {}", method.wire_name(), path));

    let mut parameters = ToolParameters::new();
    for param in operation.parameter_specs() {
        let mut schema = match param.schema.clone() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        if !schema.contains_key("description") {
            if let Some(text) = param.description.as_ref() {
                schema.insert("description".to_string(), Value::String(text.clone()));
            }
        }
        parameters
            .properties
            .insert(param.name.clone(), Value::Object(schema));
        if param.required {
            parameters.require(&param.name);
        }
    }

    if let Some(schema) = json_body_schema(operation) {
        if let Some(Value::Object(props)) = schema.get("properties") {
            for (key, value) in props {
                parameters.properties.insert(key.clone(), value.clone());
            }
        }
        if let Some(Value::Array(required)) = schema.get("required") {
            for key in required.iter().filter_map(Value::as_str) {
                parameters.require(key);
            }
        }
    }

    Some(ToolSpec {
        kind: "function",
        name,
        description,
        parameters,
    })
}

// `$ref` schemas are left unresolved and contribute nothing.
fn json_body_schema(operation: &OperationDefinition) -> Option<&Map<String, Value>> {
    operation
        .request_body
        .as_ref()?
        .content
        .get(JSON_MEDIA_TYPE)?
        .schema
        .as_ref()?
        .as_object()
        .filter(|schema| !schema.contains_key("$ref"))
}
