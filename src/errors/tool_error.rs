use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    NotFound,
    Internal,
}

/// Failure of a tool call itself (bad arguments, unknown tool, broken wiring).
///
/// Upstream failures of an OpenAPI invocation are not `ToolError`s: they travel
/// back to the caller as data, see [`crate::errors::InvocationError`].
#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, "NOT_FOUND", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, "INTERNAL", message)
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind_and_code() {
        let err = ToolError::not_found("Unknown tool: x");
        assert_eq!(err.kind, ToolErrorKind::NotFound);
        assert_eq!(err.code, "NOT_FOUND");
        let err: ToolError = std::io::Error::new(std::io::ErrorKind::Other, "closed").into();
        assert_eq!(err.kind, ToolErrorKind::Internal);
        assert_eq!(err.message, "closed");
    }

    #[test]
    fn serializes_without_empty_hint_and_details() {
        let value = serde_json::to_value(ToolError::invalid_params("name is required")).unwrap();
        assert_eq!(value["kind"], "invalid_params");
        assert_eq!(value["code"], "INVALID_PARAMS");
        assert!(value.get("hint").is_none());
        assert!(value.get("details").is_none());
    }
}
