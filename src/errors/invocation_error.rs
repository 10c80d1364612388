use serde_json::Value;
use thiserror::Error;

/// Outcome of one OpenAPI invocation: the decoded response body or a failure value.
pub type InvocationResult = Result<Value, InvocationError>;

/// Every way an invocation can fail.
///
/// The engine never lets one of these escape as a fault; callers receive them as
/// the `Err` side of [`InvocationResult`] and usually forward them with
/// [`InvocationError::to_payload`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("No matching route found for operationId: {operation_id}")]
    NoMatchingRoute { operation_id: String },

    #[error("Request body expected for operation '{operation_id}' but none found")]
    MissingRequestBody { operation_id: String },

    #[error("HTTP error! Status: {status}. Message: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    #[error("Invalid OpenAPI document: {0}")]
    InvalidDocument(String),
}

impl InvocationError {
    pub fn kind(&self) -> &'static str {
        match self {
            InvocationError::NoMatchingRoute { .. } => "no_matching_route",
            InvocationError::MissingRequestBody { .. } => "missing_request_body",
            InvocationError::HttpStatus { .. } => "http_status",
            InvocationError::Transport(_) => "transport",
            InvocationError::InvalidDocument(_) => "invalid_document",
        }
    }

    /// Error-shaped payload handed back to tool callers in place of a response body.
    pub fn to_payload(&self) -> Value {
        let mut payload = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        if let (InvocationError::HttpStatus { status, body }, Value::Object(map)) =
            (self, &mut payload)
        {
            map.insert("status".to_string(), Value::from(*status));
            map.insert("body".to_string(), Value::String(body.clone()));
        }
        payload
    }
}

impl From<reqwest::Error> for InvocationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return InvocationError::Transport("HTTP request timed out".to_string());
        }
        InvocationError::Transport(err.to_string())
    }
}

/// Flattens a result into the value returned to tool callers.
pub fn into_payload(result: InvocationResult) -> Value {
    match result {
        Ok(value) => value,
        Err(err) => err.to_payload(),
    }
}
