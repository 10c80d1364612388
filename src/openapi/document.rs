//! Typed view of the parts of an OpenAPI document the dispatcher relies on.
//!
//! Only structure is checked here: a document whose `paths`, operations or
//! parameters have the wrong shape is rejected when it is parsed, so dispatch
//! never has to second-guess it. Value schemas are carried along untouched.

use crate::errors::InvocationError;
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Maps a path-item key to a method. Keys are matched as written in the
    /// document, which OpenAPI requires to be lowercase.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "patch" => Some(HttpMethod::Patch),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Methods that may carry a JSON body on the wire.
    pub fn allows_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Options => reqwest::Method::OPTIONS,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Trace => reqwest::Method::TRACE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default)]
    pub info: Option<Value>,
    pub paths: IndexMap<String, PathItem>,
}

impl OpenApiDocument {
    pub fn from_value(value: Value) -> Result<Self, InvocationError> {
        serde_json::from_value(value).map_err(|err| InvocationError::InvalidDocument(err.to_string()))
    }

    pub fn parse(raw: &str) -> Result<Self, InvocationError> {
        serde_json::from_str(raw).map_err(|err| InvocationError::InvalidDocument(err.to_string()))
    }

    /// Every operation in (path, then method) order as stored in the document.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &OperationDefinition)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.iter()
                .map(move |(method, operation)| (path.as_str(), method, operation))
        })
    }
}

/// Operations of one path template, keyed by method in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathItem {
    operations: IndexMap<HttpMethod, OperationDefinition>,
}

impl PathItem {
    pub fn iter(&self) -> impl Iterator<Item = (HttpMethod, &OperationDefinition)> {
        self.operations.iter().map(|(method, op)| (*method, op))
    }

    pub fn get(&self, method: HttpMethod) -> Option<&OperationDefinition> {
        self.operations.get(&method)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Path-level `parameters`, `summary`, `servers` and extensions share the
        // object with the method keys; only the method keys are operations.
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut operations = IndexMap::new();
        for (key, value) in raw {
            let Some(method) = HttpMethod::from_key(&key) else {
                continue;
            };
            let operation = OperationDefinition::deserialize(value)
                .map_err(|err| D::Error::custom(format!("invalid {} operation: {}", key, err)))?;
            operations.insert(method, operation);
        }
        Ok(Self { operations })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDefinition {
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
}

impl OperationDefinition {
    /// Declared parameters, skipping unresolved `$ref` entries.
    pub fn parameter_specs(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter_map(|param| match param {
            Parameter::Spec(spec) => Some(spec),
            Parameter::Reference { .. } => None,
        })
    }

    /// True when the operation declares a request body with at least one media type.
    pub fn declares_body(&self) -> bool {
        self.request_body
            .as_ref()
            .map(RequestBody::has_content)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Parameter {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Spec(ParameterSpec),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    /// Header, cookie and anything else: never bound to the request.
    #[serde(other)]
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl RequestBody {
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<Value>,
}
