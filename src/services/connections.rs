use crate::errors::{InvocationError, ToolError};
use crate::openapi::OpenApiDocument;
use crate::utils::paths::resolve_relative_to;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A named tool server: where to send requests, how to authorize them and,
/// optionally, a local copy of its OpenAPI document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolServerConnection {
    #[serde(skip)]
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub openapi_path: Option<PathBuf>,
}

impl ToolServerConnection {
    pub fn token(&self) -> Option<&str> {
        self.key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// Public view; the key itself never leaves the process.
    pub fn describe(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "url": self.url,
            "has_key": self.token().is_some(),
            "openapi_path": self.openapi_path,
        })
    }

    /// Reads the local document, if one is configured.
    ///
    /// The outer `Result` covers reading the file, the inner one parsing it.
    pub fn read_document(
        &self,
    ) -> Result<Option<Result<OpenApiDocument, InvocationError>>, ToolError> {
        let Some(path) = self.openapi_path.as_ref() else {
            return Ok(None);
        };
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ToolError::internal(format!(
                "Failed to read OpenAPI document for '{}' at {}: {}",
                self.name,
                path.display(),
                err
            ))
        })?;
        Ok(Some(OpenApiDocument::parse(&raw)))
    }
}

/// Tool server connections loaded once at startup from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct ConnectionService {
    file_path: Option<PathBuf>,
    connections: IndexMap<String, ToolServerConnection>,
}

impl ConnectionService {
    pub fn new(file_path: PathBuf) -> Result<Self, ToolError> {
        let connections = load_connections(&file_path)?;
        Ok(Self {
            file_path: Some(file_path),
            connections,
        })
    }

    pub fn from_connections(connections: Vec<ToolServerConnection>) -> Self {
        Self {
            file_path: None,
            connections: connections
                .into_iter()
                .map(|conn| (conn.name.clone(), conn))
                .collect(),
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&ToolServerConnection> {
        self.connections.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.connections.keys().cloned().collect()
    }

    pub fn list(&self) -> Vec<Value> {
        self.connections
            .values()
            .map(ToolServerConnection::describe)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

fn load_connections(
    file_path: &Path,
) -> Result<IndexMap<String, ToolServerConnection>, ToolError> {
    if !file_path.exists() {
        return Ok(IndexMap::new());
    }
    let raw = std::fs::read_to_string(file_path)
        .map_err(|err| ToolError::internal(format!("Failed to load connections: {}", err)))?;
    let parsed: IndexMap<String, Value> = serde_json::from_str(&raw).map_err(|err| {
        ToolError::invalid_params(format!("Connections file must be a JSON object: {}", err))
    })?;
    let base_dir = file_path.parent().unwrap_or_else(|| Path::new("."));

    let mut out = IndexMap::new();
    for (name, entry) in parsed {
        if name.trim().is_empty() {
            return Err(ToolError::invalid_params(
                "Connection names must be non-empty",
            ));
        }
        let mut connection: ToolServerConnection =
            serde_json::from_value(entry).map_err(|err| {
                ToolError::invalid_params(format!(
                    "Connection '{}' has invalid format: {}",
                    name, err
                ))
            })?;
        if connection.url.trim().is_empty() {
            return Err(ToolError::invalid_params(format!(
                "Connection '{}' is missing url",
                name
            )));
        }
        connection.openapi_path = connection
            .openapi_path
            .map(|path| resolve_relative_to(base_dir, &path));
        connection.name = name.clone();
        out.insert(name, connection);
    }
    Ok(out)
}
