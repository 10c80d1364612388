#![allow(dead_code)]

use once_cell::sync::Lazy;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn tmp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).expect("serialize"))
        .expect("write json");
}

/// Small pet store touching every request-building rule.
pub fn pets_document() -> Value {
    serde_json::json!({
        "openapi": "3.0.0",
        "info": {"title": "Pets", "version": "1.0.0"},
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "summary": "List pets",
                    "parameters": [
                        {"name": "q", "in": "query", "schema": {"type": "string"}},
                        {"name": "limit", "in": "query", "schema": {"type": "integer"}},
                        {"name": "X-Trace", "in": "header"}
                    ]
                },
                "post": {
                    "operationId": "createPet",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": {"name": {"type": "string"}},
                                    "required": ["name"]
                                }
                            }
                        }
                    }
                }
            },
            "/pets/{id}": {
                "parameters": [{"name": "id", "in": "path", "required": true}],
                "get": {
                    "operationId": "getPet",
                    "parameters": [{"name": "id", "in": "path", "required": true}]
                },
                "delete": {
                    "operationId": "deletePet",
                    "parameters": [{"name": "id", "in": "path", "required": true}],
                    "requestBody": {"content": {"application/json": {}}}
                }
            }
        }
    })
}
