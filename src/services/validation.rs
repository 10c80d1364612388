use crate::errors::ToolError;
use crate::openapi::ArgumentMap;
use serde_json::Value;

#[derive(Clone, Default)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_string(
        &self,
        value: &Value,
        label: &str,
        trim: bool,
    ) -> Result<String, ToolError> {
        let text = value.as_str().ok_or_else(|| {
            ToolError::invalid_params(format!("{} must be a non-empty string", label))
        })?;
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(if trim {
            normalized.to_string()
        } else {
            text.to_string()
        })
    }

    pub fn ensure_optional_string(
        &self,
        value: Option<&Value>,
        label: &str,
        trim: bool,
    ) -> Result<Option<String>, ToolError> {
        match value {
            None => Ok(None),
            Some(val) if val.is_null() => Ok(None),
            Some(val) => self.ensure_string(val, label, trim).map(Some),
        }
    }

    pub fn ensure_object(
        &self,
        value: &Value,
        label: &str,
    ) -> Result<serde_json::Map<String, Value>, ToolError> {
        value
            .as_object()
            .cloned()
            .ok_or_else(|| ToolError::invalid_params(format!("{} must be an object", label)))
    }

    pub fn ensure_optional_object(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<serde_json::Map<String, Value>>, ToolError> {
        match value {
            None => Ok(None),
            Some(val) if val.is_null() => Ok(None),
            Some(val) => self.ensure_object(val, label).map(Some),
        }
    }

    /// Caller arguments for an operation. Absent or `null` means "no arguments",
    /// which is not the same as an empty object.
    pub fn ensure_arguments(&self, value: Option<&Value>) -> Result<Option<ArgumentMap>, ToolError> {
        self.ensure_optional_object(value, "params")
    }

    /// A bearer token; empty strings count as absent.
    pub fn ensure_token(&self, value: Option<&Value>) -> Result<Option<String>, ToolError> {
        match value {
            None => Ok(None),
            Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.trim().to_string())),
            Some(_) => Err(ToolError::invalid_params("token must be a string")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_must_be_non_empty() {
        let validation = Validation::new();
        assert_eq!(
            validation.ensure_string(&json!("  getPet "), "name", true).unwrap(),
            "getPet"
        );
        assert!(validation.ensure_string(&json!("   "), "name", true).is_err());
        let err = validation.ensure_string(&json!(5), "name", true).unwrap_err();
        assert_eq!(err.message, "name must be a non-empty string");
    }

    #[test]
    fn arguments_distinguish_absent_from_empty() {
        let validation = Validation::new();
        assert_eq!(validation.ensure_arguments(None).unwrap(), None);
        assert_eq!(validation.ensure_arguments(Some(&Value::Null)).unwrap(), None);
        assert_eq!(
            validation.ensure_arguments(Some(&json!({}))).unwrap(),
            Some(ArgumentMap::new())
        );
        let err = validation.ensure_arguments(Some(&json!([1]))).unwrap_err();
        assert_eq!(err.message, "params must be an object");
    }

    #[test]
    fn empty_tokens_are_absent() {
        let validation = Validation::new();
        assert_eq!(validation.ensure_token(Some(&json!(""))).unwrap(), None);
        assert_eq!(
            validation.ensure_token(Some(&json!(" abc "))).unwrap(),
            Some("abc".to_string())
        );
        assert!(validation.ensure_token(Some(&json!(1))).is_err());
    }
}
