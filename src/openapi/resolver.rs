use crate::errors::InvocationError;
use crate::openapi::document::{HttpMethod, OpenApiDocument, OperationDefinition};

/// The (path template, method, operation) triple an operation identifier names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRoute<'a> {
    pub path_template: &'a str,
    pub method: HttpMethod,
    pub operation: &'a OperationDefinition,
}

impl ResolvedRoute<'_> {
    pub fn operation_id(&self) -> &str {
        self.operation.operation_id.as_deref().unwrap_or("")
    }
}

/// Finds the operation tagged `operation_id`.
///
/// Paths are walked in document order and methods in path-item order; the
/// first match wins even when the identifier is declared again later.
pub fn resolve<'a>(
    document: &'a OpenApiDocument,
    operation_id: &str,
) -> Result<ResolvedRoute<'a>, InvocationError> {
    document
        .operations()
        .find(|(_, _, operation)| operation.operation_id.as_deref() == Some(operation_id))
        .map(|(path_template, method, operation)| ResolvedRoute {
            path_template,
            method,
            operation,
        })
        .ok_or_else(|| InvocationError::NoMatchingRoute {
            operation_id: operation_id.to_string(),
        })
}

pub fn operation_ids(document: &OpenApiDocument) -> Vec<String> {
    document
        .operations()
        .filter_map(|(_, _, operation)| operation.operation_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pets() -> OpenApiDocument {
        OpenApiDocument::from_value(json!({
            "paths": {
                "/pets": {
                    "get": {"operationId": "listPets"},
                    "post": {"operationId": "createPet"}
                },
                "/pets/{id}": {
                    "get": {"operationId": "getPet"},
                    "delete": {"operationId": "deletePet"}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn finds_the_declaring_path_and_method() {
        let doc = pets();
        let route = resolve(&doc, "deletePet").unwrap();
        assert_eq!(route.path_template, "/pets/{id}");
        assert_eq!(route.method, HttpMethod::Delete);
        assert_eq!(route.operation_id(), "deletePet");
    }

    #[test]
    fn unknown_identifier_is_no_matching_route() {
        let doc = pets();
        let err = resolve(&doc, "getPets").unwrap_err();
        assert_eq!(
            err,
            InvocationError::NoMatchingRoute {
                operation_id: "getPets".to_string()
            }
        );
    }

    #[test]
    fn duplicate_identifiers_resolve_to_the_first_path() {
        let doc = OpenApiDocument::from_value(json!({
            "paths": {
                "/v2/things": {"put": {"operationId": "things"}},
                "/v1/things": {"get": {"operationId": "things"}}
            }
        }))
        .unwrap();
        let route = resolve(&doc, "things").unwrap();
        assert_eq!(route.path_template, "/v2/things");
        assert_eq!(route.method, HttpMethod::Put);
    }

    #[test]
    fn duplicate_identifiers_within_a_path_resolve_to_the_first_method() {
        let doc = OpenApiDocument::from_value(json!({
            "paths": {"/t": {"patch": {"operationId": "t"}, "get": {"operationId": "t"}}}
        }))
        .unwrap();
        assert_eq!(resolve(&doc, "t").unwrap().method, HttpMethod::Patch);
    }

    #[test]
    fn operations_without_identifier_never_match() {
        let doc = OpenApiDocument::from_value(json!({
            "paths": {"/anon": {"get": {"summary": "no id"}}}
        }))
        .unwrap();
        assert!(resolve(&doc, "").is_err());
        assert!(operation_ids(&doc).is_empty());
    }

    #[test]
    fn resolving_twice_yields_equal_routes() {
        let doc = pets();
        assert_eq!(
            resolve(&doc, "getPet").unwrap(),
            resolve(&doc, "getPet").unwrap()
        );
    }

    #[test]
    fn lists_identifiers_in_enumeration_order() {
        assert_eq!(
            operation_ids(&pets()),
            vec!["listPets", "createPet", "getPet", "deletePet"]
        );
    }
}
