mod common;

use common::pets_document;
use mockito::Matcher;
use serde_json::{json, Value};
use toolserver::errors::{into_payload, InvocationError};
use toolserver::openapi::{ArgumentMap, Executor, OpenApiDocument};
use toolserver::services::logger::{LogLevel, Logger};

fn executor() -> Executor {
    Executor::new(Logger::new("test").with_level(LogLevel::Error), None).expect("client")
}

fn document() -> OpenApiDocument {
    OpenApiDocument::from_value(pets_document()).expect("valid document")
}

fn args(value: Value) -> ArgumentMap {
    value.as_object().cloned().expect("object")
}

#[tokio::test]
async fn get_returns_decoded_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pets/42")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":42,"name":"Rex"}"#)
        .create_async()
        .await;

    let result = executor()
        .invoke(&document(), "getPet", Some(&args(json!({"id": 42}))), &server.url(), None)
        .await;

    assert_eq!(result, Ok(json!({"id": 42, "name": "Rex"})));
    mock.assert_async().await;
}

#[tokio::test]
async fn query_parameters_are_url_encoded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pets")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "red fox".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
        ]))
        .match_header("x-trace", Matcher::Missing)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let result = executor()
        .invoke(
            &document(),
            "listPets",
            Some(&args(json!({"q": "red fox", "limit": 10, "X-Trace": "t"}))),
            &server.url(),
            None,
        )
        .await;

    assert_eq!(result, Ok(json!([])));
    mock.assert_async().await;
}

#[tokio::test]
async fn post_sends_bearer_token_and_whole_argument_map() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/pets")
        .match_header("authorization", "Bearer secret-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"name": "Rex", "tag": "dog"})))
        .with_status(201)
        .with_body(r#"{"id":1}"#)
        .create_async()
        .await;

    let result = executor()
        .invoke(
            &document(),
            "createPet",
            Some(&args(json!({"name": "Rex", "tag": "dog"}))),
            &server.url(),
            Some("secret-key"),
        )
        .await;

    assert_eq!(result, Ok(json!({"id": 1})));
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_token_sends_no_authorization_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pets/1")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let result = executor()
        .invoke(&document(), "getPet", Some(&args(json!({"id": 1}))), &server.url(), Some(""))
        .await;

    assert_eq!(result, Ok(json!({})));
    mock.assert_async().await;
}

#[tokio::test]
async fn body_is_not_sent_for_delete() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/pets/9")
        .match_body(Matcher::Exact(String::new()))
        .with_status(200)
        .with_body(r#"{"deleted":true}"#)
        .create_async()
        .await;

    let result = executor()
        .invoke(&document(), "deletePet", Some(&args(json!({"id": 9}))), &server.url(), None)
        .await;

    assert_eq!(result, Ok(json!({"deleted": true})));
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_becomes_error_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pets/404")
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;

    let result = executor()
        .invoke(&document(), "getPet", Some(&args(json!({"id": 404}))), &server.url(), None)
        .await;

    assert_eq!(
        result,
        Err(InvocationError::HttpStatus {
            status: 404,
            body: "not found".to_string()
        })
    );
    let payload = into_payload(result);
    assert_eq!(payload["error"], "HTTP error! Status: 404. Message: not found");
    assert_eq!(payload["status"], 404);
    mock.assert_async().await;
}

#[tokio::test]
async fn invalid_json_response_is_a_transport_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pets/1")
        .with_status(200)
        .with_body("<html>")
        .create_async()
        .await;

    let result = executor()
        .invoke(&document(), "getPet", Some(&args(json!({"id": 1}))), &server.url(), None)
        .await;

    match result {
        Err(InvocationError::Transport(message)) => {
            assert!(message.starts_with("Invalid JSON response"))
        }
        other => panic!("unexpected result: {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn resolution_failures_never_touch_the_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/pets").expect(0).create_async().await;

    let result = executor()
        .invoke(&document(), "createPet", None, &server.url(), None)
        .await;
    assert_eq!(
        result,
        Err(InvocationError::MissingRequestBody {
            operation_id: "createPet".to_string()
        })
    );

    let result = executor()
        .invoke(&document(), "updatePet", None, &server.url(), None)
        .await;
    assert_eq!(into_payload(result)["kind"], "no_matching_route");

    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let result = executor()
        .invoke(
            &document(),
            "getPet",
            Some(&args(json!({"id": 1}))),
            "http://127.0.0.1:1",
            None,
        )
        .await;
    assert!(matches!(result, Err(InvocationError::Transport(_))));
}
