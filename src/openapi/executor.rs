use crate::constants::{network as network_constants, protocols::ALLOWED_HTTP};
use crate::errors::{InvocationError, InvocationResult, ToolError};
use crate::openapi::document::OpenApiDocument;
use crate::openapi::request::{build, ArgumentMap, PreparedRequest};
use crate::openapi::resolver::resolve;
use crate::services::logger::Logger;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Sends prepared requests and turns every outcome into an [`InvocationResult`].
///
/// Holds one shared `reqwest::Client`; invocations carry no other state and can
/// run concurrently.
#[derive(Clone)]
pub struct Executor {
    logger: Logger,
    client: Client,
}

impl Executor {
    pub fn new(logger: Logger, timeout_ms: Option<u64>) -> Result<Self, ToolError> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_millis(
                network_constants::TIMEOUT_CONNECTION_MS,
            ))
            .redirect(reqwest::redirect::Policy::limited(
                network_constants::MAX_REDIRECTS,
            ));
        if let Some(timeout_ms) = timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self::with_client(logger, client))
    }

    pub fn with_client(logger: Logger, client: Client) -> Self {
        Self {
            logger: logger.child("http"),
            client,
        }
    }

    pub async fn execute(&self, request: &PreparedRequest, token: Option<&str>) -> InvocationResult {
        let url = parse_url(&request.url)?;
        let mut req = self
            .client
            .request(request.method.to_reqwest(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            req = req.bearer_auth(token);
        }
        if request.method.allows_body() {
            if let Some(body) = request.body.as_ref() {
                let payload = serde_json::to_string(body).map_err(|err| {
                    InvocationError::Transport(format!("Failed to encode request body: {}", err))
                })?;
                req = req.body(payload);
            }
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(InvocationError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text)
            .map_err(|err| InvocationError::Transport(format!("Invalid JSON response: {}", err)))
    }

    /// Resolves `operation_id`, builds the request and sends it.
    ///
    /// Never fails outside the returned value; the bearer token is not logged.
    pub async fn invoke(
        &self,
        document: &OpenApiDocument,
        operation_id: &str,
        arguments: Option<&ArgumentMap>,
        base_url: &str,
        token: Option<&str>,
    ) -> InvocationResult {
        let result = self
            .invoke_inner(document, operation_id, arguments, base_url, token)
            .await;
        if let Err(err) = result.as_ref() {
            self.logger.warn(
                "API request failed",
                Some(&serde_json::json!({
                    "operation_id": operation_id,
                    "kind": err.kind(),
                    "error": err.to_string(),
                })),
            );
        }
        result
    }

    async fn invoke_inner(
        &self,
        document: &OpenApiDocument,
        operation_id: &str,
        arguments: Option<&ArgumentMap>,
        base_url: &str,
        token: Option<&str>,
    ) -> InvocationResult {
        let route = resolve(document, operation_id)?;
        let request = build(&route, arguments, base_url)?;
        self.logger.debug(
            "dispatching operation",
            Some(&serde_json::json!({
                "operation_id": operation_id,
                "path": route.path_template,
                "method": request.method.wire_name(),
                "url": request.url,
                "has_body": request.body.is_some(),
                "authorized": token.map(|t| !t.is_empty()).unwrap_or(false),
            })),
        );
        self.execute(&request, token).await
    }
}

fn parse_url(raw: &str) -> Result<Url, InvocationError> {
    let parsed = Url::parse(raw)
        .map_err(|err| InvocationError::Transport(format!("Invalid URL '{}': {}", raw, err)))?;
    if !scheme_allowed(parsed.scheme()) {
        return Err(InvocationError::Transport(
            "Only http/https URLs are supported".to_string(),
        ));
    }
    Ok(parsed)
}

fn scheme_allowed(scheme: &str) -> bool {
    let normalized = scheme.trim_end_matches(':');
    ALLOWED_HTTP
        .iter()
        .any(|allowed| allowed.trim_end_matches(':') == normalized)
}
