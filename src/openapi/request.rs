use crate::errors::InvocationError;
use crate::openapi::document::{HttpMethod, ParameterLocation};
use crate::openapi::resolver::ResolvedRoute;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Flat argument map supplied by the caller for one invocation.
pub type ArgumentMap = Map<String, Value>;

/// A request ready to be sent: declared method, final URL and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
}

impl PreparedRequest {
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "method": self.method.wire_name(),
            "url": self.url,
            "body": self.body,
        })
    }
}

#[derive(Debug, Default)]
struct Partition<'a> {
    path: IndexMap<&'a str, &'a Value>,
    query: IndexMap<&'a str, &'a Value>,
}

fn partition<'a>(route: &ResolvedRoute<'a>, arguments: Option<&'a ArgumentMap>) -> Partition<'a> {
    let mut out = Partition::default();
    let Some(arguments) = arguments else {
        return out;
    };
    for param in route.operation.parameter_specs() {
        let Some(value) = arguments.get(&param.name) else {
            continue;
        };
        match param.location {
            ParameterLocation::Path => {
                out.path.insert(param.name.as_str(), value);
            }
            ParameterLocation::Query => {
                out.query.insert(param.name.as_str(), value);
            }
            ParameterLocation::Ignored => {}
        }
    }
    out
}

/// String form of an argument value as it appears in a URL.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(coerce_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

fn substitute_path(template: String, params: &IndexMap<&str, &Value>) -> String {
    params.iter().fold(template, |url, (name, value)| {
        let token = format!("{{{}}}", name);
        let encoded = urlencoding::encode(&coerce_to_string(value)).into_owned();
        url.replace(&token, &encoded)
    })
}

fn encode_query(params: &IndexMap<&str, &Value>) -> Result<String, InvocationError> {
    let pairs: Vec<(&str, String)> = params
        .iter()
        .map(|(name, value)| (*name, coerce_to_string(value)))
        .collect();
    serde_urlencoded::to_string(pairs)
        .map_err(|err| InvocationError::Transport(format!("Failed to encode query: {}", err)))
}

/// Turns a resolved route and the caller's arguments into a concrete request.
///
/// Arguments are bound by the operation's declared parameter locations only.
/// When the operation declares a JSON request body the whole argument map is
/// sent as that body, including values already bound into the path or query.
pub fn build(
    route: &ResolvedRoute<'_>,
    arguments: Option<&ArgumentMap>,
    base_url: &str,
) -> Result<PreparedRequest, InvocationError> {
    let bound = partition(route, arguments);

    let mut url = substitute_path(format!("{}{}", base_url, route.path_template), &bound.path);
    if !bound.query.is_empty() {
        url.push('?');
        url.push_str(&encode_query(&bound.query)?);
    }

    let body = if route.operation.declares_body() {
        let arguments = arguments.ok_or_else(|| InvocationError::MissingRequestBody {
            operation_id: route.operation_id().to_string(),
        })?;
        Some(Value::Object(arguments.clone()))
    } else {
        None
    };

    Ok(PreparedRequest {
        method: route.method,
        url,
        body,
    })
}
