//! Dispatch of named OpenAPI operations against arbitrary HTTP services.
//!
//! `resolve` finds the route for an operation identifier, `build` binds the
//! caller's arguments to it and [`Executor`] sends the request. None of them
//! panic or propagate failures: every outcome is an [`InvocationResult`].
//!
//! [`InvocationResult`]: crate::errors::InvocationResult

pub mod document;
pub mod executor;
pub mod request;
pub mod resolver;
pub mod tool_spec;

pub use document::{
    HttpMethod, OpenApiDocument, OperationDefinition, Parameter, ParameterLocation,
    ParameterSpec, PathItem, RequestBody,
};
pub use executor::Executor;
pub use request::{build, ArgumentMap, PreparedRequest};
pub use resolver::{operation_ids, resolve, ResolvedRoute};
pub use tool_spec::{tool_specs, ToolSpec};
