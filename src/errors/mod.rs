mod invocation_error;
mod tool_error;

pub use invocation_error::{into_payload, InvocationError, InvocationResult};
pub use tool_error::{ToolError, ToolErrorKind};
