pub mod connections;
pub mod logger;
pub mod tool_executor;
pub mod validation;
