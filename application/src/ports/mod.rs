//! Ports (interfaces) implemented by outer layers.

pub mod confirmation;
pub mod llm_gateway;
pub mod tool_executor;
pub mod tool_schema;
pub mod turn_progress;
