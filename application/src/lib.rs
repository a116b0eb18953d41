//! Application layer for termagent
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    confirmation::{
        AutoDenyConfirmation, ConfirmationError, ConfirmationPort, ConfirmationRequest,
    },
    llm_gateway::{ChatRequest, GatewayError, LlmGateway},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
    turn_progress::{NoTurnProgress, TurnProgressNotifier},
};
pub use use_cases::dispatch::ToolDispatcher;
pub use use_cases::run_turn::{AgentSession, RunTurnError, RunTurnUseCase};
