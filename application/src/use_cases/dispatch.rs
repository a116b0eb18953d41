//! Tool dispatcher — every tool call ends here as plain text.
//!
//! ```text
//! dispatch(call)
//!   ├─ unknown name      → "ERROR: Unknown tool 'x'. Available: ..."
//!   ├─ bad arguments     → "ERROR: Bad arguments for tool 'x': ..."
//!   ├─ handler panicked  → "ERROR executing 'x': ..."
//!   ├─ handler failure   → "ERROR: ..."
//!   └─ success           → handler output
//!                 ↓
//!        truncate to max_output_chars
//! ```
//!
//! Nothing a handler does can unwind past [`ToolDispatcher::dispatch`].

use crate::config::ExecutionParams;
use crate::ports::tool_executor::ToolExecutorPort;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use termagent_domain::{
    DefaultToolValidator, ERROR_MARKER, ToolArguments, ToolCall, ToolRegistry, ToolValidator,
    truncate_output,
};
use tracing::{debug, error, warn};

/// Resolves, validates and runs tool calls, normalizing every outcome to text.
#[derive(Clone)]
pub struct ToolDispatcher {
    executor: Arc<dyn ToolExecutorPort>,
    validator: DefaultToolValidator,
    max_output_chars: usize,
}

impl ToolDispatcher {
    pub fn new(executor: Arc<dyn ToolExecutorPort>) -> Self {
        Self {
            executor,
            validator: DefaultToolValidator,
            max_output_chars: ExecutionParams::default().max_output_chars,
        }
    }

    pub fn with_max_output_chars(mut self, max_output_chars: usize) -> Self {
        self.max_output_chars = max_output_chars;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.executor.registry()
    }

    /// Run `name` with `arguments`.
    pub async fn execute(&self, name: &str, arguments: ToolArguments) -> String {
        let call = ToolCall {
            tool_name: name.to_string(),
            arguments,
        };
        self.dispatch(&call).await
    }

    /// Run a parsed call. Never panics, never returns an error.
    pub async fn dispatch(&self, call: &ToolCall) -> String {
        let text = self.run(call).await;
        truncate_output(&text, self.max_output_chars)
    }

    async fn run(&self, call: &ToolCall) -> String {
        let name = call.tool_name.as_str();

        let Some(definition) = self.executor.get_tool(name) else {
            warn!("Unknown tool requested: '{}'", name);
            return format!(
                "{}: Unknown tool '{}'. Available: {}",
                ERROR_MARKER,
                name,
                self.executor.available_tools().join(", ")
            );
        };

        if let Err(reason) = self.validator.validate(call, definition) {
            debug!("Rejected arguments for '{}': {}", name, reason);
            return format!(
                "{}: Bad arguments for tool '{}': {}",
                ERROR_MARKER, name, reason
            );
        }

        let started = Instant::now();
        match AssertUnwindSafe(self.executor.execute(call))
            .catch_unwind()
            .await
        {
            Ok(result) => {
                debug!(
                    tool = name,
                    success = result.is_success(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Tool finished"
                );
                result.into_text()
            }
            Err(payload) => {
                let detail = panic_message(&*payload);
                error!("Tool '{}' panicked: {}", name, detail);
                format!(
                    "{} executing '{}': handler panicked: {}\nArguments: {}",
                    ERROR_MARKER,
                    name,
                    detail,
                    call.arguments_json()
                )
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
