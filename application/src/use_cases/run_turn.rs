//! Run Turn use case
//!
//! Drives one user turn through the model/tool loop:
//!
//! ```text
//! user input ─▶ AwaitingModel ──reply──▶ InspectingResponse ──text only──▶ Done
//!                    ▲                          │
//!                    │                     tool calls
//!                    │                          ▼
//!                    └────── batch done ── ExecutingTools ──cap──▶ IterationCapReached
//! ```
//!
//! Calls in a batch run one at a time, in the order the model emitted them.
//! Every call goes through the risk gate, and dangerous tools always reach
//! the [`ConfirmationPort`] regardless of auto-approve.

use crate::config::ExecutionParams;
use crate::ports::confirmation::{ConfirmationError, ConfirmationPort, ConfirmationRequest};
use crate::ports::llm_gateway::{ChatRequest, GatewayError, LlmGateway};
use crate::ports::tool_schema::ToolSchemaPort;
use crate::ports::turn_progress::{NoTurnProgress, TurnProgressNotifier};
use crate::use_cases::dispatch::ToolDispatcher;
use crate::use_cases::shared::{check_cancelled, tool_args_preview};
use std::sync::Arc;
use termagent_domain::{
    AssistantReply, Conversation, DENIAL_TEXT, GateOutcome, ITERATION_CAP_TEXT, Message, Model,
    RiskPolicy, ToolCall, TurnOutcome, TurnState,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that escape a turn.
///
/// Everything else (transport failures, tool failures, denials, the
/// iteration cap) is folded into the conversation as text.
#[derive(Error, Debug)]
pub enum RunTurnError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Confirmation prompt failed: {0}")]
    Confirmation(String),
}

impl From<ConfirmationError> for RunTurnError {
    fn from(e: ConfirmationError) -> Self {
        match e {
            ConfirmationError::Cancelled => RunTurnError::Cancelled,
            ConfirmationError::IoError(msg) => RunTurnError::Confirmation(msg),
        }
    }
}

/// State carried across turns of one session.
///
/// The loop is the only writer of both the transcript and the
/// auto-approve flag.
#[derive(Debug, Clone)]
pub struct AgentSession {
    pub conversation: Conversation,
    pub policy: RiskPolicy,
    pub model: Model,
}

impl AgentSession {
    pub fn new(conversation: Conversation, policy: RiskPolicy, model: Model) -> Self {
        Self {
            conversation,
            policy,
            model,
        }
    }
}

/// Use case for running one user turn.
pub struct RunTurnUseCase {
    gateway: Arc<dyn LlmGateway>,
    dispatcher: ToolDispatcher,
    tool_schema: Arc<dyn ToolSchemaPort>,
    confirmation: Arc<dyn ConfirmationPort>,
    params: ExecutionParams,
}

impl RunTurnUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        dispatcher: ToolDispatcher,
        tool_schema: Arc<dyn ToolSchemaPort>,
        confirmation: Arc<dyn ConfirmationPort>,
    ) -> Self {
        Self {
            gateway,
            dispatcher,
            tool_schema,
            confirmation,
            params: ExecutionParams::default(),
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.dispatcher = self
            .dispatcher
            .with_max_output_chars(params.max_output_chars);
        self.params = params;
        self
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Run a turn without progress output or cancellation.
    pub async fn execute(
        &self,
        session: &mut AgentSession,
        input: &str,
    ) -> Result<TurnOutcome, RunTurnError> {
        self.execute_with_progress(session, input, &NoTurnProgress, &CancellationToken::new())
            .await
    }

    pub async fn execute_with_progress(
        &self,
        session: &mut AgentSession,
        input: &str,
        progress: &dyn TurnProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome, RunTurnError> {
        session.conversation.push(Message::user(input));
        session.conversation.trim();

        let tools = self
            .tool_schema
            .all_tools_schema(self.dispatcher.registry());
        let max_iterations = self.params.max_tool_iterations;

        let mut state = TurnState::AwaitingModel;
        let mut round_trips = 0;
        let mut tool_batches = 0;
        let mut transport_failed = false;
        let mut answer = String::new();

        while !state.is_terminal() {
            match state {
                TurnState::AwaitingModel => {
                    check_cancelled(cancel)?;
                    progress.on_thinking(tool_batches);
                    let request = ChatRequest {
                        model: &session.model,
                        messages: session.conversation.messages(),
                        tools: &tools,
                    };
                    let reply = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            progress.on_thinking_done();
                            return Err(RunTurnError::Cancelled);
                        }
                        reply = self.gateway.chat(request) => reply,
                    };
                    progress.on_thinking_done();
                    round_trips += 1;

                    match reply {
                        Ok(reply) => state = self.inspect(session, reply, &mut answer),
                        Err(e) => {
                            answer = transport_failure_text(&e, tool_batches);
                            warn!("Completion request failed: {}", e);
                            transport_failed = true;
                            state = TurnState::Done;
                        }
                    }
                }
                TurnState::ExecutingTools => {
                    let calls = pending_calls(&session.conversation);
                    for call in &calls {
                        check_cancelled(cancel)?;
                        let text = self.process_call(session, call, progress).await?;
                        session
                            .conversation
                            .push(Message::tool(call.tool_name.clone(), text));
                    }
                    tool_batches += 1;
                    debug!(
                        "Tool batch {}/{} done ({} call(s))",
                        tool_batches,
                        max_iterations,
                        calls.len()
                    );

                    state = if tool_batches >= max_iterations {
                        warn!("Reached max tool iterations ({})", max_iterations);
                        progress.on_iteration_cap(max_iterations);
                        answer = ITERATION_CAP_TEXT.to_string();
                        TurnState::IterationCapReached
                    } else {
                        TurnState::AwaitingModel
                    };
                }
                TurnState::InspectingResponse
                | TurnState::Done
                | TurnState::IterationCapReached => break,
            }
        }

        if !answer.is_empty() {
            session.conversation.push(Message::assistant(answer.clone()));
        }
        let evicted = session.conversation.trim();
        if evicted > 0 {
            debug!("Trimmed {} message(s) from history", evicted);
        }

        info!(
            state = %state,
            round_trips,
            tool_batches,
            "Turn finished"
        );

        Ok(TurnOutcome {
            answer,
            final_state: state,
            round_trips,
            tool_batches,
            transport_failed,
        })
    }

    /// `InspectingResponse`: decide between a final answer and a tool batch.
    fn inspect(
        &self,
        session: &mut AgentSession,
        reply: AssistantReply,
        answer: &mut String,
    ) -> TurnState {
        if !reply.has_tool_calls() {
            *answer = reply.content;
            return TurnState::Done;
        }
        debug!("Model requested {} tool call(s)", reply.tool_calls.len());
        session.conversation.push(Message::assistant_with_tool_calls(
            reply.content,
            reply.tool_calls,
        ));
        TurnState::ExecutingTools
    }

    /// Gate, confirm and dispatch a single call. Returns the tool message text.
    async fn process_call(
        &self,
        session: &mut AgentSession,
        call: &ToolCall,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<String, RunTurnError> {
        let tier = self.dispatcher.registry().risk_of(&call.tool_name);

        let approved = match session.policy.evaluate(tier) {
            GateOutcome::AutoApproved => true,
            GateOutcome::NeedsConfirmation => {
                let request = ConfirmationRequest {
                    call,
                    risk_tier: tier,
                };
                let decision = self.confirmation.confirm(&request).await?;
                debug!("User answered {:?} for '{}'", decision, call.tool_name);
                session.policy.apply(decision)
            }
        };

        if !approved {
            info!("Tool '{}' denied by user", call.tool_name);
            progress.on_tool_denied(&call.tool_name);
            return Ok(DENIAL_TEXT.to_string());
        }

        progress.on_tool_call(&call.tool_name, tier, &tool_args_preview(call));
        let output = self.dispatcher.dispatch(call).await;
        progress.on_tool_result(&call.tool_name, &output);
        Ok(output)
    }
}

/// Tool calls of the assistant message that opened the current batch.
fn pending_calls(conversation: &Conversation) -> Vec<ToolCall> {
    conversation
        .last()
        .map(|m| m.tool_calls.clone())
        .unwrap_or_default()
}

fn transport_failure_text(e: &GatewayError, tool_batches: usize) -> String {
    if tool_batches == 0 {
        format!("Error: {}", e)
    } else {
        format!("Error during tool iteration: {}", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::tool_executor::ToolExecutorPort;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use termagent_domain::{
        ApprovalDecision, RiskTier, Role, ToolDefinition, ToolParameter, ToolRegistry, ToolResult,
    };

    // ==================== Test doubles ====================

    /// Replays canned replies; once the script runs out it repeats the last one.
    struct ScriptedGateway {
        replies: Mutex<VecDeque<Result<AssistantReply, String>>>,
        last: Mutex<Option<AssistantReply>>,
        calls: Mutex<usize>,
        seen_tools: Mutex<usize>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Result<AssistantReply, String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                last: Mutex::new(None),
                calls: Mutex::new(0),
                seen_tools: Mutex::new(0),
            }
        }

        fn always(reply: AssistantReply) -> Self {
            let gw = Self::new(Vec::new());
            *gw.last.lock().unwrap() = Some(reply);
            gw
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn chat(&self, request: ChatRequest<'_>) -> Result<AssistantReply, GatewayError> {
            *self.calls.lock().unwrap() += 1;
            *self.seen_tools.lock().unwrap() = request.tools.len();
            let next = self.replies.lock().unwrap().pop_front();
            match next {
                Some(Ok(reply)) => {
                    *self.last.lock().unwrap() = Some(reply.clone());
                    Ok(reply)
                }
                Some(Err(msg)) => Err(GatewayError::ConnectionError(msg)),
                None => self
                    .last
                    .lock()
                    .unwrap()
                    .clone()
                    .ok_or_else(|| GatewayError::Other("script exhausted".into())),
            }
        }
    }

    struct FakeTools {
        registry: ToolRegistry,
        executed: Mutex<Vec<String>>,
    }

    impl FakeTools {
        fn new() -> Self {
            let registry = ToolRegistry::new()
                .register(
                    ToolDefinition::new("list_directory", "List", RiskTier::Safe)
                        .with_parameter(ToolParameter::new("path", "Dir", false)),
                )
                .register(
                    ToolDefinition::new("write_file", "Write", RiskTier::Moderate)
                        .with_parameter(ToolParameter::new("path", "File", true))
                        .with_parameter(ToolParameter::new("content", "Body", true)),
                )
                .register(
                    ToolDefinition::new("delete_file", "Delete", RiskTier::Dangerous)
                        .with_parameter(ToolParameter::new("path", "File", true)),
                );
            Self {
                registry,
                executed: Mutex::new(Vec::new()),
            }
        }

        fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolExecutorPort for FakeTools {
        fn registry(&self) -> &ToolRegistry {
            &self.registry
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            self.executed.lock().unwrap().push(call.tool_name.clone());
            match call.tool_name.as_str() {
                "list_directory" => ToolResult::success(
                    "list_directory",
                    "Directory: .\n\n[FILE] a.txt (3 B)\n[FILE] b.txt (5 B)",
                ),
                "write_file" => ToolResult::success("write_file", "Wrote 2 chars"),
                _ => ToolResult::success(call.tool_name.clone(), "Deleted"),
            }
        }
    }

    struct NameSchema;

    impl ToolSchemaPort for NameSchema {
        fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
            json!({ "name": tool.name })
        }
    }

    /// Answers from a script and records every prompt it was shown.
    struct ScriptedConfirmation {
        answers: Mutex<VecDeque<Result<ApprovalDecision, ConfirmationError>>>,
        asked: Mutex<Vec<(String, RiskTier)>>,
    }

    impl ScriptedConfirmation {
        fn new(answers: Vec<Result<ApprovalDecision, ConfirmationError>>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                asked: Mutex::new(Vec::new()),
            }
        }

        fn asked(&self) -> Vec<(String, RiskTier)> {
            self.asked.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConfirmationPort for ScriptedConfirmation {
        async fn confirm(
            &self,
            request: &ConfirmationRequest<'_>,
        ) -> Result<ApprovalDecision, ConfirmationError> {
            self.asked
                .lock()
                .unwrap()
                .push((request.call.tool_name.clone(), request.risk_tier));
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(ApprovalDecision::Deny))
        }
    }

    struct Harness {
        gateway: Arc<ScriptedGateway>,
        tools: Arc<FakeTools>,
        confirmation: Arc<ScriptedConfirmation>,
        use_case: RunTurnUseCase,
    }

    fn harness(
        gateway: ScriptedGateway,
        answers: Vec<Result<ApprovalDecision, ConfirmationError>>,
    ) -> Harness {
        let gateway = Arc::new(gateway);
        let tools = Arc::new(FakeTools::new());
        let confirmation = Arc::new(ScriptedConfirmation::new(answers));
        let use_case = RunTurnUseCase::new(
            gateway.clone(),
            ToolDispatcher::new(tools.clone()),
            Arc::new(NameSchema),
            confirmation.clone(),
        );
        Harness {
            gateway,
            tools,
            confirmation,
            use_case,
        }
    }

    fn session(auto_approve: bool) -> AgentSession {
        AgentSession::new(
            Conversation::new("You are a test assistant.", 50),
            RiskPolicy::new(auto_approve),
            Model::default(),
        )
    }

    fn request(name: &str, args: Value) -> AssistantReply {
        AssistantReply::new("", vec![ToolCall::from_raw(name, &args)])
    }

    fn roles(session: &AgentSession) -> Vec<Role> {
        session.conversation.messages().iter().map(|m| m.role).collect()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_plain_answer_finishes_in_one_round_trip() {
        let h = harness(
            ScriptedGateway::new(vec![Ok(AssistantReply::from_text("Hello!"))]),
            vec![],
        );
        let mut s = session(false);
        let outcome = h.use_case.execute(&mut s, "hi").await.unwrap();

        assert_eq!(outcome.answer, "Hello!");
        assert_eq!(outcome.final_state, TurnState::Done);
        assert_eq!(outcome.round_trips, 1);
        assert_eq!(outcome.tool_batches, 0);
        assert_eq!(roles(&s), vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(*h.gateway.seen_tools.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_directory_scenario() {
        let h = harness(
            ScriptedGateway::new(vec![
                Ok(request("list_directory", json!({"path": "."}))),
                Ok(AssistantReply::from_text("Here are the files.")),
            ]),
            vec![],
        );
        let mut s = session(false);
        let outcome = h
            .use_case
            .execute(&mut s, "list files in this folder")
            .await
            .unwrap();

        assert_eq!(outcome.final_state, TurnState::Done);
        assert_eq!(outcome.answer, "Here are the files.");
        assert_eq!(
            roles(&s),
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::Tool,
                Role::Assistant
            ]
        );
        let tool_msg = &s.conversation.messages()[3];
        assert_eq!(tool_msg.tool_name.as_deref(), Some("list_directory"));
        assert!(tool_msg.content.contains("a.txt"));
        // safe tier never prompts
        assert!(h.confirmation.asked().is_empty());
    }

    #[tokio::test]
    async fn test_iteration_cap_bounds_round_trips() {
        let h = harness(
            ScriptedGateway::always(request("list_directory", json!({}))),
            vec![],
        );
        let use_case = h
            .use_case
            .with_params(ExecutionParams::default().with_max_tool_iterations(4));
        let mut s = session(false);
        let outcome = use_case.execute(&mut s, "loop forever").await.unwrap();

        assert_eq!(outcome.final_state, TurnState::IterationCapReached);
        assert!(outcome.hit_iteration_cap());
        assert_eq!(outcome.answer, ITERATION_CAP_TEXT);
        assert_eq!(h.gateway.calls(), 4);
        assert_eq!(outcome.round_trips, 4);
        assert_eq!(outcome.tool_batches, 4);
        assert_eq!(h.tools.executed().len(), 4);
        assert_eq!(
            s.conversation.last().map(|m| m.content.as_str()),
            Some(ITERATION_CAP_TEXT)
        );
    }

    #[tokio::test]
    async fn test_dangerous_call_prompts_even_with_auto_approve() {
        let h = harness(
            ScriptedGateway::new(vec![
                Ok(request("delete_file", json!({"path": "/sdcard/x"}))),
                Ok(AssistantReply::from_text("Okay, I left it alone.")),
            ]),
            vec![Ok(ApprovalDecision::Deny)],
        );
        let mut s = session(true);
        let outcome = h.use_case.execute(&mut s, "delete x").await.unwrap();

        assert_eq!(
            h.confirmation.asked(),
            vec![("delete_file".to_string(), RiskTier::Dangerous)]
        );
        assert!(h.tools.executed().is_empty());
        assert_eq!(s.conversation.messages()[3].content, DENIAL_TEXT);
        // denial is not an error: the loop asked the model again
        assert_eq!(outcome.round_trips, 2);
        assert_eq!(outcome.answer, "Okay, I left it alone.");
    }

    #[tokio::test]
    async fn test_always_enables_auto_approve_for_moderate_only() {
        let h = harness(
            ScriptedGateway::new(vec![
                Ok(request("write_file", json!({"path": "a", "content": "hi"}))),
                Ok(request("write_file", json!({"path": "b", "content": "hi"}))),
                Ok(request("delete_file", json!({"path": "a"}))),
                Ok(AssistantReply::from_text("done")),
            ]),
            vec![Ok(ApprovalDecision::AllowAlways), Ok(ApprovalDecision::AllowOnce)],
        );
        let mut s = session(false);
        h.use_case.execute(&mut s, "write twice then delete").await.unwrap();

        assert!(s.policy.auto_approve());
        // first write asked, second auto-approved, delete asked again
        assert_eq!(
            h.confirmation.asked(),
            vec![
                ("write_file".to_string(), RiskTier::Moderate),
                ("delete_file".to_string(), RiskTier::Dangerous),
            ]
        );
        assert_eq!(
            h.tools.executed(),
            vec!["write_file", "write_file", "delete_file"]
        );
    }

    #[tokio::test]
    async fn test_batch_runs_in_emitted_order() {
        let batch = AssistantReply::new(
            "Checking first.",
            vec![
                ToolCall::from_raw("list_directory", &json!({"path": "a"})),
                ToolCall::from_raw("write_file", &json!({"path": "b", "content": "c"})),
                ToolCall::from_raw("list_directory", &json!({"path": "b"})),
            ],
        );
        let h = harness(
            ScriptedGateway::new(vec![Ok(batch), Ok(AssistantReply::from_text("ok"))]),
            vec![Ok(ApprovalDecision::AllowOnce)],
        );
        let mut s = session(false);
        let outcome = h.use_case.execute(&mut s, "go").await.unwrap();

        assert_eq!(outcome.tool_batches, 1);
        assert_eq!(
            h.tools.executed(),
            vec!["list_directory", "write_file", "list_directory"]
        );
        let tool_names: Vec<_> = s
            .conversation
            .messages()
            .iter()
            .filter_map(|m| m.tool_name.as_deref())
            .collect();
        assert_eq!(tool_names, vec!["list_directory", "write_file", "list_directory"]);
        assert_eq!(s.conversation.messages()[2].content, "Checking first.");
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_answer() {
        let h = harness(
            ScriptedGateway::new(vec![Err("connection refused".into())]),
            vec![],
        );
        let mut s = session(false);
        let outcome = h.use_case.execute(&mut s, "hi").await.unwrap();

        assert!(outcome.transport_failed);
        assert_eq!(outcome.final_state, TurnState::Done);
        assert!(outcome.answer.starts_with("Error: "));
        assert!(outcome.answer.contains("connection refused"));
        assert_eq!(h.gateway.calls(), 1);
        assert_eq!(roles(&s), vec![Role::System, Role::User, Role::Assistant]);
    }

    #[tokio::test]
    async fn test_transport_failure_mid_turn() {
        let h = harness(
            ScriptedGateway::new(vec![
                Ok(request("list_directory", json!({}))),
                Err("timed out".into()),
            ]),
            vec![],
        );
        let mut s = session(false);
        let outcome = h.use_case.execute(&mut s, "hi").await.unwrap();
        assert!(outcome.answer.starts_with("Error during tool iteration: "));
        assert_eq!(outcome.tool_batches, 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_and_malformed_args_continue_conversation() {
        let h = harness(
            ScriptedGateway::new(vec![
                Ok(AssistantReply::new(
                    "",
                    vec![
                        ToolCall::from_raw("format_disk", &json!({})),
                        ToolCall::from_raw("list_directory", &json!([1, 2, 3])),
                    ],
                )),
                Ok(AssistantReply::from_text("recovered")),
            ]),
            vec![],
        );
        // unknown names fall back to the moderate tier
        let mut s = session(true);
        let outcome = h.use_case.execute(&mut s, "go").await.unwrap();

        let messages = s.conversation.messages();
        assert!(messages[3].content.contains("Unknown tool 'format_disk'"));
        assert!(messages[4].content.contains("a.txt"));
        assert_eq!(outcome.answer, "recovered");
    }

    #[tokio::test]
    async fn test_cancelled_before_request() {
        let h = harness(
            ScriptedGateway::new(vec![Ok(AssistantReply::from_text("never"))]),
            vec![],
        );
        let token = CancellationToken::new();
        token.cancel();
        let mut s = session(false);
        let result = h
            .use_case
            .execute_with_progress(&mut s, "hi", &NoTurnProgress, &token)
            .await;

        assert!(matches!(result, Err(RunTurnError::Cancelled)));
        assert_eq!(h.gateway.calls(), 0);
        // the user message stays in the transcript
        assert_eq!(roles(&s), vec![Role::System, Role::User]);
    }

    #[tokio::test]
    async fn test_cancelled_at_confirmation_prompt() {
        let h = harness(
            ScriptedGateway::new(vec![Ok(request("delete_file", json!({"path": "x"})))]),
            vec![Err(ConfirmationError::Cancelled)],
        );
        let mut s = session(false);
        let result = h.use_case.execute(&mut s, "delete x").await;
        assert!(matches!(result, Err(RunTurnError::Cancelled)));
        assert!(h.tools.executed().is_empty());
    }

    #[tokio::test]
    async fn test_history_trimmed_after_turn() {
        let h = harness(ScriptedGateway::always(AssistantReply::from_text("ok")), vec![]);
        let mut s = AgentSession::new(
            Conversation::new("sys", 2),
            RiskPolicy::default(),
            Model::default(),
        );
        for i in 0..5 {
            h.use_case.execute(&mut s, &format!("q{i}")).await.unwrap();
        }
        assert_eq!(s.conversation.len(), 5);
        assert_eq!(s.conversation.system_prompt(), "sys");
        assert_eq!(s.conversation.messages()[1].content, "q3");
    }
}
