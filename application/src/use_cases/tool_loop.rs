//! Tool-call loop.
//!
//! Drives a model through repeated tool invocation until it produces a final
//! text answer:
//!
//! 1. Send the prompt together with the dispatcher's tool declarations
//! 2. Classify the reply via [`LlmResponse::turn`]
//! 3. On a tool call, dispatch every call in the reply and send the results
//!    back together, then go to 2
//! 4. On final text, return it
//!
//! Every step is recorded in an append-only [`Conversation`] owned by the
//! loop. The number of dispatches per run is bounded by
//! [`ExecutionParams::max_tool_turns`] and each dispatch by
//! [`ExecutionParams::tool_timeout`].

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession, ToolResultMessage};
use crate::ports::progress::ProgressNotifier;
use crate::ports::tool_dispatcher::ToolDispatcherPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::tool_helpers::{preview, tool_args_preview};
use genai_domain::{
    Conversation, LlmResponse, Model, ModelTurn, ToolCall, ToolError, ToolLoopEvent,
    ToolLoopState, validate_prompt,
};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while running the tool-call loop.
#[derive(Error, Debug)]
pub enum ToolLoopError {
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Dispatcher failure, propagated unmodified.
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Tool '{tool}' timed out after {timeout:?}")]
    ToolTimeout { tool: String, timeout: Duration },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Exceeded maximum of {0} tool turns")]
    MaxToolTurnsExceeded(usize),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ToolLoopError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ToolLoopError::Cancelled)
    }
}

/// Input for [`ToolCallLoop::start`].
#[derive(Debug, Clone, Default)]
pub struct ToolLoopInput {
    /// Model the session is opened with.
    pub model: Model,
    /// Optional system prompt for the session.
    pub system_prompt: Option<String>,
    /// Loop bounds.
    pub execution: ExecutionParams,
}

impl ToolLoopInput {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }
}

/// A tool-call loop bound to one model session and one dispatcher.
///
/// The loop owns its conversation; `run` takes `&mut self` so one instance
/// serves one conversation at a time. Successive `run` calls continue the
/// same session and append to the same conversation.
pub struct ToolCallLoop {
    session: Box<dyn LlmSession>,
    dispatcher: Arc<dyn ToolDispatcherPort>,
    tools: Vec<serde_json::Value>,
    execution: ExecutionParams,
    conversation: Conversation,
    state: ToolLoopState,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl ToolCallLoop {
    /// Open a model session and build a loop over the dispatcher's tools.
    pub async fn start(
        gateway: &dyn LlmGateway,
        dispatcher: Arc<dyn ToolDispatcherPort>,
        schema: &dyn ToolSchemaPort,
        input: ToolLoopInput,
    ) -> Result<Self, ToolLoopError> {
        let session = match &input.system_prompt {
            Some(system) => {
                gateway
                    .create_session_with_system_prompt(&input.model, system)
                    .await?
            }
            None => gateway.create_session(&input.model).await?,
        };
        debug!(
            model = %input.model,
            tools = dispatcher.tool_spec().len(),
            "Tool loop session opened"
        );
        Ok(Self::with_session(
            session,
            dispatcher,
            schema,
            input.execution,
        ))
    }

    /// Build a loop over an already opened session.
    pub fn with_session(
        session: Box<dyn LlmSession>,
        dispatcher: Arc<dyn ToolDispatcherPort>,
        schema: &dyn ToolSchemaPort,
        execution: ExecutionParams,
    ) -> Self {
        let tools = schema.all_tools_schema(dispatcher.tool_spec());
        Self {
            session,
            dispatcher,
            tools,
            execution,
            conversation: Conversation::new(),
            state: ToolLoopState::default(),
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    /// Attach a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Attach a cancellation token checked around every round trip.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn into_conversation(self) -> Conversation {
        self.conversation
    }

    pub fn state(&self) -> ToolLoopState {
        self.state
    }

    pub fn model(&self) -> &Model {
        self.session.model()
    }

    /// Run one prompt to completion and return the model's final text.
    pub async fn run(
        &mut self,
        prompt: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, ToolLoopError> {
        let prompt =
            validate_prompt(prompt).map_err(|e| ToolLoopError::InvalidPrompt(e.to_string()))?;
        self.check_cancelled()?;

        info!("Starting tool loop: {}", preview(prompt, 100));

        // A previous run may have failed mid-dispatch.
        self.state = ToolLoopState::AwaitingModel;
        let checkpoint = self.session.history_len().await;

        let result = self.run_turns(prompt, progress).await;
        if result.is_err() {
            // Never leave a tool call without its result in the session.
            self.session.truncate_history(checkpoint).await;
        }
        result
    }

    async fn run_turns(
        &mut self,
        prompt: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, ToolLoopError> {
        self.transition(ToolLoopEvent::PromptSubmitted);
        self.conversation.push_user(prompt);
        self.conversation_logger.log(ConversationEvent::new(
            "user_prompt",
            serde_json::json!({
                "model": self.session.model().to_string(),
                "text": prompt,
                "tools": self.dispatcher.available_tools(),
            }),
        ));

        progress.on_model_request(0);
        let session = self.session.as_ref();
        let tools = &self.tools;
        let mut response = cancellable(
            &self.cancellation_token,
            session.send_with_tools(prompt, tools),
        )
        .await??;

        let mut dispatches = 0usize;
        loop {
            match response.turn() {
                ModelTurn::Final(answer) => return Ok(self.finish(answer, dispatches, progress)),
                ModelTurn::Malformed(reason) => {
                    warn!("Malformed model response: {}", reason);
                    return Err(ToolLoopError::MalformedResponse(reason));
                }
                ModelTurn::ToolCall(_) => {}
            }

            // Parallel calls in one reply are answered together.
            self.transition(ToolLoopEvent::ToolCallReceived);
            let mut messages = Vec::new();
            for call in response.tool_calls() {
                if dispatches >= self.execution.max_tool_turns {
                    warn!(
                        "Tool loop exceeded max_tool_turns ({})",
                        self.execution.max_tool_turns
                    );
                    return Err(ToolLoopError::MaxToolTurnsExceeded(
                        self.execution.max_tool_turns,
                    ));
                }
                dispatches += 1;

                let output = self.dispatch(call.clone(), dispatches, progress).await?;
                debug!(
                    "Tool turn {}/{}: result of '{}' ({} bytes)",
                    dispatches,
                    self.execution.max_tool_turns,
                    call.tool_name,
                    output.len()
                );
                messages.push(ToolResultMessage {
                    tool_use_id: call.native_id,
                    tool_name: call.tool_name,
                    output,
                });
            }
            self.transition(ToolLoopEvent::ToolResultSent);

            progress.on_model_request(dispatches);
            response = self.send_tool_results(&messages).await?;
        }
    }

    async fn dispatch(
        &mut self,
        call: ToolCall,
        turn: usize,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, ToolLoopError> {
        self.check_cancelled()?;

        info!(
            tool = %call.tool_name,
            turn,
            "Dispatching tool call: {}",
            tool_args_preview(&call)
        );
        progress.on_tool_call(&call);
        self.conversation_logger.log(ConversationEvent::new(
            "tool_call",
            serde_json::json!({
                "turn": turn,
                "tool": call.tool_name,
                "arguments": call.arguments,
            }),
        ));
        self.conversation.push_tool_request(call.clone());

        let started = Instant::now();
        let result = match self.execution.tool_timeout {
            Some(timeout) => {
                match cancellable(
                    &self.cancellation_token,
                    tokio::time::timeout(timeout, self.dispatcher.dispatch(&call)),
                )
                .await?
                {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(tool = %call.tool_name, "Tool call timed out after {:?}", timeout);
                        return Err(ToolLoopError::ToolTimeout {
                            tool: call.tool_name,
                            timeout,
                        });
                    }
                }
            }
            None => cancellable(&self.cancellation_token, self.dispatcher.dispatch(&call)).await?,
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(output) => {
                progress.on_tool_result(&call.tool_name, duration_ms, &preview(&output, 100));
                self.conversation_logger.log(ConversationEvent::new(
                    "tool_result",
                    serde_json::json!({
                        "turn": turn,
                        "tool": call.tool_name,
                        "duration_ms": duration_ms,
                        "bytes": output.len(),
                        "output": output,
                    }),
                ));
                self.conversation.push_tool_result(&call.tool_name, &output);
                Ok(output)
            }
            Err(error) => {
                warn!(tool = %call.tool_name, code = error.code(), "Tool call failed: {}", error);
                progress.on_tool_error(&call.tool_name, &error);
                self.conversation_logger.log(ConversationEvent::new(
                    "tool_error",
                    serde_json::json!({
                        "turn": turn,
                        "tool": call.tool_name,
                        "error": error,
                    }),
                ));
                Err(ToolLoopError::Tool(error))
            }
        }
    }

    async fn send_tool_results(
        &self,
        messages: &[ToolResultMessage],
    ) -> Result<LlmResponse, ToolLoopError> {
        let response = cancellable(
            &self.cancellation_token,
            self.session.send_tool_results(messages),
        )
        .await??;
        Ok(response)
    }

    fn finish(&mut self, answer: String, dispatches: usize, progress: &dyn ProgressNotifier) -> String {
        self.transition(ToolLoopEvent::FinalReceived);
        self.conversation.push_model(&answer);
        progress.on_final_answer(&answer);

        info!("Tool loop completed after {} tool turns", dispatches);
        self.conversation_logger.log(ConversationEvent::new(
            "final_answer",
            serde_json::json!({
                "model": self.session.model().to_string(),
                "tool_turns": dispatches,
                "bytes": answer.len(),
                "text": answer,
            }),
        ));
        answer
    }

    fn transition(&mut self, event: ToolLoopEvent) {
        match self.state.next(event) {
            Some(next) => self.state = next,
            None => warn!("Ignoring {:?} in state {}", event, self.state),
        }
    }

    fn check_cancelled(&self) -> Result<(), ToolLoopError> {
        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return Err(ToolLoopError::Cancelled);
        }
        Ok(())
    }
}

/// Await `fut`, bailing out with `Cancelled` as soon as the token fires.
async fn cancellable<F: Future>(
    token: &Option<CancellationToken>,
    fut: F,
) -> Result<F::Output, ToolLoopError> {
    match token {
        Some(token) => {
            tokio::select! {
                _ = token.cancelled() => Err(ToolLoopError::Cancelled),
                output = fut => Ok(output),
            }
        }
        None => Ok(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use genai_domain::session::response::{ContentBlock, StopReason};
    use genai_domain::tool::entities::{ToolArguments, ToolDefinition, ToolSpec};
    use genai_domain::{CachedContentHandle, Turn};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Test Mocks ====================

    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Prompt(String, usize),
        ToolResults(Vec<ToolResultMessage>),
    }

    /// Session that replays scripted responses and keeps a history like a
    /// real backend: one entry per request plus one per reply.
    struct MockSession {
        model: Model,
        responses: Mutex<VecDeque<LlmResponse>>,
        sent: Arc<Mutex<Vec<Sent>>>,
        history: Arc<Mutex<Vec<String>>>,
    }

    impl MockSession {
        fn new(responses: Vec<LlmResponse>) -> (Self, Arc<Mutex<Vec<Sent>>>) {
            let session = Self {
                model: Model::Gemini15Pro,
                responses: Mutex::new(VecDeque::from(responses)),
                sent: Arc::new(Mutex::new(Vec::new())),
                history: Arc::new(Mutex::new(Vec::new())),
            };
            let sent = session.sent.clone();
            (session, sent)
        }

        fn exchange(&self, request: String) -> Result<LlmResponse, GatewayError> {
            self.history.lock().unwrap().push(request);
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| GatewayError::Other("No more responses".to_string()))?;
            let reply = match response.turn() {
                ModelTurn::ToolCall(_) => format!("model:calls={}", response.tool_calls().len()),
                _ => "model:text".to_string(),
            };
            self.history.lock().unwrap().push(reply);
            Ok(response)
        }
    }

    #[async_trait]
    impl LlmSession for MockSession {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn send(&self, content: &str) -> Result<String, GatewayError> {
            Ok(self.exchange(format!("user:{}", content))?.text_content())
        }

        async fn send_with_tools(
            &self,
            content: &str,
            tools: &[serde_json::Value],
        ) -> Result<LlmResponse, GatewayError> {
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Prompt(content.to_string(), tools.len()));
            self.exchange(format!("user:{}", content))
        }

        async fn send_tool_results(
            &self,
            results: &[ToolResultMessage],
        ) -> Result<LlmResponse, GatewayError> {
            self.sent
                .lock()
                .unwrap()
                .push(Sent::ToolResults(results.to_vec()));
            self.exchange(format!("results={}", results.len()))
        }

        async fn history_len(&self) -> usize {
            self.history.lock().unwrap().len()
        }

        async fn truncate_history(&self, len: usize) {
            self.history.lock().unwrap().truncate(len);
        }
    }

    struct MockGateway {
        session: Mutex<Option<Box<dyn LlmSession>>>,
        system_prompt: Mutex<Option<String>>,
    }

    impl MockGateway {
        fn new(session: impl LlmSession + 'static) -> Self {
            Self {
                session: Mutex::new(Some(Box::new(session))),
                system_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn create_session(
            &self,
            _model: &Model,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            self.session
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| GatewayError::Other("Session already taken".to_string()))
        }

        async fn create_session_with_system_prompt(
            &self,
            model: &Model,
            system_prompt: &str,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            *self.system_prompt.lock().unwrap() = Some(system_prompt.to_string());
            self.create_session(model).await
        }

        async fn create_cached_session(
            &self,
            _model: &Model,
            _handle: &CachedContentHandle,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            Err(GatewayError::Unsupported("create_cached_session"))
        }
    }

    /// Dispatcher with scripted per-tool outcomes and a call counter.
    struct MockDispatcher {
        spec: ToolSpec,
        outcomes: HashMap<String, Result<String, ToolError>>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockDispatcher {
        fn empty() -> Self {
            Self {
                spec: ToolSpec::new(),
                outcomes: HashMap::new(),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn with_tool(mut self, name: &str, outcome: Result<String, ToolError>) -> Self {
            self.spec
                .try_register(ToolDefinition::new(name, format!("{} tool", name)))
                .unwrap();
            self.outcomes.insert(name.to_string(), outcome);
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ToolDispatcherPort for MockDispatcher {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn call_function(
            &self,
            name: &str,
            _args: &ToolArguments,
        ) -> Result<String, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.outcomes
                .get(name)
                .cloned()
                .unwrap_or_else(|| Err(ToolError::not_found(name)))
        }
    }

    struct MockToolSchema;

    impl ToolSchemaPort for MockToolSchema {
        fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
            serde_json::json!({
                "name": tool.name,
                "description": tool.description,
                "parameters": { "type": "object", "properties": {} }
            })
        }
    }

    fn text_response(text: &str) -> LlmResponse {
        LlmResponse {
            content: vec![ContentBlock::Text(text.to_string())],
            stop_reason: Some(StopReason::EndTurn),
            model: Some("test-model".to_string()),
        }
    }

    fn tool_use_response(tool_name: &str, native_id: &str) -> LlmResponse {
        LlmResponse {
            content: vec![ContentBlock::ToolUse {
                id: native_id.to_string(),
                name: tool_name.to_string(),
                input: HashMap::new(),
            }],
            stop_reason: Some(StopReason::ToolUse),
            model: Some("test-model".to_string()),
        }
    }

    fn parallel_tool_use_response(calls: &[(&str, &str)]) -> LlmResponse {
        LlmResponse {
            content: calls
                .iter()
                .map(|(name, id)| ContentBlock::ToolUse {
                    id: id.to_string(),
                    name: name.to_string(),
                    input: HashMap::new(),
                })
                .collect(),
            stop_reason: Some(StopReason::ToolUse),
            model: Some("test-model".to_string()),
        }
    }

    fn new_loop(
        responses: Vec<LlmResponse>,
        dispatcher: Arc<MockDispatcher>,
        execution: ExecutionParams,
    ) -> (ToolCallLoop, Arc<Mutex<Vec<Sent>>>) {
        let (tool_loop, sent, _) = new_loop_with_history(responses, dispatcher, execution);
        (tool_loop, sent)
    }

    fn new_loop_with_history(
        responses: Vec<LlmResponse>,
        dispatcher: Arc<MockDispatcher>,
        execution: ExecutionParams,
    ) -> (ToolCallLoop, Arc<Mutex<Vec<Sent>>>, Arc<Mutex<Vec<String>>>) {
        let (session, sent) = MockSession::new(responses);
        let history = session.history.clone();
        let tool_loop =
            ToolCallLoop::with_session(Box::new(session), dispatcher, &MockToolSchema, execution);
        (tool_loop, sent, history)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_plain_text_with_zero_tools() {
        let dispatcher = Arc::new(MockDispatcher::empty());
        let (mut tool_loop, sent) = new_loop(
            vec![text_response("4")],
            dispatcher.clone(),
            ExecutionParams::default(),
        );

        let answer = tool_loop.run("What is 2+2?", &NoProgress).await.unwrap();

        assert_eq!(answer, "4");
        assert_eq!(dispatcher.calls(), 0);
        assert_eq!(tool_loop.state(), ToolLoopState::Done);
        assert_eq!(
            sent.lock().unwrap().as_slice(),
            &[Sent::Prompt("What is 2+2?".to_string(), 0)]
        );
        let kinds: Vec<_> = tool_loop.conversation().turns().iter().map(Turn::kind).collect();
        assert_eq!(kinds, vec!["user", "model"]);
    }

    #[tokio::test]
    async fn test_tool_sequence_then_final_answer() {
        let dispatcher = Arc::new(
            MockDispatcher::empty()
                .with_tool("get_current_time", Ok("12:00".to_string()))
                .with_tool("calculate", Ok("42".to_string())),
        );
        let (mut tool_loop, sent) = new_loop(
            vec![
                tool_use_response("get_current_time", "call_1"),
                tool_use_response("calculate", ""),
                text_response("It is noon and the answer is 42."),
            ],
            dispatcher.clone(),
            ExecutionParams::default(),
        );

        let answer = tool_loop.run("Time and answer?", &NoProgress).await.unwrap();

        assert_eq!(answer, "It is noon and the answer is 42.");
        assert_eq!(dispatcher.calls(), 2);

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0], Sent::Prompt("Time and answer?".to_string(), 2));
        assert_eq!(
            sent[1],
            Sent::ToolResults(vec![ToolResultMessage {
                tool_use_id: Some("call_1".to_string()),
                tool_name: "get_current_time".to_string(),
                output: "12:00".to_string(),
            }])
        );
        assert_eq!(
            sent[2],
            Sent::ToolResults(vec![ToolResultMessage {
                tool_use_id: None,
                tool_name: "calculate".to_string(),
                output: "42".to_string(),
            }])
        );

        let conversation = tool_loop.conversation();
        assert_eq!(conversation.len(), 6);
        assert_eq!(conversation.tool_request_count(), 2);
        assert_eq!(
            conversation.last(),
            Some(&Turn::Model {
                content: "It is noon and the answer is 42.".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_dispatcher_error_propagates_and_keeps_prior_turns() {
        let dispatcher = Arc::new(
            MockDispatcher::empty()
                .with_tool("get_current_time", Ok("12:00".to_string()))
                .with_tool(
                    "calculate",
                    Err(ToolError::execution_failed("calculate", "division by zero")),
                ),
        );
        let (mut tool_loop, sent) = new_loop(
            vec![
                tool_use_response("get_current_time", "call_1"),
                tool_use_response("calculate", "call_2"),
                text_response("never reached"),
            ],
            dispatcher.clone(),
            ExecutionParams::default(),
        );

        let err = tool_loop.run("Divide by zero", &NoProgress).await.unwrap_err();

        match err {
            ToolLoopError::Tool(ToolError::ExecutionFailed { tool, message }) => {
                assert_eq!(tool, "calculate");
                assert_eq!(message, "division by zero");
            }
            other => panic!("expected tool error, got {:?}", other),
        }
        // Only the first result was sent back.
        assert_eq!(sent.lock().unwrap().len(), 2);

        let kinds: Vec<_> = tool_loop.conversation().turns().iter().map(Turn::kind).collect();
        assert_eq!(
            kinds,
            vec!["user", "tool_request", "tool_result", "tool_request"]
        );
        assert_eq!(tool_loop.state(), ToolLoopState::DispatchingTool);
    }

    #[tokio::test]
    async fn test_failed_run_rolls_back_session_history() {
        let dispatcher = Arc::new(
            MockDispatcher::empty()
                .with_tool("get_current_time", Ok("12:00".to_string()))
                .with_tool(
                    "calculate",
                    Err(ToolError::execution_failed("calculate", "division by zero")),
                ),
        );
        let (mut tool_loop, _, history) = new_loop_with_history(
            vec![
                text_response("hello"),
                tool_use_response("get_current_time", "call_1"),
                tool_use_response("calculate", "call_2"),
                text_response("recovered"),
            ],
            dispatcher,
            ExecutionParams::default(),
        );

        tool_loop.run("hi", &NoProgress).await.unwrap();
        assert!(tool_loop.run("Divide by zero", &NoProgress).await.is_err());

        // The dangling tool call is gone; only the first exchange remains.
        assert_eq!(*history.lock().unwrap(), vec!["user:hi", "model:text"]);

        assert_eq!(tool_loop.run("again", &NoProgress).await.unwrap(), "recovered");
        assert_eq!(
            *history.lock().unwrap(),
            vec!["user:hi", "model:text", "user:again", "model:text"]
        );
        // The transcript keeps the failed attempt.
        assert_eq!(tool_loop.conversation().tool_request_count(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_run_rolls_back_session_history() {
        let dispatcher = Arc::new(
            MockDispatcher::empty()
                .with_tool("get_current_time", Ok("12:00".to_string()))
                .with_delay(Duration::from_secs(30)),
        );
        let (tool_loop, _, history) = new_loop_with_history(
            vec![tool_use_response("get_current_time", "call_1")],
            dispatcher,
            ExecutionParams::default().with_tool_timeout(None),
        );
        let token = CancellationToken::new();
        let mut tool_loop = tool_loop.with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        let err = tool_loop.run("What time is it?", &NoProgress).await.unwrap_err();
        canceller.await.unwrap();

        assert!(err.is_cancelled());
        assert!(history.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_parallel_calls_answered_together() {
        let dispatcher = Arc::new(
            MockDispatcher::empty()
                .with_tool("get_current_time", Ok("12:00".to_string()))
                .with_tool("calculate", Ok("42".to_string())),
        );
        let (mut tool_loop, sent) = new_loop(
            vec![
                parallel_tool_use_response(&[("get_current_time", "a"), ("calculate", "b")]),
                text_response("done"),
            ],
            dispatcher.clone(),
            ExecutionParams::default(),
        );

        assert_eq!(tool_loop.run("Both please", &NoProgress).await.unwrap(), "done");
        assert_eq!(dispatcher.calls(), 2);

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        match &sent[1] {
            Sent::ToolResults(results) => {
                let names: Vec<_> = results.iter().map(|r| r.tool_name.as_str()).collect();
                assert_eq!(names, vec!["get_current_time", "calculate"]);
                assert_eq!(results[0].tool_use_id.as_deref(), Some("a"));
                assert_eq!(results[1].output, "42");
            }
            other => panic!("expected tool results, got {:?}", other),
        }
        assert_eq!(tool_loop.conversation().tool_request_count(), 2);
    }

    #[tokio::test]
    async fn test_parallel_calls_count_against_max_tool_turns() {
        let dispatcher = Arc::new(
            MockDispatcher::empty().with_tool("calculate", Ok("1".to_string())),
        );
        let (mut tool_loop, sent) = new_loop(
            vec![parallel_tool_use_response(&[
                ("calculate", "a"),
                ("calculate", "b"),
                ("calculate", "c"),
            ])],
            dispatcher.clone(),
            ExecutionParams::default().with_max_tool_turns(2),
        );

        let err = tool_loop.run("Three sums", &NoProgress).await.unwrap_err();
        assert!(matches!(err, ToolLoopError::MaxToolTurnsExceeded(2)));
        assert_eq!(dispatcher.calls(), 2);
        // No partial result set is sent back.
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let dispatcher = Arc::new(MockDispatcher::empty());
        let (mut tool_loop, _) = new_loop(
            vec![tool_use_response("launch_rockets", "call_1")],
            dispatcher,
            ExecutionParams::default(),
        );

        let err = tool_loop.run("Go", &NoProgress).await.unwrap_err();
        assert!(matches!(
            err,
            ToolLoopError::Tool(ToolError::NotFound { ref name }) if name == "launch_rockets"
        ));
    }

    #[tokio::test]
    async fn test_respects_max_tool_turns() {
        let dispatcher = Arc::new(
            MockDispatcher::empty().with_tool("get_current_time", Ok("12:00".to_string())),
        );
        let responses = (0..10)
            .map(|i| tool_use_response("get_current_time", &format!("call_{}", i)))
            .collect();
        let (mut tool_loop, _) = new_loop(
            responses,
            dispatcher.clone(),
            ExecutionParams::default().with_max_tool_turns(3),
        );

        let err = tool_loop.run("Loop forever", &NoProgress).await.unwrap_err();

        assert!(matches!(err, ToolLoopError::MaxToolTurnsExceeded(3)));
        assert_eq!(dispatcher.calls(), 3);
        assert_eq!(tool_loop.conversation().tool_request_count(), 3);
    }

    #[tokio::test]
    async fn test_tool_timeout() {
        let dispatcher = Arc::new(
            MockDispatcher::empty()
                .with_tool("get_current_time", Ok("12:00".to_string()))
                .with_delay(Duration::from_secs(30)),
        );
        let (mut tool_loop, _) = new_loop(
            vec![tool_use_response("get_current_time", "call_1")],
            dispatcher,
            ExecutionParams::default().with_tool_timeout(Some(Duration::from_millis(20))),
        );

        let err = tool_loop.run("What time is it?", &NoProgress).await.unwrap_err();
        match err {
            ToolLoopError::ToolTimeout { tool, timeout } => {
                assert_eq!(tool, "get_current_time");
                assert_eq!(timeout, Duration::from_millis(20));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_response_is_malformed() {
        let dispatcher = Arc::new(MockDispatcher::empty());
        let (mut tool_loop, _) = new_loop(
            vec![LlmResponse {
                content: vec![],
                stop_reason: Some(StopReason::Safety),
                model: None,
            }],
            dispatcher,
            ExecutionParams::default(),
        );

        let err = tool_loop.run("Hello?", &NoProgress).await.unwrap_err();
        assert!(matches!(err, ToolLoopError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected_before_sending() {
        let dispatcher = Arc::new(MockDispatcher::empty());
        let (mut tool_loop, sent) =
            new_loop(vec![text_response("x")], dispatcher, ExecutionParams::default());

        let err = tool_loop.run("   \n", &NoProgress).await.unwrap_err();
        assert!(matches!(err, ToolLoopError::InvalidPrompt(_)));
        assert!(sent.lock().unwrap().is_empty());
        assert!(tool_loop.conversation().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_run() {
        let dispatcher = Arc::new(MockDispatcher::empty());
        let (tool_loop, sent) =
            new_loop(vec![text_response("x")], dispatcher, ExecutionParams::default());
        let token = CancellationToken::new();
        token.cancel();
        let mut tool_loop = tool_loop.with_cancellation(token);

        let err = tool_loop.run("Hello", &NoProgress).await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_during_slow_tool() {
        let dispatcher = Arc::new(
            MockDispatcher::empty()
                .with_tool("get_current_time", Ok("12:00".to_string()))
                .with_delay(Duration::from_secs(30)),
        );
        let (tool_loop, _) = new_loop(
            vec![tool_use_response("get_current_time", "call_1")],
            dispatcher,
            ExecutionParams::default().with_tool_timeout(None),
        );
        let token = CancellationToken::new();
        let mut tool_loop = tool_loop.with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let err = tool_loop.run("What time is it?", &NoProgress).await.unwrap_err();
        canceller.await.unwrap();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_successive_runs_share_conversation() {
        let dispatcher = Arc::new(MockDispatcher::empty());
        let (mut tool_loop, _) = new_loop(
            vec![text_response("first"), text_response("second")],
            dispatcher,
            ExecutionParams::default(),
        );

        assert_eq!(tool_loop.run("one", &NoProgress).await.unwrap(), "first");
        assert_eq!(tool_loop.run("two", &NoProgress).await.unwrap(), "second");
        assert_eq!(tool_loop.into_conversation().len(), 4);
    }

    #[tokio::test]
    async fn test_start_uses_system_prompt() {
        let (session, _) = MockSession::new(vec![text_response("ok")]);
        let gateway = MockGateway::new(session);
        let dispatcher = Arc::new(MockDispatcher::empty());

        let input = ToolLoopInput::new(Model::Gemini15Flash).with_system_prompt("Be brief.");
        let mut tool_loop = ToolCallLoop::start(&gateway, dispatcher, &MockToolSchema, input)
            .await
            .unwrap();

        assert_eq!(
            gateway.system_prompt.lock().unwrap().as_deref(),
            Some("Be brief.")
        );
        assert_eq!(tool_loop.run("hi", &NoProgress).await.unwrap(), "ok");
    }

    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    #[tokio::test]
    async fn test_conversation_events_logged() {
        let dispatcher = Arc::new(
            MockDispatcher::empty().with_tool("calculate", Ok("4".to_string())),
        );
        let (tool_loop, _) = new_loop(
            vec![tool_use_response("calculate", "c1"), text_response("4")],
            dispatcher,
            ExecutionParams::default(),
        );
        let logger = Arc::new(RecordingLogger {
            events: Mutex::new(Vec::new()),
        });
        let mut tool_loop = tool_loop.with_conversation_logger(logger.clone());

        tool_loop.run("2+2", &NoProgress).await.unwrap();

        assert_eq!(
            *logger.events.lock().unwrap(),
            vec!["user_prompt", "tool_call", "tool_result", "final_answer"]
        );
    }
}
