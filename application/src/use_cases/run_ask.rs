//! Run Ask use case.
//!
//! Answers one business question by letting the model pick tools until it
//! produces a final answer. The loop is an explicit state machine:
//!
//! ```text
//!                 ┌──────────────────────────────────────┐
//!                 ▼                                      │
//!  ──▶ AwaitingModel ──▶ ValidatingAction ──▶ Executing ─┘
//!          │  ▲               │      │
//!          │  └── re-prompt ──┘      └──▶ Answering ──▶ Ok(text)
//!          │      (retry budget)
//!          └──────────────────────────▶ Failed ──▶ Err(AskError)
//! ```
//!
//! A malformed reply consumes the retry budget, never a turn. Executing a
//! tool consumes a turn and restores the retry budget. Tool failures are
//! observations for the model, not loop failures.

use crate::config::ExecutionParams;
use crate::ports::agent_progress::{AgentProgressNotifier, NoAgentProgress};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use cafe_domain::util::truncate_str;
use cafe_domain::{
    Action, ActionParseError, AgentPromptTemplate, ConversationHistory, Message, ParsedAction,
    Question, parse_action,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Stands in for a blank model reply in the transcript; providers reject
/// empty text blocks.
const EMPTY_REPLY_PLACEHOLDER: &str = "(empty reply)";

/// Errors that end a question without an answer.
#[derive(Error, Debug)]
pub enum AskError {
    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Model backend unavailable: {0}")]
    BackendUnavailable(#[from] GatewayError),

    #[error("Agent reached maximum turns ({max_turns}) without providing an answer")]
    TurnLimitExceeded { max_turns: usize },

    #[error("Agent failed to produce valid JSON after {attempts} attempts (last error: {last_error})")]
    RetryLimitExceeded {
        attempts: usize,
        last_error: ActionParseError,
    },
}

/// Where the loop currently is.
#[derive(Debug)]
enum LoopPhase {
    AwaitingModel,
    ValidatingAction(String),
    Executing(ParsedAction),
    Answering(String),
    Failed(AskError),
}

/// Per-question mutable state; discarded when the question resolves.
struct LoopState {
    turn: usize,
    retries: usize,
    transcript: Vec<Message>,
}

/// Answers one question by alternating model completions and tool calls.
///
/// Cheap to clone; every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct RunAskUseCase {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    execution: ExecutionParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RunAskUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, tool_executor: Arc<dyn ToolExecutorPort>) -> Self {
        Self {
            gateway,
            tool_executor,
            execution: ExecutionParams::default(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_execution_params(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    /// Record transcript events through `logger`.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn execution_params(&self) -> &ExecutionParams {
        &self.execution
    }

    /// Build the system prompt for today's date.
    pub fn system_prompt(&self) -> String {
        let today = chrono::Local::now().date_naive().to_string();
        AgentPromptTemplate::agent_system(
            self.tool_executor.tool_spec(),
            &self.tool_executor.schema_description(),
            &today,
        )
    }

    /// Answer `question` given prior conversation `history`.
    pub async fn ask(&self, question: &str, history: &ConversationHistory) -> Result<String, AskError> {
        self.ask_with_progress(question, history, &NoAgentProgress).await
    }

    /// Answer `question`, reporting progress as the loop runs.
    pub async fn ask_with_progress(
        &self,
        question: &str,
        history: &ConversationHistory,
        progress: &dyn AgentProgressNotifier,
    ) -> Result<String, AskError> {
        let question = Question::try_new(question).ok_or(AskError::EmptyQuestion)?;
        info!(
            "Starting question via {} ({}): {}",
            self.gateway.name(),
            self.gateway.model(),
            truncate_str(question.content(), 100)
        );
        self.conversation_logger.log(ConversationEvent::new(
            ConversationEventKind::Question,
            serde_json::json!({
                "backend": self.gateway.name(),
                "model": self.gateway.model(),
                "text": question.content(),
                "history_turns": history.len().min(self.execution.history_turns),
            }),
        ));

        let system_prompt = self.system_prompt();
        let mut transcript: Vec<Message> =
            history.recent(self.execution.history_turns).cloned().collect();
        transcript.push(Message::user(question.content()));

        let mut state = LoopState {
            turn: 0,
            retries: 0,
            transcript,
        };
        let mut phase = LoopPhase::AwaitingModel;

        loop {
            phase = match phase {
                LoopPhase::AwaitingModel => self.await_model(&system_prompt, &state, progress).await,
                LoopPhase::ValidatingAction(reply) => self.validate(reply, &mut state, progress),
                LoopPhase::Executing(parsed) => self.execute(parsed, &mut state, progress).await,
                LoopPhase::Answering(text) => {
                    info!("Answered after {} tool turns", state.turn);
                    self.conversation_logger.log(ConversationEvent::new(
                        ConversationEventKind::Answer,
                        serde_json::json!({ "turns": state.turn, "text": text }),
                    ));
                    progress.on_answer(&text);
                    return Ok(text);
                }
                LoopPhase::Failed(error) => {
                    warn!("Question failed after {} tool turns: {}", state.turn, error);
                    self.conversation_logger.log(ConversationEvent::new(
                        ConversationEventKind::Failure,
                        serde_json::json!({ "turns": state.turn, "error": error.to_string() }),
                    ));
                    progress.on_error(&error.to_string());
                    return Err(error);
                }
            };
        }
    }

    async fn await_model(
        &self,
        system_prompt: &str,
        state: &LoopState,
        progress: &dyn AgentProgressNotifier,
    ) -> LoopPhase {
        let max_turns = self.execution.max_turns;
        if state.turn >= max_turns {
            return LoopPhase::Failed(AskError::TurnLimitExceeded { max_turns });
        }

        progress.on_thinking(state.turn + 1, max_turns);
        debug!(
            "Requesting completion (turn {}/{}, retry {}, {} messages)",
            state.turn + 1,
            max_turns,
            state.retries,
            state.transcript.len()
        );

        match self.gateway.complete(system_prompt, &state.transcript).await {
            Ok(reply) => {
                self.conversation_logger.log(ConversationEvent::new(
                    ConversationEventKind::LlmResponse,
                    serde_json::json!({
                        "turn": state.turn + 1,
                        "retry": state.retries,
                        "bytes": reply.len(),
                        "text": reply,
                    }),
                ));
                LoopPhase::ValidatingAction(reply)
            }
            Err(e) => LoopPhase::Failed(AskError::BackendUnavailable(e)),
        }
    }

    fn validate(
        &self,
        reply: String,
        state: &mut LoopState,
        progress: &dyn AgentProgressNotifier,
    ) -> LoopPhase {
        match parse_action(&reply) {
            Ok(parsed) => {
                state.retries = 0;
                match parsed.action {
                    Action::Answer { text } => LoopPhase::Answering(text),
                    action => LoopPhase::Executing(ParsedAction {
                        action,
                        cleaned_json: parsed.cleaned_json,
                    }),
                }
            }
            Err(error) => {
                let max_retries = self.execution.max_retries;
                self.conversation_logger.log(ConversationEvent::new(
                    ConversationEventKind::InvalidResponse,
                    serde_json::json!({
                        "turn": state.turn + 1,
                        "retry": state.retries,
                        "error": error.to_string(),
                    }),
                ));
                if state.retries >= max_retries {
                    return LoopPhase::Failed(AskError::RetryLimitExceeded {
                        attempts: state.retries + 1,
                        last_error: error,
                    });
                }
                state.retries += 1;
                warn!(
                    "Invalid model reply ({}), re-prompting {}/{}",
                    error, state.retries, max_retries
                );
                progress.on_retry(state.retries, max_retries, &error);
                let reply = if reply.trim().is_empty() {
                    EMPTY_REPLY_PLACEHOLDER.to_string()
                } else {
                    reply
                };
                state.transcript.push(Message::assistant(reply));
                state
                    .transcript
                    .push(Message::user(AgentPromptTemplate::invalid_format(&error)));
                LoopPhase::AwaitingModel
            }
        }
    }

    async fn execute(
        &self,
        parsed: ParsedAction,
        state: &mut LoopState,
        progress: &dyn AgentProgressNotifier,
    ) -> LoopPhase {
        let kind = parsed.action.kind();
        let summary = parsed.action.summary();
        info!("Turn {}: {} {}", state.turn + 1, kind, truncate_str(&summary, 120));
        progress.on_tool_call(kind, &summary);
        self.conversation_logger.log(ConversationEvent::new(
            ConversationEventKind::ToolCall,
            serde_json::json!({
                "turn": state.turn + 1,
                "tool": kind.as_str(),
                "action": parsed.cleaned_json,
            }),
        ));

        let started = Instant::now();
        let result = self.tool_executor.execute(&parsed.action).await;
        let observation = result.to_observation();
        debug!(
            "{} finished in {}ms (success: {})",
            kind,
            started.elapsed().as_millis(),
            result.is_success()
        );
        progress.on_tool_result(&result);
        self.conversation_logger.log(ConversationEvent::new(
            ConversationEventKind::ToolResult,
            serde_json::json!({
                "turn": state.turn + 1,
                "tool": kind.as_str(),
                "success": result.is_success(),
                "error_code": result.error().map(|e| e.code.clone()),
                "bytes": observation.len(),
                "observation": observation,
            }),
        ));

        state.transcript.push(Message::assistant(parsed.cleaned_json));
        state
            .transcript
            .push(Message::user(AgentPromptTemplate::tool_result(&observation)));
        state.turn += 1;
        LoopPhase::AwaitingModel
    }
}
