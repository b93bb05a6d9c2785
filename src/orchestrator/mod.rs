// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bounded multi-step tool-calling loop.
//!
//! One session runs `Idle -> Reasoning -> (ToolExecuting -> Reasoning)* -> Done | Aborted`. Each
//! reasoning step asks a [`DecisionFn`] for text and tool calls; the calls are applied in order
//! to the session's [`StateTracker`] before the next step. The session ends on a turn without
//! tool calls or when the turn cap is reached.

mod prompt;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

use crate::dedup::dedup_adjacent;
use crate::model::{DiagramSnapshot, SnapshotError};
use crate::schema::{tool_definitions, IntentName, ToolDefinition};
use crate::tracker::{StateTracker, ToolInvocationRecord, TrackerSettings};

pub use prompt::{SessionMode, SystemContext};

pub const DEFAULT_MAX_TURNS: usize = 10;

/// One tool call proposed by the decision backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self { id: id.into(), name: name.into(), args }
    }
}

/// Output of one reasoning step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    pub text: Option<String>,
    pub tool_calls: SmallVec<[ToolCall; 4]>,
}

impl Decision {
    /// A final turn: text only, no tool calls.
    pub fn finish(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), tool_calls: SmallVec::new() }
    }

    pub fn call(call: ToolCall) -> Self {
        let mut tool_calls = SmallVec::new();
        tool_calls.push(call);
        Self { text: None, tool_calls }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn is_final(&self) -> bool {
        self.tool_calls.is_empty()
    }
}

/// Conversation history handed back to the decision backend on every turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant { text: Option<String>, tool_calls: Vec<ToolCall> },
    Tool { call_id: String, tool_name: String, result: Value },
}

/// Everything a decision backend may look at for one reasoning step.
#[derive(Debug)]
pub struct DecisionRequest<'a> {
    pub transcript: &'a str,
    pub messages: &'a [Message],
    pub tools: &'a [ToolDefinition],
    pub context: SystemContext,
    /// Read-only view of the session's working copy.
    pub snapshot: &'a DiagramSnapshot,
    /// Zero-based index of this reasoning step.
    pub turn: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecisionError {
    #[error("decision backend unavailable: {0}")]
    Unavailable(String),
    #[error("decision backend returned a malformed response: {0}")]
    Malformed(String),
}

/// Decision backend seam: a language model, the rule interpreter, or a scripted test double.
#[async_trait]
pub trait DecisionFn: Send + Sync {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<Decision, DecisionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    NoToolCalls,
    TurnLimit,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoToolCalls => "no_tool_calls",
            Self::TurnLimit => "turn_limit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Reasoning { turn: usize },
    ToolExecuting { turn: usize, calls: usize },
    Done(StopReason),
    Aborted,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Reasoning { turn } => write!(f, "reasoning(turn {turn})"),
            Self::ToolExecuting { turn, calls } => write!(f, "tool_executing(turn {turn}, {calls} call(s))"),
            Self::Done(reason) => write!(f, "done({})", reason.as_str()),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub transcript: String,
    #[serde(default)]
    pub diagram_state: DiagramSnapshot,
    #[serde(default)]
    pub voice_ack_enabled: bool,
}

impl SessionRequest {
    pub fn new(transcript: impl Into<String>, diagram_state: DiagramSnapshot) -> Self {
        Self { transcript: transcript.into(), diagram_state, voice_ack_enabled: false }
    }

    pub fn with_voice_ack(mut self, enabled: bool) -> Self {
        self.voice_ack_enabled = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub transcript: String,
    pub response: String,
    pub tool_results: Vec<ToolInvocationRecord>,
    pub turns_used: usize,
    pub speech_message: Option<String>,
    pub diagram_state: DiagramSnapshot,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("transcript is empty")]
    EmptyTranscript,
    #[error("invalid diagram state: {0}")]
    InvalidDiagram(#[from] SnapshotError),
    #[error(transparent)]
    Decision(#[from] DecisionError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    pub max_turns: usize,
    pub tracker: TrackerSettings,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { max_turns: DEFAULT_MAX_TURNS, tracker: TrackerSettings::default() }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    decider: Arc<dyn DecisionFn>,
    config: OrchestratorConfig,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(decider: Arc<dyn DecisionFn>, config: OrchestratorConfig) -> Self {
        Self { decider, config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Runs one command session. The request's snapshot is only read; the edited copy comes back
    /// in the outcome for the caller to commit.
    pub async fn run(&self, request: &SessionRequest) -> Result<SessionOutcome, SessionError> {
        let transcript = request.transcript.trim();
        if transcript.is_empty() {
            return Err(SessionError::EmptyTranscript);
        }
        request.diagram_state.validate()?;

        let settings = TrackerSettings {
            voice_ack_enabled: request.voice_ack_enabled,
            ..self.config.tracker.clone()
        };
        let mut tracker = StateTracker::new(&request.diagram_state, settings);
        let mode = SessionMode::from_voice_ack(request.voice_ack_enabled);
        let tools = tool_definitions(request.voice_ack_enabled);
        let mut messages = vec![
            Message::System {
                content: SystemContext::new(mode, tracker.snapshot()).system_prompt(),
            },
            Message::User { content: transcript.to_owned() },
        ];

        tracing::info!(
            mode = mode.as_str(),
            nodes = tracker.snapshot().node_count(),
            edges = tracker.snapshot().edge_count(),
            max_turns = self.config.max_turns,
            "command session started"
        );

        let mut phase = SessionPhase::Idle;
        let mut response = None;
        let mut turns_used = 0;
        let stop_reason = loop {
            if turns_used >= self.config.max_turns {
                break StopReason::TurnLimit;
            }
            let turn = turns_used;
            turns_used += 1;
            transition(&mut phase, SessionPhase::Reasoning { turn });

            let decided = {
                let decision_request = DecisionRequest {
                    transcript,
                    messages: &messages,
                    tools: &tools,
                    context: SystemContext::new(mode, tracker.snapshot()),
                    snapshot: tracker.snapshot(),
                    turn,
                };
                self.decider.decide(&decision_request).await
            };
            let decision = match decided {
                Ok(decision) => decision,
                Err(err) => {
                    transition(&mut phase, SessionPhase::Aborted);
                    tracing::warn!(turn, error = %err, "command session aborted");
                    return Err(err.into());
                }
            };

            let text = decision.text.filter(|text| !text.trim().is_empty());
            if let Some(text) = &text {
                response = Some(text.clone());
            }
            let is_final = decision.tool_calls.is_empty();
            messages.push(Message::Assistant { text, tool_calls: decision.tool_calls.to_vec() });
            if is_final {
                break StopReason::NoToolCalls;
            }

            transition(
                &mut phase,
                SessionPhase::ToolExecuting { turn, calls: decision.tool_calls.len() },
            );
            for call in &decision.tool_calls {
                let result = tracker.execute(&call.name, &call.args);
                messages.push(Message::Tool {
                    call_id: call.id.clone(),
                    tool_name: call.name.clone(),
                    result: result.to_value(),
                });
            }
        };
        transition(&mut phase, SessionPhase::Done(stop_reason));

        let (diagram_state, log, speech_message) = tracker.into_parts();
        let raw_calls = log.len();
        let tool_results = dedup_adjacent(log);
        let response = response.unwrap_or_else(|| fallback_response(&tool_results));

        tracing::info!(
            turns_used,
            tool_calls = raw_calls,
            kept = tool_results.len(),
            stop_reason = stop_reason.as_str(),
            "command session finished"
        );

        Ok(SessionOutcome {
            transcript: transcript.to_owned(),
            response,
            tool_results,
            turns_used,
            speech_message,
            diagram_state,
            stop_reason,
        })
    }
}

fn transition(phase: &mut SessionPhase, next: SessionPhase) {
    tracing::debug!(from = %phase, to = %next, "session phase");
    *phase = next;
}

/// Acknowledgement used when the backend never produced any text.
fn fallback_response(records: &[ToolInvocationRecord]) -> String {
    let edits = records
        .iter()
        .filter(|record| {
            record
                .tool_name
                .parse::<IntentName>()
                .map_or(true, |name| !matches!(name, IntentName::GetCurrentState | IntentName::SpeakResponse))
        })
        .collect::<Vec<_>>();
    let applied = edits.iter().filter(|record| record.result.success).count();
    match (edits.len(), applied) {
        (0, _) => "No changes were made.".to_owned(),
        (_, 0) => "Nothing could be applied.".to_owned(),
        (total, applied) if applied == total => format!("Applied {applied} change(s)."),
        (total, applied) => format!("Applied {applied} of {total} operation(s)."),
    }
}

#[cfg(test)]
mod tests;
